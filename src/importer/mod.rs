// ==========================================
// 裁缝店业务管理系统 - 导入模块
// ==========================================
// 管道: 字节解码 → 模式判定 → 逐行转换/校验/关联解析 → 落库
// 红线: 单行失败只跳过该行；仅文件解码失败是致命错误
// ==========================================

pub mod entity_importer;
pub mod entity_schemas;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod reconciler;
pub mod schema;

pub use entity_importer::{ImportableEntity, TabularEntity};
pub use error::{ImportError, ImportResult, RowError, RowResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{decode, UniversalFileParser};
pub use reconciler::{reconcile, ImportReconciler};
pub use schema::{ColumnMeta, EntitySchema, ImportContext, TypeHint};
