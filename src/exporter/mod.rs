// ==========================================
// 裁缝店业务管理系统 - 导出模块
// ==========================================
// 职责: 列投影、CSV/XLSX 编码、导入样例模板
// ==========================================

pub mod error;
pub mod file_writer;
pub mod projector;
pub mod templates;

pub use error::{ExportError, ExportResult};
pub use file_writer::{encode, FileWriter, DEFAULT_COLUMN_PADDING};
pub use projector::{project, select_columns, Projection};
pub use templates::{sample_template, sample_template_csv, template_filename, CONVENTION_ROW};

use crate::domain::types::{EntityKind, TabularFormat};

/// 下载文件名: customers.csv / inventory.xlsx ...
pub fn export_filename(kind: EntityKind, format: TabularFormat) -> String {
    format!("{}.{}", kind.file_stem(), format.extension())
}
