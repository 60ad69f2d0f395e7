// ==========================================
// 裁缝店业务管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型与导入结果
// 红线: 不含数据访问逻辑
// ==========================================

pub mod customer;
pub mod import;
pub mod inventory;
pub mod order;
pub mod supplier;
pub mod types;

// 重导出核心类型
pub use customer::Customer;
pub use import::{DecodedTable, ImportOutcome, RawRow, SkipReason, DEFAULT_SKIP_PREVIEW_LIMIT};
pub use inventory::InventoryItem;
pub use order::{Order, Payment, Requirement};
pub use supplier::{Purchase, Supplier};
pub use types::{EntityKind, ItemType, TabularFormat};
