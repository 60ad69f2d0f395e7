// ==========================================
// 裁缝店业务管理系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod customer_repo;
pub mod error;
pub mod inventory_repo;
pub mod order_repo;
pub mod payment_repo;
pub mod requirement_repo;
pub mod sql_utils;
pub mod store;
pub mod supplier_repo;

// 重导出核心仓储
pub use customer_repo::CustomerRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use inventory_repo::InventoryRepository;
pub use order_repo::OrderRepository;
pub use payment_repo::PaymentRepository;
pub use requirement_repo::RequirementRepository;
pub use store::ShopStore;
pub use supplier_repo::{PurchaseRepository, SupplierRepository};
