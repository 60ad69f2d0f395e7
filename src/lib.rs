// ==========================================
// 裁缝店业务管理系统 - 核心库
// ==========================================
// 职责: 客户/库存/订单/需求/付款/供应商/采购记录的表格导入导出
// 技术栈: Rust + SQLite + CSV/XLSX
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 表格解码与对账
pub mod importer;

// 导出层 - 列投影与编码
pub mod exporter;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 共享状态
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{EntityKind, ItemType, TabularFormat};

// 领域实体
pub use domain::{
    Customer, DecodedTable, ImportOutcome, InventoryItem, Order, Payment, Purchase, RawRow,
    Requirement, SkipReason, Supplier,
};

// 仓储
pub use repository::ShopStore;

// API
pub use api::{DashboardApi, ExportApi, ImportApi, RecordApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "裁缝店业务管理系统";
