// ==========================================
// 裁缝店业务管理系统 - API 层
// ==========================================
// 职责: 绑定编解码、对账器、投影器与仓储，返回用户可读结果
// ==========================================

pub mod dashboard_api;
pub mod error;
pub mod export_api;
pub mod import_api;
pub mod record_api;

// 重导出核心类型
pub use dashboard_api::{DashboardAnalytics, DashboardApi, DashboardSummary};
pub use error::{ApiError, ApiResult};
pub use export_api::{ExportApi, ExportedFile};
pub use import_api::{ImportApi, ImportApiResponse};
pub use record_api::RecordApi;
