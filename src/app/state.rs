// ==========================================
// 裁缝店业务管理系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::{DashboardApi, ExportApi, ImportApi, RecordApi};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::ShopStore;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "TAILOR_SHOP_DB_PATH";

/// 应用状态
///
/// 所有 API 共享同一个数据库连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 仓储集合
    pub store: Arc<ShopStore>,

    /// 配置管理器
    pub config: Arc<ConfigManager>,

    /// 导入API
    pub import_api: Arc<ImportApi>,

    /// 导出API
    pub export_api: Arc<ExportApi>,

    /// 驾驶舱API
    pub dashboard_api: Arc<DashboardApi>,

    /// 记录API
    pub record_api: Arc<RecordApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（不存在时自动创建并建表）
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        // 创建数据库连接（共享连接）
        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层与配置层
        // ==========================================
        let store = Arc::new(ShopStore::from_connection(conn));
        let config = Arc::new(
            ConfigManager::from_connection(store.connection())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 初始化API层
        // ==========================================
        let import_api = Arc::new(ImportApi::new(store.clone(), config.clone()));
        let export_api = Arc::new(ExportApi::new(store.clone(), config.clone()));
        let dashboard_api = Arc::new(DashboardApi::new(store.clone(), config.clone()));
        let record_api = Arc::new(RecordApi::new(store.clone()));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            store,
            config,
            import_api,
            export_api,
            dashboard_api,
            record_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    // 允许通过环境变量显式指定 DB 路径（便于调试/测试）
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./tailor_shop.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("tailor-shop");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("tailor_shop.db");
        }
    }

    path.to_string_lossy().to_string()
}
