// ==========================================
// 裁缝店业务管理系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::db::open_sqlite_connection;
use crate::domain::import::DEFAULT_SKIP_PREVIEW_LIMIT;
use crate::exporter::DEFAULT_COLUMN_PADDING;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::warn;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 读取数值配置，格式错误时回退默认值
    fn get_parsed_or_default<T: FromStr + Copy>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>> {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(v) => Ok(v),
                Err(_) => {
                    warn!(key, value = %raw, "配置值格式错误，使用默认值");
                    Ok(default)
                }
            },
        }
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at) VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key"
        )?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
            ))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }
}

impl ImportConfigReader for ConfigManager {
    fn get_skip_reason_preview_limit(&self) -> Result<usize, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::SKIP_REASON_PREVIEW_LIMIT, DEFAULT_SKIP_PREVIEW_LIMIT)
    }

    fn get_default_encoding(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_or_default(config_keys::DEFAULT_ENCODING, "utf-8")
    }

    fn get_column_width_padding(&self) -> Result<usize, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::COLUMN_WIDTH_PADDING, DEFAULT_COLUMN_PADDING)
    }

    fn get_low_stock_threshold(&self) -> Result<u32, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::LOW_STOCK_THRESHOLD, 5)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 导入
    pub const SKIP_REASON_PREVIEW_LIMIT: &str = "import.skip_reason_preview_limit";
    pub const DEFAULT_ENCODING: &str = "import.default_encoding";

    // 导出
    pub const COLUMN_WIDTH_PADDING: &str = "export.column_width_padding";

    // 看板
    pub const LOW_STOCK_THRESHOLD: &str = "dashboard.low_stock_threshold";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = manager();
        assert_eq!(config.get_skip_reason_preview_limit().unwrap(), 5);
        assert_eq!(config.get_default_encoding().unwrap(), "utf-8");
        assert_eq!(config.get_column_width_padding().unwrap(), 2);
        assert_eq!(config.get_low_stock_threshold().unwrap(), 5);
    }

    #[test]
    fn test_set_overrides_and_bad_values_fall_back() {
        let config = manager();
        config
            .set_global_config_value(config_keys::SKIP_REASON_PREVIEW_LIMIT, "3")
            .unwrap();
        config
            .set_global_config_value(config_keys::LOW_STOCK_THRESHOLD, "many")
            .unwrap();

        assert_eq!(config.get_skip_reason_preview_limit().unwrap(), 3);
        assert_eq!(config.get_low_stock_threshold().unwrap(), 5);

        config
            .set_global_config_value(config_keys::SKIP_REASON_PREVIEW_LIMIT, "8")
            .unwrap();
        assert_eq!(config.get_skip_reason_preview_limit().unwrap(), 8);

        let snapshot = config.get_config_snapshot().unwrap();
        assert!(snapshot.contains("import.skip_reason_preview_limit"));
    }
}
