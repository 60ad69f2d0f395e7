// ==========================================
// 裁缝店业务管理系统 - 订单需求仓储
// ==========================================
// 工序清单以 JSON 数组文本存储
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::order::Requirement;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_utils::{like_pattern, parse_timestamp};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    SELECT id, order_id, description, is_fulfilled, steps_done, steps_not_done,
           notes, created_at, updated_at
    FROM requirements"#;

fn parse_steps(idx: usize, raw: String) -> rusqlite::Result<Vec<String>> {
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<Requirement> {
    Ok(Requirement {
        id: row.get(0)?,
        order_id: row.get(1)?,
        description: row.get(2)?,
        is_fulfilled: row.get(3)?,
        steps_done: parse_steps(4, row.get(4)?)?,
        steps_not_done: parse_steps(5, row.get(5)?)?,
        notes: row.get(6)?,
        created_at: parse_timestamp(row.get(7)?),
        updated_at: parse_timestamp(row.get(8)?),
    })
}

// ==========================================
// RequirementRepository - 订单需求仓储
// ==========================================
pub struct RequirementRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RequirementRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, requirement: &Requirement) -> RepositoryResult<i64> {
        let steps_done = serde_json::to_string(&requirement.steps_done)?;
        let steps_not_done = serde_json::to_string(&requirement.steps_not_done)?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO requirements (
                order_id, description, is_fulfilled, steps_done, steps_not_done,
                notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                requirement.order_id,
                requirement.description,
                requirement.is_fulfilled,
                steps_done,
                steps_not_done,
                requirement.notes,
                requirement.created_at.to_rfc3339(),
                requirement.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按 id 更新，updated_at 刷新为当前时间
    pub fn update(&self, requirement: &Requirement) -> RepositoryResult<()> {
        let steps_done = serde_json::to_string(&requirement.steps_done)?;
        let steps_not_done = serde_json::to_string(&requirement.steps_not_done)?;
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE requirements SET
                order_id = ?1, description = ?2, is_fulfilled = ?3,
                steps_done = ?4, steps_not_done = ?5, notes = ?6, updated_at = ?7
            WHERE id = ?8
            "#,
            params![
                requirement.order_id,
                requirement.description,
                requirement.is_fulfilled,
                steps_done,
                steps_not_done,
                requirement.notes,
                chrono::Utc::now().to_rfc3339(),
                requirement.id,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Requirement".to_string(),
                id: requirement.id.to_string(),
            });
        }
        Ok(())
    }

    pub fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM requirements WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Requirement>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let requirement = conn.query_row(&sql, params![id], map_row).optional()?;
        Ok(requirement)
    }

    /// 子串检索: description / 订单号 / notes
    pub fn search(&self, query: &str) -> RepositoryResult<Vec<Requirement>> {
        if query.trim().is_empty() {
            return self.list_all();
        }
        let conn = self.get_conn()?;
        let sql = format!(
            r#"{} WHERE description LIKE ?1 ESCAPE '\'
                  OR CAST(order_id AS TEXT) LIKE ?1 ESCAPE '\'
                  OR notes LIKE ?1 ESCAPE '\'
               ORDER BY id"#,
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![like_pattern(query)], map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<Requirement>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY id", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n = conn.query_row("SELECT COUNT(*) FROM requirements", [], |row| row.get(0))?;
        Ok(n)
    }
}
