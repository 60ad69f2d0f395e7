// ==========================================
// 裁缝店业务管理系统 - 库存仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: 删除库存项时，订单引用置空、采购记录级联删除
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::inventory::InventoryItem;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_utils::{like_pattern, parse_item_type};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    SELECT id, item_name, item_type, fabric_type, cost_per_meter, total_meters,
           taxes, size, color, is_printed, stock_quantity, supplier
    FROM inventory_items"#;

fn map_row(row: &Row<'_>) -> rusqlite::Result<InventoryItem> {
    Ok(InventoryItem {
        id: row.get(0)?,
        item_name: row.get(1)?,
        item_type: parse_item_type(2, row.get(2)?)?,
        fabric_type: row.get(3)?,
        cost_per_meter: row.get(4)?,
        total_meters: row.get(5)?,
        taxes: row.get(6)?,
        size: row.get(7)?,
        color: row.get(8)?,
        is_printed: row.get(9)?,
        stock_quantity: row.get(10)?,
        supplier: row.get(11)?,
    })
}

// ==========================================
// InventoryRepository - 库存仓储
// ==========================================
pub struct InventoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl InventoryRepository {
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

    /// 插入库存项，返回新 id
    pub fn insert(&self, item: &InventoryItem) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO inventory_items (
                item_name, item_type, fabric_type, cost_per_meter, total_meters,
                taxes, size, color, is_printed, stock_quantity, supplier
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                item.item_name,
                item.item_type.code(),
                item.fabric_type,
                item.cost_per_meter,
                item.total_meters,
                item.taxes,
                item.size,
                item.color,
                item.is_printed,
                item.stock_quantity,
                item.supplier,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update(&self, item: &InventoryItem) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE inventory_items SET
                item_name = ?1, item_type = ?2, fabric_type = ?3, cost_per_meter = ?4,
                total_meters = ?5, taxes = ?6, size = ?7, color = ?8, is_printed = ?9,
                stock_quantity = ?10, supplier = ?11
            WHERE id = ?12
            "#,
            params![
                item.item_name,
                item.item_type.code(),
                item.fabric_type,
                item.cost_per_meter,
                item.total_meters,
                item.taxes,
                item.size,
                item.color,
                item.is_printed,
                item.stock_quantity,
                item.supplier,
                item.id,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "InventoryItem".to_string(),
                id: item.id.to_string(),
            });
        }
        Ok(())
    }

    pub fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM inventory_items WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<InventoryItem>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let item = conn.query_row(&sql, params![id], map_row).optional()?;
        Ok(item)
    }

    /// 按品名精确查找（同名时取 id 最小者）
    pub fn find_by_name(&self, item_name: &str) -> RepositoryResult<Option<InventoryItem>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE item_name = ?1 ORDER BY id LIMIT 1", SELECT_COLUMNS);
        let item = conn.query_row(&sql, params![item_name], map_row).optional()?;
        Ok(item)
    }

    /// 子串检索: item_name / fabric_type / supplier / color / size
    pub fn search(&self, query: &str) -> RepositoryResult<Vec<InventoryItem>> {
        if query.trim().is_empty() {
            return self.list_all();
        }
        let conn = self.get_conn()?;
        let sql = format!(
            r#"{} WHERE item_name LIKE ?1 ESCAPE '\' OR fabric_type LIKE ?1 ESCAPE '\'
                  OR supplier LIKE ?1 ESCAPE '\' OR color LIKE ?1 ESCAPE '\'
                  OR size LIKE ?1 ESCAPE '\'
               ORDER BY id"#,
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![like_pattern(query)], map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<InventoryItem>> {
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
        let n = conn.query_row("SELECT COUNT(*) FROM inventory_items", [], |row| row.get(0))?;
        Ok(n)
    }

    /// 低库存数量（stock_quantity <= threshold）
    pub fn count_low_stock(&self, threshold: u32) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n = conn.query_row(
            "SELECT COUNT(*) FROM inventory_items WHERE stock_quantity <= ?1",
            params![threshold],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    /// 库存量前 N 的库存项: (品名, 库存量)
    pub fn top_by_stock(&self, limit: usize) -> RepositoryResult<Vec<(String, i64)>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT item_name, stock_quantity FROM inventory_items ORDER BY stock_quantity DESC, id LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit as i64], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
