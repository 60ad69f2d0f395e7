// ==========================================
// 裁缝店业务管理系统 - 订单仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: 查询时 JOIN 客户/库存表填充展示名称
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::order::Order;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_utils::{
    like_pattern, parse_date, parse_date_opt, parse_item_type, DATE_FORMAT,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    SELECT o.id, o.customer_id, c.name, o.inventory_item_id, i.item_name,
           o.product_type, o.measurements, o.status, o.notes,
           o.order_date, o.delivery_date
    FROM orders o
    JOIN customers c ON c.id = o.customer_id
    LEFT JOIN inventory_items i ON i.id = o.inventory_item_id"#;

fn map_row(row: &Row<'_>) -> rusqlite::Result<Order> {
    Ok(Order {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        customer_name: row.get(2)?,
        inventory_item_id: row.get(3)?,
        inventory_item_name: row.get(4)?,
        product_type: parse_item_type(5, row.get(5)?)?,
        measurements: row.get(6)?,
        status: row.get(7)?,
        notes: row.get(8)?,
        order_date: parse_date(9, row.get(9)?)?,
        delivery_date: parse_date_opt(10, row.get(10)?)?,
    })
}

// ==========================================
// OrderRepository - 订单仓储
// ==========================================
pub struct OrderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OrderRepository {
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

    /// 插入订单，返回新 id
    ///
    /// customer_id 必须已存在（外键约束）
    pub fn insert(&self, order: &Order) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO orders (
                customer_id, inventory_item_id, product_type, measurements,
                status, notes, order_date, delivery_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                order.customer_id,
                order.inventory_item_id,
                order.product_type.code(),
                order.measurements,
                order.status,
                order.notes,
                order.order_date.format(DATE_FORMAT).to_string(),
                order.delivery_date.map(|d| d.format(DATE_FORMAT).to_string()),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update(&self, order: &Order) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE orders SET
                customer_id = ?1, inventory_item_id = ?2, product_type = ?3,
                measurements = ?4, status = ?5, notes = ?6,
                order_date = ?7, delivery_date = ?8
            WHERE id = ?9
            "#,
            params![
                order.customer_id,
                order.inventory_item_id,
                order.product_type.code(),
                order.measurements,
                order.status,
                order.notes,
                order.order_date.format(DATE_FORMAT).to_string(),
                order.delivery_date.map(|d| d.format(DATE_FORMAT).to_string()),
                order.id,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Order".to_string(),
                id: order.id.to_string(),
            });
        }
        Ok(())
    }

    /// 删除订单（需求、付款级联删除）
    pub fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM orders WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Order>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE o.id = ?1", SELECT_COLUMNS);
        let order = conn.query_row(&sql, params![id], map_row).optional()?;
        Ok(order)
    }

    /// 子串检索: 客户名 / status / product_type / notes
    pub fn search(&self, query: &str) -> RepositoryResult<Vec<Order>> {
        if query.trim().is_empty() {
            return self.list_all();
        }
        let conn = self.get_conn()?;
        let sql = format!(
            r#"{} WHERE c.name LIKE ?1 ESCAPE '\' OR o.status LIKE ?1 ESCAPE '\'
                  OR o.product_type LIKE ?1 ESCAPE '\' OR o.notes LIKE ?1 ESCAPE '\'
               ORDER BY o.id"#,
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![like_pattern(query)], map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<Order>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY o.id", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n = conn.query_row("SELECT COUNT(*) FROM orders", [], |row| row.get(0))?;
        Ok(n)
    }

    /// 指定状态的订单数（大小写不敏感）
    pub fn count_by_status(&self, status: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n = conn.query_row(
            "SELECT COUNT(*) FROM orders WHERE lower(status) = lower(?1)",
            params![status],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    /// 每月订单数: (YYYY-MM, 数量)，按月份升序
    pub fn count_per_month(&self) -> RepositoryResult<Vec<(String, i64)>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT substr(order_date, 1, 7) AS month, COUNT(*)
            FROM orders
            GROUP BY month
            ORDER BY month
            "#,
        )?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// 订单数前 N 的客户: (客户名, 订单数)
    pub fn top_customers(&self, limit: usize) -> RepositoryResult<Vec<(String, i64)>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT c.name, COUNT(o.id) AS order_count
            FROM customers c
            JOIN orders o ON o.customer_id = c.id
            GROUP BY c.id
            ORDER BY order_count DESC, c.id
            LIMIT ?1
            "#,
        )?;
        let rows = stmt
            .query_map(params![limit as i64], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
