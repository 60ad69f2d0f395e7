// ==========================================
// 裁缝店业务管理系统 - 客户仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::customer::Customer;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_utils::{like_pattern, parse_timestamp};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = "SELECT id, name, contact, address, created_at FROM customers";

fn map_row(row: &Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(0)?,
        name: row.get(1)?,
        contact: row.get(2)?,
        address: row.get(3)?,
        created_at: parse_timestamp(row.get(4)?),
    })
}

// ==========================================
// CustomerRepository - 客户仓储
// ==========================================
/// 职责: 管理 customers 表的 CRUD 与检索
pub struct CustomerRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CustomerRepository {
    /// 创建新的 CustomerRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入客户，返回新 id
    pub fn insert(&self, customer: &Customer) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO customers (name, contact, address, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                customer.name,
                customer.contact,
                customer.address,
                customer.created_at.to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按 id 更新（created_at 不变）
    pub fn update(&self, customer: &Customer) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE customers SET name = ?1, contact = ?2, address = ?3 WHERE id = ?4",
            params![customer.name, customer.contact, customer.address, customer.id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Customer".to_string(),
                id: customer.id.to_string(),
            });
        }
        Ok(())
    }

    /// 删除客户（订单级联删除）
    ///
    /// # 返回
    /// - Ok(true): 已删除
    /// - Ok(false): 记录不存在
    pub fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM customers WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Customer>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let customer = conn.query_row(&sql, params![id], map_row).optional()?;
        Ok(customer)
    }

    /// 按名称精确查找（同名时取 id 最小者）
    pub fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Customer>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE name = ?1 ORDER BY id LIMIT 1", SELECT_COLUMNS);
        let customer = conn.query_row(&sql, params![name], map_row).optional()?;
        Ok(customer)
    }

    /// 按名称查找，不存在则创建
    ///
    /// # 返回
    /// - (客户, 是否新建)
    pub fn get_or_create_by_name(&self, name: &str) -> RepositoryResult<(Customer, bool)> {
        if let Some(existing) = self.find_by_name(name)? {
            return Ok((existing, false));
        }
        let mut customer = Customer::new(name, "", "");
        customer.id = self.insert(&customer)?;
        Ok((customer, true))
    }

    /// 子串检索: name / contact / address
    pub fn search(&self, query: &str) -> RepositoryResult<Vec<Customer>> {
        if query.trim().is_empty() {
            return self.list_all();
        }
        let conn = self.get_conn()?;
        let sql = format!(
            r#"{} WHERE name LIKE ?1 ESCAPE '\' OR contact LIKE ?1 ESCAPE '\'
                  OR address LIKE ?1 ESCAPE '\'
               ORDER BY id"#,
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![like_pattern(query)], map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<Customer>> {
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
        let n = conn.query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))?;
        Ok(n)
    }
}
