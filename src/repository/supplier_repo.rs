// ==========================================
// 裁缝店业务管理系统 - 供应商与采购仓储
// ==========================================
// 包含: SupplierRepository / PurchaseRepository
// 说明: 删除供应商时采购记录级联删除
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::supplier::{Purchase, Supplier};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_utils::{like_pattern, parse_date, parse_timestamp, DATE_FORMAT};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const SUPPLIER_COLUMNS: &str =
    "SELECT id, name, contact, address, email, phone, created_at FROM suppliers";

const PURCHASE_COLUMNS: &str = r#"
    SELECT p.id, p.supplier_id, s.name, p.item_id, i.item_name,
           p.quantity, p.price, p.date, p.notes
    FROM purchases p
    JOIN suppliers s ON s.id = p.supplier_id
    JOIN inventory_items i ON i.id = p.item_id"#;

fn map_supplier(row: &Row<'_>) -> rusqlite::Result<Supplier> {
    Ok(Supplier {
        id: row.get(0)?,
        name: row.get(1)?,
        contact: row.get(2)?,
        address: row.get(3)?,
        email: row.get(4)?,
        phone: row.get(5)?,
        created_at: parse_timestamp(row.get(6)?),
    })
}

fn map_purchase(row: &Row<'_>) -> rusqlite::Result<Purchase> {
    Ok(Purchase {
        id: row.get(0)?,
        supplier_id: row.get(1)?,
        supplier_name: row.get(2)?,
        item_id: row.get(3)?,
        item_name: row.get(4)?,
        quantity: row.get(5)?,
        price: row.get(6)?,
        date: parse_date(7, row.get(7)?)?,
        notes: row.get(8)?,
    })
}

// ==========================================
// SupplierRepository - 供应商仓储
// ==========================================
pub struct SupplierRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SupplierRepository {
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

    pub fn insert(&self, supplier: &Supplier) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO suppliers (name, contact, address, email, phone, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                supplier.name,
                supplier.contact,
                supplier.address,
                supplier.email,
                supplier.phone,
                supplier.created_at.to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update(&self, supplier: &Supplier) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE suppliers SET name = ?1, contact = ?2, address = ?3, email = ?4, phone = ?5
            WHERE id = ?6
            "#,
            params![
                supplier.name,
                supplier.contact,
                supplier.address,
                supplier.email,
                supplier.phone,
                supplier.id,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Supplier".to_string(),
                id: supplier.id.to_string(),
            });
        }
        Ok(())
    }

    pub fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM suppliers WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Supplier>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE id = ?1", SUPPLIER_COLUMNS);
        let supplier = conn.query_row(&sql, params![id], map_supplier).optional()?;
        Ok(supplier)
    }

    /// 按名称精确查找（同名时取 id 最小者）
    pub fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Supplier>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE name = ?1 ORDER BY id LIMIT 1", SUPPLIER_COLUMNS);
        let supplier = conn.query_row(&sql, params![name], map_supplier).optional()?;
        Ok(supplier)
    }

    /// 子串检索: name / contact / address / email / phone
    pub fn search(&self, query: &str) -> RepositoryResult<Vec<Supplier>> {
        if query.trim().is_empty() {
            return self.list_all();
        }
        let conn = self.get_conn()?;
        let sql = format!(
            r#"{} WHERE name LIKE ?1 ESCAPE '\' OR contact LIKE ?1 ESCAPE '\'
                  OR address LIKE ?1 ESCAPE '\' OR email LIKE ?1 ESCAPE '\'
                  OR phone LIKE ?1 ESCAPE '\'
               ORDER BY id"#,
            SUPPLIER_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![like_pattern(query)], map_supplier)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<Supplier>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY id", SUPPLIER_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], map_supplier)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n = conn.query_row("SELECT COUNT(*) FROM suppliers", [], |row| row.get(0))?;
        Ok(n)
    }
}

// ==========================================
// PurchaseRepository - 采购仓储
// ==========================================
pub struct PurchaseRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PurchaseRepository {
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

    pub fn insert(&self, purchase: &Purchase) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO purchases (supplier_id, item_id, quantity, price, date, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                purchase.supplier_id,
                purchase.item_id,
                purchase.quantity,
                purchase.price,
                purchase.date.format(DATE_FORMAT).to_string(),
                purchase.notes,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update(&self, purchase: &Purchase) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE purchases SET
                supplier_id = ?1, item_id = ?2, quantity = ?3, price = ?4, date = ?5, notes = ?6
            WHERE id = ?7
            "#,
            params![
                purchase.supplier_id,
                purchase.item_id,
                purchase.quantity,
                purchase.price,
                purchase.date.format(DATE_FORMAT).to_string(),
                purchase.notes,
                purchase.id,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Purchase".to_string(),
                id: purchase.id.to_string(),
            });
        }
        Ok(())
    }

    pub fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM purchases WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Purchase>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE p.id = ?1", PURCHASE_COLUMNS);
        let purchase = conn.query_row(&sql, params![id], map_purchase).optional()?;
        Ok(purchase)
    }

    /// 子串检索: 供应商名 / 品名 / notes
    pub fn search(&self, query: &str) -> RepositoryResult<Vec<Purchase>> {
        if query.trim().is_empty() {
            return self.list_all();
        }
        let conn = self.get_conn()?;
        let sql = format!(
            r#"{} WHERE s.name LIKE ?1 ESCAPE '\' OR i.item_name LIKE ?1 ESCAPE '\'
                  OR p.notes LIKE ?1 ESCAPE '\'
               ORDER BY p.id"#,
            PURCHASE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![like_pattern(query)], map_purchase)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<Purchase>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY p.id", PURCHASE_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], map_purchase)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n = conn.query_row("SELECT COUNT(*) FROM purchases", [], |row| row.get(0))?;
        Ok(n)
    }
}
