// ==========================================
// 裁缝店业务管理系统 - 付款仓储
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::order::Payment;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_utils::{like_pattern, parse_date_opt, DATE_FORMAT};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str =
    "SELECT id, order_id, amount, status, payment_date, notes FROM payments";

fn map_row(row: &Row<'_>) -> rusqlite::Result<Payment> {
    Ok(Payment {
        id: row.get(0)?,
        order_id: row.get(1)?,
        amount: row.get(2)?,
        status: row.get(3)?,
        payment_date: parse_date_opt(4, row.get(4)?)?,
        notes: row.get(5)?,
    })
}

// ==========================================
// PaymentRepository - 付款仓储
// ==========================================
pub struct PaymentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PaymentRepository {
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

    pub fn insert(&self, payment: &Payment) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO payments (order_id, amount, status, payment_date, notes)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                payment.order_id,
                payment.amount,
                payment.status,
                payment.payment_date.map(|d| d.format(DATE_FORMAT).to_string()),
                payment.notes,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update(&self, payment: &Payment) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE payments SET
                order_id = ?1, amount = ?2, status = ?3, payment_date = ?4, notes = ?5
            WHERE id = ?6
            "#,
            params![
                payment.order_id,
                payment.amount,
                payment.status,
                payment.payment_date.map(|d| d.format(DATE_FORMAT).to_string()),
                payment.notes,
                payment.id,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Payment".to_string(),
                id: payment.id.to_string(),
            });
        }
        Ok(())
    }

    pub fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM payments WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Payment>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let payment = conn.query_row(&sql, params![id], map_row).optional()?;
        Ok(payment)
    }

    /// 子串检索: 订单号 / status / notes / amount
    pub fn search(&self, query: &str) -> RepositoryResult<Vec<Payment>> {
        if query.trim().is_empty() {
            return self.list_all();
        }
        let conn = self.get_conn()?;
        let sql = format!(
            r#"{} WHERE CAST(order_id AS TEXT) LIKE ?1 ESCAPE '\'
                  OR status LIKE ?1 ESCAPE '\' OR notes LIKE ?1 ESCAPE '\'
                  OR CAST(amount AS TEXT) LIKE ?1 ESCAPE '\'
               ORDER BY id"#,
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![like_pattern(query)], map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<Payment>> {
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
        let n = conn.query_row("SELECT COUNT(*) FROM payments", [], |row| row.get(0))?;
        Ok(n)
    }

    /// 付款总额
    pub fn total_amount(&self) -> RepositoryResult<f64> {
        let conn = self.get_conn()?;
        let total = conn.query_row("SELECT COALESCE(SUM(amount), 0.0) FROM payments", [], |row| {
            row.get(0)
        })?;
        Ok(total)
    }

    /// 指定状态的付款金额合计（大小写不敏感）
    pub fn total_amount_by_status(&self, status: &str) -> RepositoryResult<f64> {
        let conn = self.get_conn()?;
        let total = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM payments WHERE lower(status) = lower(?1)",
            params![status],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// 每月收入: (YYYY-MM, 金额)，无付款日期的记录不计入
    pub fn revenue_per_month(&self) -> RepositoryResult<Vec<(String, f64)>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT substr(payment_date, 1, 7) AS month, SUM(amount)
            FROM payments
            WHERE payment_date IS NOT NULL AND payment_date != ''
            GROUP BY month
            ORDER BY month
            "#,
        )?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
