// ==========================================
// 裁缝店业务管理系统 - 仓储集合
// ==========================================
// 职责: 所有实体仓储共享同一 SQLite 连接
// ==========================================

use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::customer_repo::CustomerRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::inventory_repo::InventoryRepository;
use crate::repository::order_repo::OrderRepository;
use crate::repository::payment_repo::PaymentRepository;
use crate::repository::requirement_repo::RequirementRepository;
use crate::repository::supplier_repo::{PurchaseRepository, SupplierRepository};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// 记录存储: 七张业务表的仓储集合
pub struct ShopStore {
    conn: Arc<Mutex<Connection>>,
    pub customers: CustomerRepository,
    pub inventory: InventoryRepository,
    pub orders: OrderRepository,
    pub requirements: RequirementRepository,
    pub payments: PaymentRepository,
    pub suppliers: SupplierRepository,
    pub purchases: PurchaseRepository,
}

impl ShopStore {
    /// 打开数据库文件并确保表结构存在
    pub fn open(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    /// 从已有连接创建（调用方负责建表）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            customers: CustomerRepository::from_connection(conn.clone()),
            inventory: InventoryRepository::from_connection(conn.clone()),
            orders: OrderRepository::from_connection(conn.clone()),
            requirements: RequirementRepository::from_connection(conn.clone()),
            payments: PaymentRepository::from_connection(conn.clone()),
            suppliers: SupplierRepository::from_connection(conn.clone()),
            purchases: PurchaseRepository::from_connection(conn.clone()),
            conn,
        }
    }

    /// 共享连接（配置管理器复用）
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        self.conn.clone()
    }
}
