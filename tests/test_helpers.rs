// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

#![allow(dead_code)]

use chrono::NaiveDate;
use std::error::Error;
use tailor_shop::app::AppState;
use tailor_shop::db::{init_schema, open_sqlite_connection};
use tailor_shop::logging;
use tailor_shop::domain::{Customer, InventoryItem, ItemType, Order, Supplier};
use tailor_shop::repository::ShopStore;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().ok_or("临时路径非 UTF-8")?.to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 创建临时数据库上的应用状态
pub fn create_test_state() -> (NamedTempFile, AppState) {
    logging::init_test();
    let (temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = AppState::new(db_path).expect("Failed to create AppState");
    (temp_file, state)
}

/// 创建临时数据库上的仓储集合
pub fn create_test_store() -> (NamedTempFile, ShopStore) {
    let (temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let store = ShopStore::open(&db_path).expect("Failed to open store");
    (temp_file, store)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

// ==========================================
// 测试数据
// ==========================================

pub fn seed_customer(store: &ShopStore, name: &str) -> i64 {
    store
        .customers
        .insert(&Customer::new(name, "555-0000", "1 Test St"))
        .expect("Failed to seed customer")
}

pub fn seed_item(store: &ShopStore, name: &str, stock: u32) -> i64 {
    let item = InventoryItem {
        id: 0,
        item_name: name.to_string(),
        item_type: ItemType::Unstitched,
        fabric_type: "Cotton".to_string(),
        cost_per_meter: 12.5,
        total_meters: 40.0,
        taxes: 0.0,
        size: "M".to_string(),
        color: "White".to_string(),
        is_printed: false,
        stock_quantity: stock,
        supplier: "Acme Textiles".to_string(),
    };
    store.inventory.insert(&item).expect("Failed to seed item")
}

pub fn seed_order(store: &ShopStore, customer_id: i64, status: &str, order_date: NaiveDate) -> i64 {
    let order = Order {
        id: 0,
        customer_id,
        customer_name: String::new(),
        inventory_item_id: None,
        inventory_item_name: None,
        product_type: ItemType::Stitched,
        measurements: None,
        status: status.to_string(),
        notes: String::new(),
        order_date,
        delivery_date: None,
    };
    store.orders.insert(&order).expect("Failed to seed order")
}

pub fn seed_supplier(store: &ShopStore, name: &str) -> i64 {
    let supplier = Supplier {
        id: 0,
        name: name.to_string(),
        contact: "John Smith".to_string(),
        address: "1 Mill Road".to_string(),
        email: "sales@acme.test".to_string(),
        phone: "555-0100".to_string(),
        created_at: chrono::Utc::now(),
    };
    store.suppliers.insert(&supplier).expect("Failed to seed supplier")
}
