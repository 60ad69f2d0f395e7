// ==========================================
// 裁缝店业务管理系统 - 采购领域模型
// ==========================================
// 包含: Supplier / Purchase
// 关联: Purchase → Supplier、Purchase → InventoryItem（均级联删除）
// ==========================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Supplier - 供应商
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: i64,                   // 自增主键（0 = 未落库）
    pub name: String,              // 名称（必填）
    pub contact: String,           // 联系人
    pub address: String,           // 地址
    pub email: String,             // 邮箱
    pub phone: String,             // 电话
    pub created_at: DateTime<Utc>, // 创建时间
}

// ==========================================
// Purchase - 采购记录
// ==========================================
// supplier_name / item_name 为查询时 JOIN 填充的展示字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: i64,               // 自增主键（0 = 未落库）
    pub supplier_id: i64,      // 供应商（FK）
    pub supplier_name: String, // 供应商名称（展示）
    pub item_id: i64,          // 库存项（FK）
    pub item_name: String,     // 库存品名（展示）
    pub quantity: u32,         // 数量
    pub price: f64,            // 单价（2位小数）
    pub date: NaiveDate,       // 采购日期
    pub notes: String,         // 备注
}
