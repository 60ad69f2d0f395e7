// ==========================================
// 裁缝店业务管理系统 - 订单领域模型
// ==========================================
// 包含: Order / Requirement / Payment
// 关联: Order → Customer（必选）、Order → InventoryItem（可选）
//       Requirement → Order、Payment → Order
// ==========================================

use crate::domain::types::ItemType;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Order - 订单
// ==========================================
// customer_name / inventory_item_name 为查询时 JOIN 填充的展示字段，不落库
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    // ===== 主键与关联 =====
    pub id: i64,                                 // 自增主键（0 = 未落库）
    pub customer_id: i64,                        // 客户（FK，级联删除）
    pub customer_name: String,                   // 客户名称（展示）
    pub inventory_item_id: Option<i64>,          // 库存项（FK，删除置空）
    pub inventory_item_name: Option<String>,     // 库存品名（展示）

    // ===== 订单内容 =====
    pub product_type: ItemType,                  // 款式类型
    pub measurements: Option<String>,            // 量体数据（JSON 文本，原样存储）
    pub status: String,                          // 状态（Pending / Completed / Shipped ...）
    pub notes: String,                           // 备注

    // ===== 日期 =====
    pub order_date: NaiveDate,                   // 下单日期
    pub delivery_date: Option<NaiveDate>,        // 交付日期
}

// ==========================================
// Requirement - 订单需求（工序清单）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub id: i64,                      // 自增主键（0 = 未落库）
    pub order_id: Option<i64>,        // 订单（FK，可空，级联删除）
    pub description: String,          // 需求描述（必填）
    pub is_fulfilled: bool,           // 是否完成
    pub steps_done: Vec<String>,      // 已完成工序
    pub steps_not_done: Vec<String>,  // 未完成工序
    pub notes: String,                // 备注
    pub created_at: DateTime<Utc>,    // 创建时间
    pub updated_at: DateTime<Utc>,    // 更新时间
}

// ==========================================
// Payment - 付款
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,                          // 自增主键（0 = 未落库）
    pub order_id: i64,                    // 订单（FK，级联删除）
    pub amount: f64,                      // 金额（2位小数）
    pub status: String,                   // 状态（默认 Pending）
    pub payment_date: Option<NaiveDate>,  // 付款日期
    pub notes: String,                    // 备注
}
