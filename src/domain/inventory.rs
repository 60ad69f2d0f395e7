// ==========================================
// 裁缝店业务管理系统 - 库存领域模型
// ==========================================
// 对齐: schema inventory_items 表
// ==========================================

use crate::domain::types::ItemType;
use serde::{Deserialize, Serialize};

// ==========================================
// InventoryItem - 库存项（成衣/面料）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: i64,               // 自增主键（0 = 未落库）
    pub item_name: String,     // 品名（必填）
    pub item_type: ItemType,   // 款式类型
    pub fabric_type: String,   // 面料
    pub cost_per_meter: f64,   // 每米成本（2位小数）
    pub total_meters: f64,     // 总米数（2位小数）
    pub taxes: f64,            // 税费（默认 0）
    pub size: String,          // 尺码
    pub color: String,         // 颜色
    pub is_printed: bool,      // 是否印花
    pub stock_quantity: u32,   // 库存数量（非负）
    pub supplier: String,      // 供应商（自由文本，非外键）
}
