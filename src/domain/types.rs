// ==========================================
// 裁缝店业务管理系统 - 领域类型定义
// ==========================================
// 职责: 实体种类、款式类型等跨模块共享的枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 实体种类 (Entity Kind)
// ==========================================
// 每个种类对应一张表、一个导入导出 schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Customer,
    InventoryItem,
    Order,
    Requirement,
    Payment,
    Supplier,
    Purchase,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Customer,
        EntityKind::InventoryItem,
        EntityKind::Order,
        EntityKind::Requirement,
        EntityKind::Payment,
        EntityKind::Supplier,
        EntityKind::Purchase,
    ];

    /// 稳定标识（CLI 参数、日志字段）
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Customer => "customer",
            EntityKind::InventoryItem => "inventory_item",
            EntityKind::Order => "order",
            EntityKind::Requirement => "requirement",
            EntityKind::Payment => "payment",
            EntityKind::Supplier => "supplier",
            EntityKind::Purchase => "purchase",
        }
    }

    /// 导入汇总消息中使用的复数名称
    pub fn plural_label(&self) -> &'static str {
        match self {
            EntityKind::Customer => "customers",
            EntityKind::InventoryItem => "inventory items",
            EntityKind::Order => "orders",
            EntityKind::Requirement => "requirements",
            EntityKind::Payment => "payments",
            EntityKind::Supplier => "suppliers",
            EntityKind::Purchase => "purchases",
        }
    }

    /// 下载文件名主干（customers.csv / inventory.xlsx ...）
    pub fn file_stem(&self) -> &'static str {
        match self {
            EntityKind::Customer => "customers",
            EntityKind::InventoryItem => "inventory",
            EntityKind::Order => "orders",
            EntityKind::Requirement => "requirements",
            EntityKind::Payment => "payments",
            EntityKind::Supplier => "suppliers",
            EntityKind::Purchase => "purchases",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "customer" | "customers" => Ok(EntityKind::Customer),
            "inventory" | "inventory_item" | "inventory_items" | "item" | "items" => {
                Ok(EntityKind::InventoryItem)
            }
            "order" | "orders" => Ok(EntityKind::Order),
            "requirement" | "requirements" => Ok(EntityKind::Requirement),
            "payment" | "payments" => Ok(EntityKind::Payment),
            "supplier" | "suppliers" => Ok(EntityKind::Supplier),
            "purchase" | "purchases" => Ok(EntityKind::Purchase),
            other => Err(format!("unknown entity kind: {}", other)),
        }
    }
}

// ==========================================
// 款式类型 (Item Type)
// ==========================================
// 库存项 item_type 与订单 product_type 共用
// 数据库存储: 小写代码 (stitched / unstitched)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Stitched,   // 成衣
    Unstitched, // 面料
}

impl ItemType {
    /// 数据库代码
    pub fn code(&self) -> &'static str {
        match self {
            ItemType::Stitched => "stitched",
            ItemType::Unstitched => "unstitched",
        }
    }

    /// 导出展示标签
    pub fn label(&self) -> &'static str {
        match self {
            ItemType::Stitched => "Stitched",
            ItemType::Unstitched => "Unstitched",
        }
    }

    /// 严格按代码解析（大小写不敏感）
    pub fn from_code(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "stitched" => Some(ItemType::Stitched),
            "unstitched" => Some(ItemType::Unstitched),
            _ => None,
        }
    }

    /// 宽松解析: 先按代码，否则按首字母 s/u 推断
    pub fn infer(value: &str) -> Option<Self> {
        if let Some(t) = Self::from_code(value) {
            return Some(t);
        }
        match value.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('s') => Some(ItemType::Stitched),
            Some('u') => Some(ItemType::Unstitched),
            _ => None,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ==========================================
// 表格文件格式 (Tabular Format)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabularFormat {
    Csv,
    Xlsx,
}

impl TabularFormat {
    /// 按扩展名识别（.csv / .xlsx / .xls）
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim().trim_start_matches('.').to_lowercase().as_str() {
            "csv" => Some(TabularFormat::Csv),
            "xlsx" | "xls" => Some(TabularFormat::Xlsx),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            TabularFormat::Csv => "csv",
            TabularFormat::Xlsx => "xlsx",
        }
    }

    /// 下载响应的 MIME 类型
    pub fn mime_type(&self) -> &'static str {
        match self {
            TabularFormat::Csv => "text/csv",
            TabularFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

impl FromStr for TabularFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| format!("unsupported format: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_type_infer() {
        assert_eq!(ItemType::infer("Stitched"), Some(ItemType::Stitched));
        assert_eq!(ItemType::infer("UNSTITCHED"), Some(ItemType::Unstitched));
        assert_eq!(ItemType::infer("suit"), Some(ItemType::Stitched));
        assert_eq!(ItemType::infer("u"), Some(ItemType::Unstitched));
        assert_eq!(ItemType::infer("linen"), None);
        assert_eq!(ItemType::infer(""), None);
    }

    #[test]
    fn test_entity_kind_from_str() {
        assert_eq!("Customers".parse::<EntityKind>(), Ok(EntityKind::Customer));
        assert_eq!("inventory".parse::<EntityKind>(), Ok(EntityKind::InventoryItem));
        assert_eq!("inventory-item".parse::<EntityKind>(), Ok(EntityKind::InventoryItem));
        assert!("widgets".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_tabular_format_from_extension() {
        assert_eq!(TabularFormat::from_extension(".CSV"), Some(TabularFormat::Csv));
        assert_eq!(TabularFormat::from_extension("xls"), Some(TabularFormat::Xlsx));
        assert_eq!(TabularFormat::from_extension("pdf"), None);
        assert_eq!(TabularFormat::Csv.mime_type(), "text/csv");
    }
}
