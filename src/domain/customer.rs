// ==========================================
// 裁缝店业务管理系统 - 客户领域模型
// ==========================================
// 对齐: schema customers 表
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Customer - 客户
// ==========================================
// 唯一业务标识: id（自增）；name 不唯一
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,                   // 自增主键（0 = 未落库）
    pub name: String,              // 客户名称（必填）
    pub contact: String,           // 联系方式
    pub address: String,           // 地址
    pub created_at: DateTime<Utc>, // 创建时间
}

impl Customer {
    /// 构造未落库的客户
    pub fn new(name: impl Into<String>, contact: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            contact: contact.into(),
            address: address.into(),
            created_at: Utc::now(),
        }
    }
}
