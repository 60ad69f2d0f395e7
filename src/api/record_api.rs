// ==========================================
// 裁缝店业务管理系统 - 记录API
// ==========================================
// 职责: 按实体种类查询/删除/计数，供列表页与CLI使用
// 说明: 新建与更新走导入管道，这里只提供读取与删除
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::customer::Customer;
use crate::domain::inventory::InventoryItem;
use crate::domain::order::{Order, Payment, Requirement};
use crate::domain::supplier::{Purchase, Supplier};
use crate::domain::types::EntityKind;
use crate::importer::{ImportableEntity, TabularEntity};
use crate::repository::ShopStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// 记录API
pub struct RecordApi {
    store: Arc<ShopStore>,
}

impl RecordApi {
    /// 创建新的RecordApi实例
    pub fn new(store: Arc<ShopStore>) -> Self {
        Self { store }
    }

    /// 搜索记录（query 为空时返回全部）
    pub fn search<T: TabularEntity>(&self, query: Option<&str>) -> ApiResult<Vec<T>> {
        Ok(T::load(&self.store, query)?)
    }

    /// 按 id 读取，不存在时返回 NotFound
    pub fn get<T: ImportableEntity>(&self, id: i64) -> ApiResult<T> {
        T::find(&self.store, id)?
            .ok_or_else(|| ApiError::NotFound(format!("{}(id={})不存在", T::KIND, id)))
    }

    /// 搜索记录并序列化为 JSON 数组
    pub fn search_json(&self, kind: EntityKind, query: Option<&str>) -> ApiResult<serde_json::Value> {
        match kind {
            EntityKind::Customer => self.search_value::<Customer>(query),
            EntityKind::InventoryItem => self.search_value::<InventoryItem>(query),
            EntityKind::Order => self.search_value::<Order>(query),
            EntityKind::Requirement => self.search_value::<Requirement>(query),
            EntityKind::Payment => self.search_value::<Payment>(query),
            EntityKind::Supplier => self.search_value::<Supplier>(query),
            EntityKind::Purchase => self.search_value::<Purchase>(query),
        }
    }

    fn search_value<T: TabularEntity + Serialize>(
        &self,
        query: Option<&str>,
    ) -> ApiResult<serde_json::Value> {
        let records = self.search::<T>(query)?;
        serde_json::to_value(records).map_err(|e| ApiError::InternalError(e.to_string()))
    }

    /// 删除记录（级联由外键约束完成）
    pub fn delete(&self, kind: EntityKind, id: i64) -> ApiResult<()> {
        let deleted = match kind {
            EntityKind::Customer => self.store.customers.delete(id)?,
            EntityKind::InventoryItem => self.store.inventory.delete(id)?,
            EntityKind::Order => self.store.orders.delete(id)?,
            EntityKind::Requirement => self.store.requirements.delete(id)?,
            EntityKind::Payment => self.store.payments.delete(id)?,
            EntityKind::Supplier => self.store.suppliers.delete(id)?,
            EntityKind::Purchase => self.store.purchases.delete(id)?,
        };

        if !deleted {
            return Err(ApiError::NotFound(format!("{}(id={})不存在", kind, id)));
        }
        info!(kind = %kind, id, "记录已删除");
        Ok(())
    }

    /// 记录数
    pub fn count(&self, kind: EntityKind) -> ApiResult<i64> {
        let n = match kind {
            EntityKind::Customer => self.store.customers.count()?,
            EntityKind::InventoryItem => self.store.inventory.count()?,
            EntityKind::Order => self.store.orders.count()?,
            EntityKind::Requirement => self.store.requirements.count()?,
            EntityKind::Payment => self.store.payments.count()?,
            EntityKind::Supplier => self.store.suppliers.count()?,
            EntityKind::Purchase => self.store.purchases.count()?,
        };
        Ok(n)
    }
}
