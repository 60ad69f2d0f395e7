// ==========================================
// 裁缝店业务管理系统 - 驾驶舱API
// ==========================================
// 职责: 汇总计数与按月统计，供首页展示
// ==========================================

use crate::api::error::{config_error, ApiResult};
use crate::config::{ConfigManager, ImportConfigReader};
use crate::repository::ShopStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// 排行榜条数
pub const TOP_N: usize = 10;

/// 待处理状态（订单/付款共用）
const PENDING_STATUS: &str = "Pending";

/// 汇总计数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_customers: i64,
    pub total_orders: i64,
    /// 状态为 Pending 的订单（大小写不敏感）
    pub pending_orders: i64,
    pub inventory_items: i64,
    /// 库存数量 <= 阈值的库存项
    pub low_stock_items: i64,
    pub low_stock_threshold: u32,
    /// 全部付款金额
    pub total_payments: f64,
    /// 状态为 Pending 的付款金额
    pub outstanding_payments: f64,
    pub total_suppliers: i64,
    pub total_purchases: i64,
}

/// 趋势统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardAnalytics {
    /// (YYYY-MM, 订单数)
    pub orders_per_month: Vec<(String, i64)>,
    /// (YYYY-MM, 收入)
    pub revenue_per_month: Vec<(String, f64)>,
    /// (库存项名称, 库存数量)
    pub top_stock_items: Vec<(String, i64)>,
    /// (客户名, 订单数)
    pub top_customers: Vec<(String, i64)>,
}

/// 驾驶舱API
pub struct DashboardApi {
    store: Arc<ShopStore>,
    config: Arc<ConfigManager>,
}

impl DashboardApi {
    /// 创建新的DashboardApi实例
    pub fn new(store: Arc<ShopStore>, config: Arc<ConfigManager>) -> Self {
        Self { store, config }
    }

    /// 汇总计数
    pub fn summary(&self) -> ApiResult<DashboardSummary> {
        let threshold = self
            .config
            .get_low_stock_threshold()
            .map_err(config_error)?;

        let summary = DashboardSummary {
            total_customers: self.store.customers.count()?,
            total_orders: self.store.orders.count()?,
            pending_orders: self.store.orders.count_by_status(PENDING_STATUS)?,
            inventory_items: self.store.inventory.count()?,
            low_stock_items: self.store.inventory.count_low_stock(threshold)?,
            low_stock_threshold: threshold,
            total_payments: self.store.payments.total_amount()?,
            outstanding_payments: self.store.payments.total_amount_by_status(PENDING_STATUS)?,
            total_suppliers: self.store.suppliers.count()?,
            total_purchases: self.store.purchases.count()?,
        };

        debug!(?summary, "驾驶舱汇总");
        Ok(summary)
    }

    /// 趋势统计
    pub fn analytics(&self) -> ApiResult<DashboardAnalytics> {
        Ok(DashboardAnalytics {
            orders_per_month: self.store.orders.count_per_month()?,
            revenue_per_month: self.store.payments.revenue_per_month()?,
            top_stock_items: self.store.inventory.top_by_stock(TOP_N)?,
            top_customers: self.store.orders.top_customers(TOP_N)?,
        })
    }
}
