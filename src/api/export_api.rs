// ==========================================
// 裁缝店业务管理系统 - 导出API
// ==========================================
// 职责: 读取记录 → 列投影 → CSV/XLSX 编码 → 下载文件
// ==========================================

use crate::api::error::{config_error, ApiResult};
use crate::config::{ConfigManager, ImportConfigReader};
use crate::domain::customer::Customer;
use crate::domain::inventory::InventoryItem;
use crate::domain::order::{Order, Payment, Requirement};
use crate::domain::supplier::{Purchase, Supplier};
use crate::domain::types::{EntityKind, TabularFormat};
use crate::exporter::{
    export_filename, project, sample_template_csv, template_filename, FileWriter,
};
use crate::importer::TabularEntity;
use crate::repository::ShopStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// 可下载文件
#[derive(Debug, Clone, Serialize)]
pub struct ExportedFile {
    /// 文件名（customers.csv / sample_orders.csv ...）
    pub filename: String,
    /// MIME 类型
    pub mime_type: String,
    /// 文件内容
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// 导出API
pub struct ExportApi {
    store: Arc<ShopStore>,
    config: Arc<ConfigManager>,
}

impl ExportApi {
    /// 创建新的ExportApi实例
    pub fn new(store: Arc<ShopStore>, config: Arc<ConfigManager>) -> Self {
        Self { store, config }
    }

    /// 导出实体记录
    ///
    /// # 参数
    /// - kind: 实体种类
    /// - selected: 选择的列键（空 → 全部列）
    /// - query: 搜索条件（None / 空白 → 全部记录）
    /// - format: CSV / XLSX
    pub fn export(
        &self,
        kind: EntityKind,
        selected: &[String],
        query: Option<&str>,
        format: TabularFormat,
    ) -> ApiResult<ExportedFile> {
        match kind {
            EntityKind::Customer => self.export_as::<Customer>(selected, query, format),
            EntityKind::InventoryItem => self.export_as::<InventoryItem>(selected, query, format),
            EntityKind::Order => self.export_as::<Order>(selected, query, format),
            EntityKind::Requirement => self.export_as::<Requirement>(selected, query, format),
            EntityKind::Payment => self.export_as::<Payment>(selected, query, format),
            EntityKind::Supplier => self.export_as::<Supplier>(selected, query, format),
            EntityKind::Purchase => self.export_as::<Purchase>(selected, query, format),
        }
    }

    /// 按实体类型导出
    pub fn export_as<T: TabularEntity>(
        &self,
        selected: &[String],
        query: Option<&str>,
        format: TabularFormat,
    ) -> ApiResult<ExportedFile> {
        let padding = self.config.get_column_width_padding().map_err(config_error)?;

        let records = T::load(&self.store, query)?;
        let projection = project(&records, &T::schema(), selected)?;

        let bytes = FileWriter::new(padding).encode(
            &projection.rows,
            &projection.columns,
            format,
            T::KIND.file_stem(),
        )?;

        info!(
            kind = %T::KIND,
            format = format.extension(),
            rows = projection.rows.len(),
            columns = projection.columns.len(),
            "导出完成"
        );

        Ok(ExportedFile {
            filename: export_filename(T::KIND, format),
            mime_type: format.mime_type().to_string(),
            bytes,
        })
    }

    /// 导入样例模板（CSV）
    pub fn template(&self, kind: EntityKind) -> ApiResult<ExportedFile> {
        let bytes = sample_template_csv(kind)?;
        Ok(ExportedFile {
            filename: template_filename(kind),
            mime_type: TabularFormat::Csv.mime_type().to_string(),
            bytes,
        })
    }
}
