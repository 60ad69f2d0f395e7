// ==========================================
// 裁缝店业务管理系统 - 导入API
// ==========================================
// 职责: 解码上传文件 → 对账 → 生成用户可读汇总
// 说明: 仅文件解码失败返回 Err；逐行问题体现在汇总中
// ==========================================

use crate::api::error::{config_error, ApiResult};
use crate::config::{ConfigManager, ImportConfigReader};
use crate::domain::import::{ImportOutcome, SkipReason};
use crate::domain::types::{EntityKind, TabularFormat};
use crate::importer::{ImportReconciler, UniversalFileParser};
use crate::repository::ShopStore;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportApiResponse {
    /// 批次ID（日志关联）
    pub batch_id: String,
    /// 计数与全部跳过原因
    pub outcome: ImportOutcome,
    /// 一行汇总: "Created N customers. Updated M. ..."
    pub message: String,
    /// 前 N 条跳过原因
    pub preview: Vec<SkipReason>,
    /// 跳过原因是否多于预览条数
    pub truncated: bool,
    /// 导入耗时（毫秒）
    pub elapsed_ms: i64,
}

/// 导入API
pub struct ImportApi {
    store: Arc<ShopStore>,
    config: Arc<ConfigManager>,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    pub fn new(store: Arc<ShopStore>, config: Arc<ConfigManager>) -> Self {
        Self { store, config }
    }

    /// 导入上传的字节
    ///
    /// # 参数
    /// - kind: 实体种类
    /// - bytes: 文件内容
    /// - format: CSV / XLSX
    /// - encoding: 声明编码（None 时取配置默认值）
    /// - has_header: 首行是否为表头
    ///
    /// # 返回
    /// - Ok(ImportApiResponse): 导入汇总（可能含跳过行）
    /// - Err(ApiError): 文件无法解码
    pub fn import_bytes(
        &self,
        kind: EntityKind,
        bytes: &[u8],
        format: TabularFormat,
        encoding: Option<&str>,
        has_header: bool,
    ) -> ApiResult<ImportApiResponse> {
        let started = Instant::now();

        let encoding = match encoding {
            Some(enc) => enc.to_string(),
            None => self.config.get_default_encoding().map_err(config_error)?,
        };
        let preview_limit = self
            .config
            .get_skip_reason_preview_limit()
            .map_err(config_error)?;

        let table = UniversalFileParser.decode(bytes, format, &encoding, has_header)?;

        let reconciler = ImportReconciler::new(&self.store);
        let outcome = reconciler.reconcile(&table, kind);

        let (preview, truncated) = outcome.preview(preview_limit);
        let response = ImportApiResponse {
            batch_id: reconciler.batch_id().to_string(),
            message: outcome.summary_message(preview_limit),
            preview: preview.to_vec(),
            truncated,
            elapsed_ms: started.elapsed().as_millis() as i64,
            outcome,
        };

        info!(
            batch_id = %response.batch_id,
            kind = %kind,
            elapsed_ms = response.elapsed_ms,
            "{}",
            response.message
        );

        Ok(response)
    }

    /// 导入本地文件（格式按扩展名识别）
    pub fn import_file(
        &self,
        kind: EntityKind,
        file_path: &Path,
        encoding: Option<&str>,
        has_header: bool,
    ) -> ApiResult<ImportApiResponse> {
        let format = UniversalFileParser::detect_format(file_path)?;
        let bytes = std::fs::read(file_path)
            .map_err(crate::importer::ImportError::from)?;
        self.import_bytes(kind, &bytes, format, encoding, has_header)
    }
}
