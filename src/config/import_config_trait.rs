// ==========================================
// 裁缝店业务管理系统 - 导入导出配置读取 Trait
// ==========================================
// 职责: 定义导入/导出/看板所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use std::error::Error;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
pub trait ImportConfigReader: Send + Sync {
    /// 汇总消息中展示的跳过原因条数
    ///
    /// # 默认值
    /// - 5
    fn get_skip_reason_preview_limit(&self) -> Result<usize, Box<dyn Error>>;

    /// 未声明编码时使用的编码
    ///
    /// # 默认值
    /// - utf-8
    fn get_default_encoding(&self) -> Result<String, Box<dyn Error>>;

    /// XLSX 导出列宽留白（字符数）
    ///
    /// # 默认值
    /// - 2
    fn get_column_width_padding(&self) -> Result<usize, Box<dyn Error>>;

    /// 低库存阈值（stock_quantity <= 阈值）
    ///
    /// # 默认值
    /// - 5
    fn get_low_stock_threshold(&self) -> Result<u32, Box<dyn Error>>;
}
