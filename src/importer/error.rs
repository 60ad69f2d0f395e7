// ==========================================
// 裁缝店业务管理系统 - 导入模块错误类型
// ==========================================
// 分两层:
// - ImportError: 整个文件级别的致命错误，导入中止
// - RowError: 单行可恢复错误，Display 即跳过原因原文
// 工具: thiserror 派生宏
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型（致命）
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件解码失败: {0}")]
    Decode(String),

    #[error("不支持的文件编码: {0}（仅支持 UTF-8）")]
    UnsupportedEncoding(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::XlsxError>
impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

/// 单行错误（可恢复，记录为跳过原因）
#[derive(Error, Debug)]
pub enum RowError {
    #[error("Not enough columns (expected at least {required}, found {found})")]
    NotEnoughColumns { required: usize, found: usize },

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingRequired(Vec<String>),

    #[error("Invalid {expected} for {field}: '{value}'")]
    TypeConversion {
        field: String,
        value: String,
        expected: &'static str,
    },

    #[error("Invalid choice for {field}: '{value}'")]
    InvalidChoice { field: String, value: String },

    #[error("Order not found")]
    OrderNotFound,

    #[error("Inventory item not found")]
    InventoryItemNotFound,

    #[error("Supplier not found")]
    SupplierNotFound,

    #[error("Store error: {0}")]
    Store(#[from] RepositoryError),
}

impl RowError {
    pub fn conversion(field: &str, value: &str, expected: &'static str) -> Self {
        RowError::TypeConversion {
            field: field.to_string(),
            value: value.to_string(),
            expected,
        }
    }
}

/// 单行 Result 类型别名
pub type RowResult<T> = Result<T, RowError>;
