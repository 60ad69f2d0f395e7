// ==========================================
// 裁缝店业务管理系统 - 导出模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导出模块错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("CSV 写入失败: {0}")]
    CsvWriteError(String),

    #[error("Excel 写入失败: {0}")]
    XlsxWriteError(String),

    #[error("文件写入失败: {0}")]
    FileWriteError(String),

    #[error("数据读取失败: {0}")]
    Repository(#[from] RepositoryError),
}

// 实现 From<csv::Error>
impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::CsvWriteError(err.to_string())
    }
}

// 实现 From<rust_xlsxwriter::XlsxError>
impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::XlsxWriteError(err.to_string())
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::FileWriteError(err.to_string())
    }
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
