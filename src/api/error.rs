// ==========================================
// 裁缝店业务管理系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换下层错误为用户友好的错误消息
// ==========================================

use crate::exporter::error::ExportError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 导入导出错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("文件导出失败: {0}")]
    ExportError(String),

    #[error("配置读取失败: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::CheckConstraintViolation(msg) => {
                ApiError::InvalidInput(format!("检查约束违反: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
        }
    }
}

// ==========================================
// 从 ImportError 转换（文件级致命错误）
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::UnsupportedFormat(_) | ImportError::UnsupportedEncoding(_) => {
                ApiError::InvalidInput(err.to_string())
            }
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

// ==========================================
// 从 ExportError 转换
// ==========================================
impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::InvalidInput(msg) => ApiError::InvalidInput(msg),
            ExportError::Repository(repo_err) => repo_err.into(),
            other => ApiError::ExportError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

/// 配置读取错误转换（配置层沿用 Box<dyn Error>）
pub(crate) fn config_error(err: Box<dyn std::error::Error>) -> ApiError {
    ApiError::ConfigError(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let repo_err = RepositoryError::NotFound {
            entity: "Customer".to_string(),
            id: "42".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("Customer"));
                assert!(msg.contains("42"));
            }
            _ => panic!("Expected NotFound"),
        }
    }

    #[test]
    fn test_import_error_conversion() {
        let api_err: ApiError = ImportError::Decode("bad bytes".to_string()).into();
        assert!(matches!(api_err, ApiError::ImportError(_)));

        let api_err: ApiError = ImportError::UnsupportedEncoding("latin-1".to_string()).into();
        assert!(matches!(api_err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_export_error_conversion() {
        let api_err: ApiError = ExportError::InvalidInput("no columns".to_string()).into();
        assert!(matches!(api_err, ApiError::InvalidInput(_)));
    }
}
