// ==========================================
// 管道库存系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换Repository错误为调用方可读的错误消息
// 约束: 错误消息面向最终用户（英文），日志使用中文
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("{0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// 管道编号冲突（重复检测命中或唯一索引兜底）
    #[error("Pipe number already exists: {0}")]
    DuplicateKey(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    // ==========================================
    // 导入错误
    // ==========================================
    #[error("Import failed: {0}")]
    ImportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("Internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, ApiError::DuplicateKey(_))
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={})", entity, id))
            }
            // 唯一索引只建在 pipe_number 上
            RepositoryError::UniqueConstraintViolation(msg) => ApiError::DuplicateKey(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::ValidationError(format!("{}: {}", field, message))
            }
            RepositoryError::LockError(msg) | RepositoryError::DatabaseQueryError(msg) => {
                ApiError::DatabaseError(msg)
            }
            RepositoryError::Other(e) => ApiError::Other(e),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Other(e) => ApiError::Other(e),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

/// API层Result类型别名
pub type ApiResult<T> = Result<T, ApiError>;
