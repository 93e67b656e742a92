//! 领域层统一错误定义
//!
//! 聚焦序列化、值校验与存储等最小必要集合，
//! 应用层通过 `From<DomainError>` 统一转换。
//!
use thiserror::Error;

/// 统一错误类型（领域层最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 序列化 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },

    // --- 领域规则 ---
    #[error("invalid value: {reason}")]
    InvalidValue { reason: String },
    #[error("not found: {reason}")]
    NotFound { reason: String },

    // --- 存储 ---
    #[error("repository error: {reason}")]
    Repository { reason: String },
    #[error("commit failed: {reason}")]
    CommitFailed { reason: String },
}

impl DomainError {
    pub fn invalid_value(reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            reason: reason.into(),
        }
    }

    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::NotFound {
            reason: reason.into(),
        }
    }

    pub fn repository(reason: impl Into<String>) -> Self {
        Self::Repository {
            reason: reason.into(),
        }
    }
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;
