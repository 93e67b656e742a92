use crate::validation::ValidationErrors;
use todo_domain::error::DomainError;

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("unexpected: {0}")]
    Unexpected(String),

    // --- 装配错误（启动期暴露，不面向调用方） ---
    #[error("handler not found: {0}")]
    HandlerNotFound(&'static str),

    #[error("handler already registered: request={request}")]
    AlreadyRegistered { request: &'static str },

    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl AppError {
    pub fn not_found(entity: &str, key: impl std::fmt::Display) -> Self {
        AppError::NotFound(format!("Entity \"{entity}\" ({key}) was not found."))
    }

    pub fn unexpected(reason: impl Into<String>) -> Self {
        AppError::Unexpected(reason.into())
    }

    /// 单字段校验失败
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        AppError::Validation(errors)
    }

    /// 是否为装配/配置类错误
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            AppError::HandlerNotFound(_)
                | AppError::AlreadyRegistered { .. }
                | AppError::TypeMismatch { .. }
        )
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { reason } => AppError::NotFound(reason),
            other => AppError::Unexpected(other.to_string()),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_not_found_maps_to_not_found() {
        let err: AppError = DomainError::not_found("TodoItem (9)").into();
        assert!(matches!(err, AppError::NotFound(reason) if reason == "TodoItem (9)"));
    }

    #[test]
    fn other_domain_errors_are_unexpected() {
        let err: AppError = DomainError::repository("disk on fire").into();
        assert!(matches!(err, AppError::Unexpected(_)));
        assert!(!err.is_configuration());
        assert!(AppError::HandlerNotFound("X").is_configuration());
    }
}
