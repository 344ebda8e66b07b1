//! Shared primitives for all RBAC console crates.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Result type used across RBAC console crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories.
///
/// Every variant carries a human-readable message only; callers branch on the
/// variant, never on the text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Invalid input or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Login was attempted with credentials that do not match.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Access token could not be renewed.
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    /// Caller is not authenticated against the backend.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is authenticated but blocked by backend policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the message carried by the error without its category prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(message)
            | Self::NotFound(message)
            | Self::InvalidCredentials(message)
            | Self::RefreshFailed(message)
            | Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::Internal(message) => message.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn display_includes_category_prefix() {
        let error = AppError::NotFound("user '9'".to_owned());
        assert_eq!(error.to_string(), "not found: user '9'");
    }

    #[test]
    fn message_strips_category_prefix() {
        let error = AppError::InvalidCredentials("use admin@demo.com / demo123".to_owned());
        assert_eq!(error.message(), "use admin@demo.com / demo123");
    }
}
