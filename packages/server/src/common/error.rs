use serde::Serialize;
use thiserror::Error;

use super::auth::AuthError;

/// Stable failure kinds surfaced to callers of the lifecycle operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    InvalidState,
    Conflict,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::InvalidState => "invalid_state",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by request, match and conversation operations.
///
/// Every variant except `Storage` is detected before any write happens.
/// `Storage` wraps persistence failures; whatever unit of work was open is
/// rolled back before it reaches the caller.
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;

impl LifecycleError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState(reason.into())
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict(reason.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LifecycleError::NotFound(_) => ErrorKind::NotFound,
            LifecycleError::Forbidden(_) => ErrorKind::Forbidden,
            LifecycleError::InvalidState(_) => ErrorKind::InvalidState,
            LifecycleError::Conflict(_) => ErrorKind::Conflict,
            LifecycleError::Storage(_) => ErrorKind::Internal,
        }
    }

    /// Human-readable reason that is safe to show to the caller.
    pub fn public_message(&self) -> String {
        match self {
            LifecycleError::NotFound(msg)
            | LifecycleError::Forbidden(msg)
            | LifecycleError::InvalidState(msg)
            | LifecycleError::Conflict(msg) => msg.clone(),
            LifecycleError::Storage(_) => "internal error".to_string(),
        }
    }
}

impl From<AuthError> for LifecycleError {
    fn from(err: AuthError) -> Self {
        LifecycleError::Forbidden(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_errors_hide_details() {
        let err = LifecycleError::from(anyhow::anyhow!("connection reset by peer"));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.public_message(), "internal error");
    }

    #[test]
    fn test_auth_denial_becomes_forbidden() {
        let err = LifecycleError::from(AuthError::PermissionDenied("not the owner".into()));
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert!(err.public_message().contains("not the owner"));
    }
}
