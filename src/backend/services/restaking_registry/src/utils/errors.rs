use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage operation `{operation}` timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Corrupt row: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl RegistryError {
    /// Whether a caller may reasonably retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RegistryError::Timeout { .. } | RegistryError::Database(sqlx::Error::PoolTimedOut)
        )
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeouts_are_retryable() {
        let err = RegistryError::Timeout {
            operation: "list_restakers",
            after: Duration::from_secs(1),
        };
        assert!(err.is_retryable());
        assert!(RegistryError::Database(sqlx::Error::PoolTimedOut).is_retryable());
        assert!(!RegistryError::Database(sqlx::Error::RowNotFound).is_retryable());
        assert!(!RegistryError::NotFound("val_001".into()).is_retryable());
    }
}
