// Central Error Type for the Application

use crate::domain::{QueueId, UserId};
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("User {user_id} is already in queue {queue_id}")]
    AlreadyJoined { queue_id: QueueId, user_id: UserId },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Write contention on a queue; safe to retry
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Prefix storage-level failures with the operation that hit them.
    ///
    /// Domain outcomes (not found, already joined, forbidden, ...) are
    /// returned untouched so callers can still match on them.
    pub fn with_context(self, op: impl std::fmt::Display) -> Self {
        match self {
            AppError::Database(msg) => AppError::Database(format!("{}: {}", op, msg)),
            AppError::Conflict(msg) => AppError::Conflict(format!("{}: {}", op, msg)),
            AppError::Timeout(msg) => AppError::Timeout(format!("{}: {}", op, msg)),
            AppError::Internal(msg) => AppError::Internal(format!("{}: {}", op, msg)),
            other => other,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Conflict(_))
    }

    /// Client-side mistakes, as opposed to server failures
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::Domain(_)
                | AppError::Validation(_)
                | AppError::NotFound(_)
                | AppError::AlreadyJoined { .. }
                | AppError::Forbidden(_)
                | AppError::Unauthorized(_)
        )
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// Note: sqlx::Error conversion is handled in infra-sqlite crate
// by `map_sqlx_error` (orphan rules)
