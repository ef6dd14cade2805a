//! Error taxonomy for queue operations
//!
//! Storage failures are surfaced to the caller wrapped in [`QueueError`],
//! never swallowed. The engine performs no internal retries: of its
//! operations only `promote` (idempotent) and `list_day` (pure read) are safe
//! to retry blindly, and retry policy belongs to the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    /// No valid principal presented
    #[error("Authentication required")]
    Unauthenticated,

    /// Principal present but role insufficient
    #[error("Insufficient role: {0}")]
    Forbidden(String),

    /// Referenced appointment or patient does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// Record no longer matches the expected precondition
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Malformed input
    #[error("Invalid request: {0}")]
    Invalid(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unexpected failure in a collaborator (token issuance, hashing, ...)
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, QueueError>;
