//! Error taxonomy for queue operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::EntryStatus;

/// Result alias used by every queue operation.
pub type QueueResult<T> = Result<T, QueueError>;

/// Errors surfaced by the walk-in queue.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum QueueError {
    /// The backing store could not be reached or did not answer in time.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// The operation targeted an entry that does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The requested status change is not allowed.
    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: EntryStatus, to: EntryStatus },

    /// Malformed input, rejected before reaching the store.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl QueueError {
    /// Whether this error should be reported as a server-side failure.
    pub fn is_server_failure(&self) -> bool {
        matches!(self, QueueError::StoreUnavailable(_))
    }

    pub fn store(msg: impl std::fmt::Display) -> Self {
        QueueError::StoreUnavailable(msg.to_string())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        QueueError::Validation(msg.into())
    }
}
