//! Error types for the model crate.

use crate::types::TaskId;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by persistence collaborators.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Task lookup by id failed.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The backing store failed.
    #[error("storage backend error: {0}")]
    Backend(String),
}
