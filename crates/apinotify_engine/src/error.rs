//! Error types for the sync engine.

use apinotify_model::{StoreError, SyncResponse, TaskId};
use thiserror::Error;

/// Result type for engine operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors surfaced by the dispatcher and worker.
///
/// Per-attempt transport failures are not errors at this level: they
/// are recorded on the task and consumed by the retry loop. Only final
/// exhaustion, and infrastructure faults around it, escape.
#[derive(Error, Debug)]
pub enum SyncError {
    /// A task failed its final attempt and is terminally failed.
    #[error("synchronization exhausted for {task} after {attempts} attempts")]
    Exhausted {
        /// The exhausted task.
        task: TaskId,
        /// Attempts made.
        attempts: u32,
        /// The last recorded response.
        response: SyncResponse,
    },

    /// A worker was handed an id with no matching task record.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// A persistence collaborator failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl SyncError {
    /// Returns true for final exhaustion, the only failure that must be
    /// alerted on.
    #[must_use]
    pub fn is_exhaustion(&self) -> bool {
        matches!(self, SyncError::Exhausted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_display_names_the_task() {
        let id = TaskId::new();
        let err = SyncError::Exhausted {
            task: id,
            attempts: 5,
            response: SyncResponse::error("boom"),
        };
        assert!(err.to_string().contains(&id.to_string()));
        assert!(err.to_string().contains('5'));
        assert!(err.is_exhaustion());
    }

    #[test]
    fn store_error_converts() {
        let err: SyncError = StoreError::Backend("disk full".into()).into();
        assert!(!err.is_exhaustion());
        assert!(err.to_string().contains("disk full"));
    }
}
