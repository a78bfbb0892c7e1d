//! The persisted unit of outbound sync work.

use crate::identificators::ResolvedIdentificators;
use crate::types::{EntityRef, Method, TaskId, TaskStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized outcome of one sync attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncResponse {
    /// Whether the remote accepted the request.
    pub success: bool,
    /// HTTP status code, when a response was received at all.
    pub status: Option<u16>,
    /// Response body, or an error description for transport failures.
    pub body: Value,
}

impl SyncResponse {
    /// Builds a successful response.
    pub fn success(status: u16, body: Value) -> Self {
        Self {
            success: true,
            status: Some(status),
            body,
        }
    }

    /// Builds a rejected response (non-2xx status received).
    pub fn rejected(status: u16, body: Value) -> Self {
        Self {
            success: false,
            status: Some(status),
            body,
        }
    }

    /// Builds a transport-level failure with no HTTP status.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            status: None,
            body: Value::String(message.into()),
        }
    }
}

/// A point-in-time, replayable unit of outbound sync work.
///
/// # Invariants
///
/// - `fields_updated` and `identificators` are snapshots taken at
///   creation time and never recomputed.
/// - A `Done` task is immutable; a `Failed` task may be retried under
///   the same identity until the attempt bound is reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Task identity, used as the queue key.
    pub id: TaskId,
    /// The entity that spawned this task.
    pub entity: EntityRef,
    /// Target endpoint name.
    pub endpoint: String,
    /// HTTP method for the request.
    pub method: Method,
    /// Names of the fields to send, frozen at creation time. Values are
    /// re-read live at execution time.
    pub fields_updated: Vec<String>,
    /// Identifier values addressing the remote resource.
    pub identificators: ResolvedIdentificators,
    /// Current execution status.
    pub status: TaskStatus,
    /// Outcome of the most recent attempt.
    pub response: Option<SyncResponse>,
    /// Number of execution attempts so far.
    pub attempts: u32,
}

impl Task {
    /// Creates a pending task.
    pub fn new(
        entity: EntityRef,
        endpoint: impl Into<String>,
        method: Method,
        fields_updated: Vec<String>,
        identificators: ResolvedIdentificators,
    ) -> Self {
        Self {
            id: TaskId::new(),
            entity,
            endpoint: endpoint.into(),
            method,
            fields_updated,
            identificators,
            status: TaskStatus::Pending,
            response: None,
            attempts: 0,
        }
    }

    /// Records the start of an execution attempt.
    pub fn begin_attempt(&mut self) {
        self.attempts += 1;
        self.status = TaskStatus::Pending;
    }

    /// Marks the task as successfully completed.
    pub fn complete(&mut self, response: SyncResponse) {
        self.status = TaskStatus::Done;
        self.response = Some(response);
    }

    /// Marks the current attempt as failed.
    pub fn fail(&mut self, response: SyncResponse) {
        self.status = TaskStatus::Failed;
        self.response = Some(response);
    }

    /// Returns true if the task completed successfully.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Returns true if the last attempt failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.status == TaskStatus::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn task() -> Task {
        Task::new(
            EntityRef::new("Vehicle", 1),
            "vehicles",
            Method::Post,
            vec!["vin".to_string(), "make".to_string()],
            ResolvedIdentificators::default(),
        )
    }

    #[test]
    fn new_task_is_pending() {
        let task = task();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.attempts, 0);
        assert!(task.response.is_none());
    }

    #[test]
    fn attempts_strictly_increase() {
        let mut task = task();
        task.begin_attempt();
        task.fail(SyncResponse::error("connection refused"));
        assert_eq!(task.attempts, 1);
        assert!(task.is_failed());

        task.begin_attempt();
        assert_eq!(task.attempts, 2);
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[test]
    fn complete_stores_response() {
        let mut task = task();
        task.begin_attempt();
        task.complete(SyncResponse::success(200, json!({"other": "ok"})));
        assert!(task.is_done());
        let response = task.response.unwrap();
        assert!(response.success);
        assert_eq!(response.status, Some(200));
    }

    #[test]
    fn field_names_are_frozen() {
        let task = task();
        assert_eq!(task.fields_updated, vec!["vin", "make"]);
    }

    #[test]
    fn task_roundtrips_through_serde() {
        let task = task();
        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }
}
