//! Core type definitions for apinotify.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a sync task.
///
/// Task ids are the unit of queueing: workers are handed a `TaskId` and
/// look the record up from the task store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new random task ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task:{}", self.0)
    }
}

/// Stable reference to a notifiable entity instance.
///
/// The core never holds entities directly; tasks and logs refer to them
/// by type name plus local identity so they survive process restarts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    /// Entity type name (e.g. `"Vehicle"`).
    pub type_name: String,
    /// Local identity, rendered as a string.
    pub id: String,
}

impl EntityRef {
    /// Creates a new entity reference.
    pub fn new(type_name: impl Into<String>, id: impl fmt::Display) -> Self {
        Self {
            type_name: type_name.into(),
            id: id.to_string(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.type_name, self.id)
    }
}

/// HTTP method used for an outbound sync request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// HTTP POST.
    Post,
    /// HTTP GET.
    Get,
    /// HTTP PUT.
    Put,
    /// HTTP DELETE.
    Delete,
}

impl Method {
    /// All supported methods.
    pub const ALL: [Method; 4] = [Method::Post, Method::Get, Method::Put, Method::Delete];

    /// Returns the lowercase method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Method::Post => "post",
            Method::Get => "get",
            Method::Put => "put",
            Method::Delete => "delete",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked entity lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleEvent {
    /// Entity was created.
    Create,
    /// Entity was updated.
    Update,
    /// Entity was destroyed.
    Destroy,
}

impl LifecycleEvent {
    /// Maps the lifecycle event to the HTTP method used for sync.
    #[must_use]
    pub const fn method(self) -> Method {
        match self {
            LifecycleEvent::Create => Method::Post,
            LifecycleEvent::Update => Method::Put,
            LifecycleEvent::Destroy => Method::Delete,
        }
    }

    /// Returns true if this event must be propagated even when no
    /// tracked field changed.
    #[must_use]
    pub const fn always_syncs(self) -> bool {
        matches!(self, LifecycleEvent::Destroy)
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleEvent::Create => "create",
            LifecycleEvent::Update => "update",
            LifecycleEvent::Destroy => "destroy",
        };
        f.write_str(name)
    }
}

/// Execution status of a sync task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Created or re-enqueued, waiting for a worker.
    Pending,
    /// Completed successfully. Terminal.
    Done,
    /// Last attempt failed. Terminal once the attempt bound is reached.
    Failed,
}

/// Outcome of a sync attempt, used to key notification hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The remote accepted the request.
    Success,
    /// The request failed (transport error or non-2xx).
    Failed,
}
