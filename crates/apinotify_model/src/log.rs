//! Sync history records.

use crate::types::EntityRef;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Record of a successful sync of one entity to one endpoint.
///
/// Presence of a log row for `(entity, endpoint)` means the entity has
/// been synced to that endpoint at least once; absence forces a
/// full-field sync on first contact. Rows are written only on
/// successful task completion and removed only when the owning entity
/// is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncLog {
    /// The synced entity.
    pub entity: EntityRef,
    /// Endpoint name.
    pub endpoint: String,
    /// Time of the most recent successful sync.
    pub synced_at: SystemTime,
}

impl SyncLog {
    /// Creates a log row stamped with the current time.
    pub fn now(entity: EntityRef, endpoint: impl Into<String>) -> Self {
        Self {
            entity,
            endpoint: endpoint.into(),
            synced_at: SystemTime::now(),
        }
    }
}
