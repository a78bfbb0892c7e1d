//! Repository traits and in-memory implementations.
//!
//! The engine only sees these seams; production embedders back them
//! with their own persistence, while the memory implementations serve
//! tests and single-process deployments.

use crate::entity::Notifiable;
use crate::error::{StoreError, StoreResult};
use crate::log::SyncLog;
use crate::task::Task;
use crate::types::{EntityRef, TaskId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Persistence for sync tasks. Lookup by id must be available to
/// workers.
pub trait TaskStore: Send + Sync {
    /// Persists a newly created task.
    fn insert(&self, task: Task) -> StoreResult<()>;

    /// Fetches a task by id.
    fn get(&self, id: TaskId) -> StoreResult<Option<Task>>;

    /// Writes back an executed task's status, response and attempts.
    fn update(&self, task: &Task) -> StoreResult<()>;

    /// Lists all tasks spawned by an entity, in insertion order.
    fn for_entity(&self, entity: &EntityRef) -> StoreResult<Vec<Task>>;
}

/// Persistence for sync history rows.
pub trait SyncLogStore: Send + Sync {
    /// Finds the log row for an `(entity, endpoint)` pair.
    fn find(&self, entity: &EntityRef, endpoint: &str) -> StoreResult<Option<SyncLog>>;

    /// Upserts a log row. Concurrent writers are last-write-wins on
    /// `synced_at`.
    fn record(&self, log: SyncLog) -> StoreResult<()>;

    /// Removes all log rows for an entity (cascade on entity deletion).
    fn remove_entity(&self, entity: &EntityRef) -> StoreResult<()>;
}

/// Lookup of live entities at task-execution time.
///
/// Returns `None` once the entity has been deleted; tasks deliberately
/// outlive their entity.
pub trait EntitySource: Send + Sync {
    /// Fetches the entity behind a reference, if it still exists.
    fn get(&self, entity: &EntityRef) -> Option<Arc<dyn Notifiable>>;
}

/// In-memory task store.
#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<HashMap<TaskId, Task>>,
    order: RwLock<Vec<TaskId>>,
}

impl MemoryTaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.read().len()
    }

    /// Returns true if no tasks are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.read().is_empty()
    }
}

impl TaskStore for MemoryTaskStore {
    fn insert(&self, task: Task) -> StoreResult<()> {
        self.order.write().push(task.id);
        self.tasks.write().insert(task.id, task);
        Ok(())
    }

    fn get(&self, id: TaskId) -> StoreResult<Option<Task>> {
        Ok(self.tasks.read().get(&id).cloned())
    }

    fn update(&self, task: &Task) -> StoreResult<()> {
        let mut tasks = self.tasks.write();
        match tasks.get_mut(&task.id) {
            Some(existing) => {
                *existing = task.clone();
                Ok(())
            }
            None => Err(StoreError::TaskNotFound(task.id)),
        }
    }

    fn for_entity(&self, entity: &EntityRef) -> StoreResult<Vec<Task>> {
        let tasks = self.tasks.read();
        Ok(self
            .order
            .read()
            .iter()
            .filter_map(|id| tasks.get(id))
            .filter(|task| &task.entity == entity)
            .cloned()
            .collect())
    }
}

/// In-memory sync log store.
#[derive(Default)]
pub struct MemorySyncLogStore {
    logs: RwLock<HashMap<(EntityRef, String), SyncLog>>,
}

impl MemorySyncLogStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SyncLogStore for MemorySyncLogStore {
    fn find(&self, entity: &EntityRef, endpoint: &str) -> StoreResult<Option<SyncLog>> {
        Ok(self
            .logs
            .read()
            .get(&(entity.clone(), endpoint.to_string()))
            .cloned())
    }

    fn record(&self, log: SyncLog) -> StoreResult<()> {
        self.logs
            .write()
            .insert((log.entity.clone(), log.endpoint.clone()), log);
        Ok(())
    }

    fn remove_entity(&self, entity: &EntityRef) -> StoreResult<()> {
        self.logs.write().retain(|(owner, _), _| owner != entity);
        Ok(())
    }
}

/// In-memory entity registry.
#[derive(Default)]
pub struct MemoryEntitySource {
    entities: RwLock<HashMap<EntityRef, Arc<dyn Notifiable>>>,
}

impl MemoryEntitySource {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces an entity.
    pub fn insert(&self, entity: Arc<dyn Notifiable>) {
        self.entities.write().insert(entity.entity_ref(), entity);
    }

    /// Removes an entity (simulating deletion).
    pub fn remove(&self, entity: &EntityRef) {
        self.entities.write().remove(entity);
    }
}

impl EntitySource for MemoryEntitySource {
    fn get(&self, entity: &EntityRef) -> Option<Arc<dyn Notifiable>> {
        self.entities.read().get(entity).cloned()
    }
}
