//! Lifecycle entry points and the retry state machine.

use crate::activation;
use crate::config::EngineConfig;
use crate::error::{SyncError, SyncResult};
use crate::hooks::HookRegistry;
use crate::queue::TaskQueue;
use crate::route::{AddressResolver, BaseUrlResolver};
use crate::synchronizer::Synchronizer;
use crate::tracker::{ChangeSet, ChangeTracker};
use crate::transport::Transport;
use apinotify_model::{
    EndpointConfig, EntityRef, EntitySource, LifecycleEvent, Notifiable, SyncLogStore,
    SyncResponse, Task, TaskId, TaskStore,
};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Drives the sync pipeline: captures change state before a write,
/// decides per endpoint whether a task is needed after it, and runs the
/// worker-side retry state machine.
///
/// Task creation is synchronous and fire-and-forget from the caller's
/// perspective: per-attempt failures never propagate back to the
/// triggering lifecycle event, only to the worker.
pub struct Dispatcher {
    config: EngineConfig,
    tracker: ChangeTracker,
    synchronizer: Synchronizer,
    tasks: Arc<dyn TaskStore>,
    logs: Arc<dyn SyncLogStore>,
    queue: Arc<dyn TaskQueue>,
    pending_changes: Mutex<HashMap<EntityRef, ChangeSet>>,
    in_flight: Mutex<HashSet<TaskId>>,
}

impl Dispatcher {
    /// Creates a dispatcher with the default address resolver (rooted at
    /// the config's base URL) and an empty hook registry.
    pub fn new(
        config: EngineConfig,
        tasks: Arc<dyn TaskStore>,
        logs: Arc<dyn SyncLogStore>,
        entities: Arc<dyn EntitySource>,
        queue: Arc<dyn TaskQueue>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let resolver = Arc::new(BaseUrlResolver::new(&config.base_url));
        Self::with_collaborators(
            config,
            tasks,
            logs,
            entities,
            queue,
            transport,
            resolver,
            Arc::new(HookRegistry::new()),
        )
    }

    /// Creates a dispatcher with explicit resolver and hook registry.
    #[allow(clippy::too_many_arguments)]
    pub fn with_collaborators(
        config: EngineConfig,
        tasks: Arc<dyn TaskStore>,
        logs: Arc<dyn SyncLogStore>,
        entities: Arc<dyn EntitySource>,
        queue: Arc<dyn TaskQueue>,
        transport: Arc<dyn Transport>,
        resolver: Arc<dyn AddressResolver>,
        hooks: Arc<HookRegistry>,
    ) -> Self {
        Self {
            tracker: ChangeTracker::new(logs.clone()),
            synchronizer: Synchronizer::new(entities, transport, resolver, logs.clone(), hooks),
            config,
            tasks,
            logs,
            queue,
            pending_changes: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Captures the entity's per-endpoint change state.
    ///
    /// Must run before the pending write commits: the dirty flags it
    /// reads are only valid until then. The snapshot is consumed by the
    /// matching [`Dispatcher::on_after_write`].
    pub fn on_before_write(&self, entity: &dyn Notifiable) -> SyncResult<()> {
        if !activation::is_active() {
            return Ok(());
        }
        let changes = self.tracker.capture(entity)?;
        self.pending_changes
            .lock()
            .insert(entity.entity_ref(), changes);
        Ok(())
    }

    /// Runs the dispatch decision for every configured endpoint.
    ///
    /// Returns the ids of the tasks created; one lifecycle event fans
    /// out into zero, one, or many tasks.
    pub fn on_after_write(
        &self,
        entity: &dyn Notifiable,
        event: LifecycleEvent,
    ) -> SyncResult<Vec<TaskId>> {
        if !activation::is_active() {
            return Ok(Vec::new());
        }

        let entity_ref = entity.entity_ref();
        let changes = self
            .pending_changes
            .lock()
            .remove(&entity_ref)
            .unwrap_or_default();

        let mut created = Vec::new();
        for endpoint in entity.endpoints() {
            if self.skips(entity, &endpoint, event, &changes) {
                tracing::debug!(
                    entity = %entity_ref,
                    endpoint = endpoint.name(),
                    %event,
                    "sync skipped"
                );
                continue;
            }

            let task = Task::new(
                entity_ref.clone(),
                endpoint.name(),
                event.method(),
                changes.fields_for(endpoint.name()).to_vec(),
                entity.identificators().resolve(entity),
            );
            let id = task.id;
            tracing::debug!(
                task = %id,
                entity = %entity_ref,
                endpoint = endpoint.name(),
                method = %task.method,
                "sync task created"
            );
            self.tasks.insert(task)?;
            self.queue.enqueue(id);
            created.push(id);
        }

        if event == LifecycleEvent::Destroy {
            // Sync history cascades with the entity. Tasks stay for audit.
            self.logs.remove_entity(&entity_ref)?;
        }

        Ok(created)
    }

    /// The per-endpoint dispatch decision.
    fn skips(
        &self,
        entity: &dyn Notifiable,
        endpoint: &EndpointConfig,
        event: LifecycleEvent,
        changes: &ChangeSet,
    ) -> bool {
        if !endpoint.allows(event.method()) {
            return true;
        }
        if entity.skip_api_notify() {
            return true;
        }
        if let Some(predicate) = endpoint.skip_predicate() {
            if entity.predicate(predicate) {
                return true;
            }
        }
        !event.always_syncs() && changes.fields_for(endpoint.name()).is_empty()
    }

    /// Worker-side entry point: runs one execution attempt for a task.
    ///
    /// At-least-once queue delivery is expected: a redelivered done task
    /// is a no-op, a concurrently executing task id is skipped, and an
    /// already exhausted task never gets another attempt. On a failed
    /// attempt under the bound, the task is re-enqueued; on the final
    /// failure [`SyncError::Exhausted`] is returned.
    pub fn execute(&self, id: TaskId) -> SyncResult<()> {
        if !self.in_flight.lock().insert(id) {
            tracing::debug!(task = %id, "task already in flight, skipping");
            return Ok(());
        }
        let result = self.execute_locked(id);
        self.in_flight.lock().remove(&id);
        result
    }

    fn execute_locked(&self, id: TaskId) -> SyncResult<()> {
        let mut task = self
            .tasks
            .get(id)?
            .ok_or(SyncError::TaskNotFound(id))?;

        if task.is_done() {
            return Ok(());
        }

        let max_attempts = self.config.retry.max_attempts;
        if task.is_failed() && task.attempts >= max_attempts {
            // Redelivery of an exhausted task: never a further attempt.
            return Err(self.exhausted(&task));
        }

        task.begin_attempt();
        self.synchronizer.synchronize(&mut task)?;
        self.tasks.update(&task)?;

        if task.is_done() {
            return Ok(());
        }

        if task.attempts < max_attempts {
            let delay = self.config.retry.delay_for_attempt(task.attempts);
            tracing::warn!(
                task = %id,
                attempt = task.attempts,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                "sync attempt failed, retrying"
            );
            self.queue.enqueue_after(id, delay);
            Ok(())
        } else {
            Err(self.exhausted(&task))
        }
    }

    fn exhausted(&self, task: &Task) -> SyncError {
        let response = task
            .response
            .clone()
            .unwrap_or_else(|| SyncResponse::error("no response recorded"));
        tracing::warn!(
            task = %task.id,
            entity = %task.entity,
            endpoint = %task.endpoint,
            attempts = task.attempts,
            response = ?response,
            "synchronization exhausted"
        );
        SyncError::Exhausted {
            task: task.id,
            attempts: task.attempts,
            response,
        }
    }
}
