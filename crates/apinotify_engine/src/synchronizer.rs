//! Request shaping and outcome normalization.

use crate::error::SyncResult;
use crate::hooks::HookRegistry;
use crate::route::{pluralize, route_for, AddressResolver};
use crate::transport::Transport;
use apinotify_model::{
    resolve_value, EntitySource, Method, Notifiable, Outcome, SyncLog, SyncLogStore, SyncResponse,
    Task,
};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Executes one sync attempt for a task.
///
/// Builds the outbound request (address from route name + snapshotted
/// identifiers, body from the frozen field names with values re-read
/// live), delegates to the transport, and applies the outcome to the
/// task, the sync log and the notification hooks.
pub struct Synchronizer {
    entities: Arc<dyn EntitySource>,
    transport: Arc<dyn Transport>,
    resolver: Arc<dyn AddressResolver>,
    logs: Arc<dyn SyncLogStore>,
    hooks: Arc<HookRegistry>,
}

impl Synchronizer {
    /// Creates a synchronizer over the given collaborators.
    pub fn new(
        entities: Arc<dyn EntitySource>,
        transport: Arc<dyn Transport>,
        resolver: Arc<dyn AddressResolver>,
        logs: Arc<dyn SyncLogStore>,
        hooks: Arc<HookRegistry>,
    ) -> Self {
        Self {
            entities,
            transport,
            resolver,
            logs,
            hooks,
        }
    }

    /// Runs one attempt and applies its outcome to the task.
    ///
    /// Safe to call more than once for the same task: a repeated call
    /// re-sends the same logical request and re-applies the same state,
    /// relying on the remote being idempotent per (identifiers, fields,
    /// method).
    pub fn synchronize(&self, task: &mut Task) -> SyncResult<SyncResponse> {
        let entity = self.entities.get(&task.entity);
        let response = self.attempt(task, entity.as_deref());

        if response.success {
            task.complete(response.clone());
            if entity.is_some() {
                self.logs
                    .record(SyncLog::now(task.entity.clone(), &task.endpoint))?;
            }
            tracing::info!(task = %task.id, endpoint = %task.endpoint, "sync succeeded");
        } else {
            task.fail(response.clone());
            tracing::debug!(
                task = %task.id,
                endpoint = %task.endpoint,
                status = ?response.status,
                "sync attempt failed"
            );
        }

        if let Some(entity) = entity.as_deref() {
            let outcome = if response.success {
                Outcome::Success
            } else {
                Outcome::Failed
            };
            self.hooks
                .fire(&task.endpoint, task.method, outcome, entity, &response);
        }

        Ok(response)
    }

    fn attempt(&self, task: &Task, entity: Option<&dyn Notifiable>) -> SyncResponse {
        let route = match entity {
            Some(entity) => route_for(entity),
            // Entity already deleted: fall back to the pluralized type
            // name; an explicit route override no longer has a source.
            None => pluralize(&task.entity.type_name),
        };
        let address = self.resolver.resolve(&route, &task.identificators);

        let body = match build_body(task, entity) {
            Ok(body) => body,
            Err(response) => return response,
        };

        match self.transport.send(&address, task.method, &body) {
            Ok(reply) if (200..300).contains(&reply.status) => {
                SyncResponse::success(reply.status, reply.body)
            }
            Ok(reply) => SyncResponse::rejected(reply.status, reply.body),
            Err(message) => SyncResponse::error(message),
        }
    }
}

/// Maps the frozen field names to their current values.
///
/// A deleted entity can still complete delete-method tasks (the address
/// comes from the snapshotted identifiers); for any other method the
/// attempt fails and takes the normal retry path.
fn build_body(task: &Task, entity: Option<&dyn Notifiable>) -> Result<Value, SyncResponse> {
    match entity {
        Some(entity) => Ok(Value::Object(
            task.fields_updated
                .iter()
                .map(|field| (field.clone(), resolve_value(entity, field)))
                .collect(),
        )),
        None if task.method == Method::Delete => Ok(Value::Object(Map::new())),
        None => Err(SyncResponse::error(format!(
            "entity {} no longer available",
            task.entity
        ))),
    }
}
