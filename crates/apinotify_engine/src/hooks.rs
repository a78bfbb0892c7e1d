//! Per-endpoint success/failure notification hooks.

use apinotify_model::{Method, Notifiable, Outcome, SyncResponse};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// A notification handler. Receives the live entity and the normalized
/// response of the attempt.
pub type HookFn = Arc<dyn Fn(&dyn Notifiable, &SyncResponse) + Send + Sync>;

/// Registry of per-`(endpoint, method, outcome)` handlers.
///
/// Populated at entity-type registration time; a missing handler is a
/// no-op. Handlers must be idempotent: at-least-once delivery means a
/// hook can fire more than once for the same remote call.
#[derive(Default)]
pub struct HookRegistry {
    handlers: RwLock<HashMap<(String, Method, Outcome), HookFn>>,
}

impl HookRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for an `(endpoint, method, outcome)` triple,
    /// replacing any previous one.
    pub fn register(
        &self,
        endpoint: impl Into<String>,
        method: Method,
        outcome: Outcome,
        handler: HookFn,
    ) {
        self.handlers
            .write()
            .insert((endpoint.into(), method, outcome), handler);
    }

    /// Registers a success handler.
    pub fn on_success<F>(&self, endpoint: impl Into<String>, method: Method, handler: F)
    where
        F: Fn(&dyn Notifiable, &SyncResponse) + Send + Sync + 'static,
    {
        self.register(endpoint, method, Outcome::Success, Arc::new(handler));
    }

    /// Registers a failure handler.
    pub fn on_failure<F>(&self, endpoint: impl Into<String>, method: Method, handler: F)
    where
        F: Fn(&dyn Notifiable, &SyncResponse) + Send + Sync + 'static,
    {
        self.register(endpoint, method, Outcome::Failed, Arc::new(handler));
    }

    /// Fires the handler for the triple, if one is registered.
    pub fn fire(
        &self,
        endpoint: &str,
        method: Method,
        outcome: Outcome,
        entity: &dyn Notifiable,
        response: &SyncResponse,
    ) {
        let handler = self
            .handlers
            .read()
            .get(&(endpoint.to_string(), method, outcome))
            .cloned();
        if let Some(handler) = handler {
            handler(entity, response);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apinotify_model::{EndpointConfig, EntityRef, FieldSource, Identificators};
    use parking_lot::Mutex;
    use serde_json::{json, Value};

    struct Stub;

    impl FieldSource for Stub {
        fn value_of(&self, _field: &str) -> Value {
            Value::Null
        }
    }

    impl Notifiable for Stub {
        fn entity_ref(&self) -> EntityRef {
            EntityRef::new("Stub", 1)
        }

        fn trackable_fields(&self) -> Vec<String> {
            Vec::new()
        }

        fn identificators(&self) -> Identificators {
            Identificators::single("id", "id")
        }

        fn endpoints(&self) -> Vec<EndpointConfig> {
            Vec::new()
        }
    }

    #[test]
    fn missing_handler_is_a_noop() {
        let registry = HookRegistry::new();
        registry.fire(
            "vehicles",
            Method::Post,
            Outcome::Success,
            &Stub,
            &SyncResponse::success(200, Value::Null),
        );
    }

    #[test]
    fn handler_receives_response() {
        let registry = HookRegistry::new();
        let seen: Arc<Mutex<Option<SyncResponse>>> = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);

        registry.on_success("vehicles", Method::Post, move |_entity, response| {
            *sink.lock() = Some(response.clone());
        });

        let response = SyncResponse::success(201, json!({"other": "remote"}));
        registry.fire("vehicles", Method::Post, Outcome::Success, &Stub, &response);

        assert_eq!(seen.lock().as_ref(), Some(&response));
    }

    #[test]
    fn handlers_are_keyed_by_outcome_and_method() {
        let registry = HookRegistry::new();
        let hits = Arc::new(Mutex::new(0u32));
        let sink = Arc::clone(&hits);

        registry.on_failure("vehicles", Method::Put, move |_, _| *sink.lock() += 1);

        let response = SyncResponse::error("down");
        registry.fire("vehicles", Method::Put, Outcome::Success, &Stub, &response);
        registry.fire("vehicles", Method::Post, Outcome::Failed, &Stub, &response);
        registry.fire("inventory", Method::Put, Outcome::Failed, &Stub, &response);
        assert_eq!(*hits.lock(), 0);

        registry.fire("vehicles", Method::Put, Outcome::Failed, &Stub, &response);
        assert_eq!(*hits.lock(), 1);
    }
}
