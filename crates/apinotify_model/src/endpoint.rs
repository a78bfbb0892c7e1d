//! Static configuration for remote API endpoints.

use crate::types::Method;
use std::collections::{BTreeMap, BTreeSet};

/// Static description of one remote endpoint for an entity type.
///
/// An endpoint is a named remote API target. The name doubles as the
/// log/task key and must be unambiguous within one entity type; it is
/// also the default route segment used to build request addresses.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    name: String,
    methods: BTreeSet<Method>,
    options: BTreeMap<Method, BTreeMap<String, String>>,
    skip_predicate: Option<String>,
}

impl EndpointConfig {
    /// Creates an endpoint allowing all HTTP methods.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Method::ALL.into_iter().collect(),
            options: BTreeMap::new(),
            skip_predicate: None,
        }
    }

    /// Restricts the endpoint to the given methods.
    #[must_use]
    pub fn with_methods(mut self, methods: &[Method]) -> Self {
        self.methods = methods.iter().copied().collect();
        self
    }

    /// Sets a method-specific behavior option.
    #[must_use]
    pub fn with_option(
        mut self,
        method: Method,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.options
            .entry(method)
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    /// Names an entity predicate that, when true, skips sync for this
    /// endpoint entirely.
    #[must_use]
    pub fn with_skip_predicate(mut self, predicate: impl Into<String>) -> Self {
        self.skip_predicate = Some(predicate.into());
        self
    }

    /// Returns the endpoint name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the endpoint accepts the given method.
    #[must_use]
    pub fn allows(&self, method: Method) -> bool {
        self.methods.contains(&method)
    }

    /// Looks up a method-specific option value.
    #[must_use]
    pub fn option(&self, method: Method, key: &str) -> Option<&str> {
        self.options
            .get(&method)
            .and_then(|opts| opts.get(key))
            .map(String::as_str)
    }

    /// Returns the skip predicate name, if any.
    #[must_use]
    pub fn skip_predicate(&self) -> Option<&str> {
        self.skip_predicate.as_deref()
    }
}
