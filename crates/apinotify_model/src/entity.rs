//! Traits implemented by host entities.
//!
//! The core does not own entities. It only requires that an entity can
//! report its identity, expose tracked field values and per-field dirty
//! state, and describe the endpoints it synchronizes to. Lifecycle
//! detection itself (knowing when a save happened) stays with the host
//! framework, which calls into the engine's dispatcher.

use crate::endpoint::EndpointConfig;
use crate::identificators::Identificators;
use crate::types::EntityRef;
use serde_json::Value;

/// Read access to an entity's fields.
///
/// Field paths may traverse one related entity via a dotted segment
/// (`"dealer.title"`). Implementations only need to answer for their own
/// flat fields; traversal is handled by [`resolve_value`] and
/// [`resolve_changed`].
pub trait FieldSource {
    /// Returns the current value of a flat (non-dotted) field.
    ///
    /// Unknown fields resolve to `Value::Null`.
    fn value_of(&self, field: &str) -> Value;

    /// Returns true if the flat field changed since the tracked snapshot.
    ///
    /// Only meaningful before the pending write is committed; related
    /// entities that do not track dirty state may keep the default.
    fn changed(&self, _field: &str) -> bool {
        false
    }

    /// Returns the related entity for a dotted path's first segment.
    fn related(&self, _name: &str) -> Option<&dyn FieldSource> {
        None
    }
}

/// An entity type that notifies remote endpoints of its changes.
pub trait Notifiable: FieldSource + Send + Sync {
    /// Stable reference for this instance.
    fn entity_ref(&self) -> EntityRef;

    /// Ordered list of fields monitored for change detection.
    fn trackable_fields(&self) -> Vec<String>;

    /// Logical key → field path mapping used to address the remote
    /// resource. Must contain at least one entry.
    fn identificators(&self) -> Identificators;

    /// Endpoints this entity type synchronizes to.
    fn endpoints(&self) -> Vec<EndpointConfig>;

    /// Explicit route name override. When `None`, the pluralized
    /// lowercased type name is used.
    fn route_name(&self) -> Option<String> {
        None
    }

    /// Per-save opt-out: when true, no tasks are created for this save.
    fn skip_api_notify(&self) -> bool {
        false
    }

    /// Evaluates a named predicate (used by endpoint skip predicates).
    ///
    /// Unknown predicate names evaluate to false.
    fn predicate(&self, _name: &str) -> bool {
        false
    }
}

/// Resolves a possibly dotted field path to its current value.
///
/// A missing related entity resolves to `Value::Null` rather than
/// failing; paths traverse at most one hop.
pub fn resolve_value<S: FieldSource + ?Sized>(source: &S, path: &str) -> Value {
    match path.split_once('.') {
        Some((relation, field)) => match source.related(relation) {
            Some(related) => related.value_of(field),
            None => Value::Null,
        },
        None => source.value_of(path),
    }
}

/// Resolves a possibly dotted field path to its dirty flag.
///
/// A missing related entity resolves to false.
pub fn resolve_changed<S: FieldSource + ?Sized>(source: &S, path: &str) -> bool {
    match path.split_once('.') {
        Some((relation, field)) => match source.related(relation) {
            Some(related) => related.changed(field),
            None => false,
        },
        None => source.changed(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    struct Flat {
        values: HashMap<String, Value>,
        dirty: Vec<String>,
    }

    impl FieldSource for Flat {
        fn value_of(&self, field: &str) -> Value {
            self.values.get(field).cloned().unwrap_or(Value::Null)
        }

        fn changed(&self, field: &str) -> bool {
            self.dirty.iter().any(|f| f == field)
        }
    }

    struct WithRelation {
        own: Flat,
        dealer: Option<Flat>,
    }

    impl FieldSource for WithRelation {
        fn value_of(&self, field: &str) -> Value {
            self.own.value_of(field)
        }

        fn changed(&self, field: &str) -> bool {
            self.own.changed(field)
        }

        fn related(&self, name: &str) -> Option<&dyn FieldSource> {
            match name {
                "dealer" => self.dealer.as_ref().map(|d| d as &dyn FieldSource),
                _ => None,
            }
        }
    }

    fn vehicle(with_dealer: bool) -> WithRelation {
        WithRelation {
            own: Flat {
                values: HashMap::from([("vin".to_string(), json!("ABC"))]),
                dirty: vec!["vin".to_string()],
            },
            dealer: with_dealer.then(|| Flat {
                values: HashMap::from([("title".to_string(), json!("Main St Motors"))]),
                dirty: vec!["title".to_string()],
            }),
        }
    }

    #[test]
    fn flat_field_resolution() {
        let v = vehicle(true);
        assert_eq!(resolve_value(&v, "vin"), json!("ABC"));
        assert!(resolve_changed(&v, "vin"));
    }

    #[test]
    fn dotted_field_resolution() {
        let v = vehicle(true);
        assert_eq!(resolve_value(&v, "dealer.title"), json!("Main St Motors"));
        assert!(resolve_changed(&v, "dealer.title"));
    }

    #[test]
    fn missing_relation_resolves_empty() {
        let v = vehicle(false);
        assert_eq!(resolve_value(&v, "dealer.title"), Value::Null);
        assert!(!resolve_changed(&v, "dealer.title"));
    }

    #[test]
    fn unknown_field_resolves_null() {
        let v = vehicle(true);
        assert_eq!(resolve_value(&v, "color"), Value::Null);
        assert!(!resolve_changed(&v, "color"));
    }
}
