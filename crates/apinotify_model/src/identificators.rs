//! Identifier mappings used to address remote resources.

use crate::entity::{resolve_value, FieldSource};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered mapping from logical key to field path.
///
/// The first entry is the primary key used in the request path; paths
/// may traverse one related entity (`"dealer.title"`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identificators {
    entries: Vec<(String, String)>,
}

impl Identificators {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mapping with a single entry.
    pub fn single(key: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new().with(key, path)
    }

    /// Appends an entry.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, path: impl Into<String>) -> Self {
        self.entries.push((key.into(), path.into()));
        self
    }

    /// Returns true if no entries are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(key, path)` entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, p)| (k.as_str(), p.as_str()))
    }

    /// Resolves every entry against an entity instance.
    ///
    /// Resolution never fails: a path that cannot be read yields a null
    /// value, and address-resolution problems surface at execution time.
    pub fn resolve<S: FieldSource + ?Sized>(&self, source: &S) -> ResolvedIdentificators {
        ResolvedIdentificators {
            entries: self
                .entries
                .iter()
                .map(|(key, path)| (key.clone(), resolve_value(source, path)))
                .collect(),
        }
    }
}

/// Identifier values resolved from a concrete entity instance.
///
/// Snapshotted into tasks at creation time so a task stays addressable
/// after the owning entity is gone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedIdentificators {
    entries: Vec<(String, Value)>,
}

impl ResolvedIdentificators {
    /// Returns the primary (first) identifier, if any.
    #[must_use]
    pub fn primary(&self) -> Option<(&str, &Value)> {
        self.entries.first().map(|(k, v)| (k.as_str(), v))
    }

    /// Looks up an identifier value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Iterates over `(key, value)` entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no identifiers were resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Car;

    impl FieldSource for Car {
        fn value_of(&self, field: &str) -> Value {
            match field {
                "id" => json!(1),
                "vin" => json!("ABC"),
                _ => Value::Null,
            }
        }
    }

    #[test]
    fn resolve_reads_field_values() {
        let ids = Identificators::single("id", "id").with("vin", "vin");
        let resolved = ids.resolve(&Car);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved.get("id"), Some(&json!(1)));
        assert_eq!(resolved.get("vin"), Some(&json!("ABC")));
    }

    #[test]
    fn primary_is_first_entry() {
        let ids = Identificators::single("id", "id").with("vin", "vin");
        let resolved = ids.resolve(&Car);
        let (key, value) = resolved.primary().unwrap();
        assert_eq!(key, "id");
        assert_eq!(value, &json!(1));
    }

    #[test]
    fn unresolvable_path_yields_null() {
        let ids = Identificators::single("code", "missing_field");
        let resolved = ids.resolve(&Car);
        assert_eq!(resolved.get("code"), Some(&Value::Null));
    }

    #[test]
    fn resolved_roundtrips_through_serde() {
        let resolved = Identificators::single("id", "id").resolve(&Car);
        let json = serde_json::to_string(&resolved).unwrap();
        let back: ResolvedIdentificators = serde_json::from_str(&json).unwrap();
        assert_eq!(back, resolved);
    }
}
