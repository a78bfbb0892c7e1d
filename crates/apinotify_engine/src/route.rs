//! Route-name derivation and address resolution.

use apinotify_model::{Notifiable, ResolvedIdentificators};
use serde_json::Value;

/// Derives the route name for an entity.
///
/// Two-step lookup: an explicit route name declared by the entity type
/// wins; otherwise the pluralized, lowercased type name is used.
pub fn route_for(entity: &dyn Notifiable) -> String {
    match entity.route_name() {
        Some(route) => route.to_lowercase(),
        None => pluralize(&entity.entity_ref().type_name),
    }
}

/// Pluralizes and lowercases a type name (`"Vehicle"` → `"vehicles"`).
///
/// Covers the common English endings; entity types with irregular
/// plurals should declare an explicit route name instead.
#[must_use]
pub fn pluralize(name: &str) -> String {
    let lower = name.to_lowercase();
    if lower.is_empty() {
        return lower;
    }

    if let Some(stem) = lower.strip_suffix('y') {
        let before_y = stem.chars().last();
        if !matches!(before_y, Some('a' | 'e' | 'i' | 'o' | 'u') | None) {
            return format!("{stem}ies");
        }
    }

    if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return format!("{lower}es");
    }

    format!("{lower}s")
}

/// Resolves a route name plus identifier values into a request address.
pub trait AddressResolver: Send + Sync {
    /// Produces the address for the remote resource.
    fn resolve(&self, route: &str, identificators: &ResolvedIdentificators) -> String;
}

/// Default resolver: `{base_url}/{route}` for collections,
/// `{base_url}/{route}/{primary_id}` when a primary identifier value is
/// present.
///
/// A null primary identifier yields the collection address; the remote's
/// rejection of such a request is handled like any transport failure.
#[derive(Debug, Clone)]
pub struct BaseUrlResolver {
    base_url: String,
}

impl BaseUrlResolver {
    /// Creates a resolver rooted at the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl AddressResolver for BaseUrlResolver {
    fn resolve(&self, route: &str, identificators: &ResolvedIdentificators) -> String {
        let collection = format!("{}/{}", self.base_url, route);
        match identificators.primary() {
            Some((_, value)) if !value.is_null() => {
                format!("{}/{}", collection, path_segment(value))
            }
            _ => collection,
        }
    }
}

/// Renders an identifier value as a path segment (strings unquoted).
fn path_segment(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apinotify_model::{FieldSource, Identificators};
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn pluralize_common_endings() {
        assert_eq!(pluralize("Vehicle"), "vehicles");
        assert_eq!(pluralize("Dealer"), "dealers");
        assert_eq!(pluralize("Company"), "companies");
        assert_eq!(pluralize("Day"), "days");
        assert_eq!(pluralize("Box"), "boxes");
        assert_eq!(pluralize("Address"), "addresses");
        assert_eq!(pluralize("Batch"), "batches");
    }

    struct Keyed(Value);

    impl FieldSource for Keyed {
        fn value_of(&self, field: &str) -> Value {
            match field {
                "id" => self.0.clone(),
                _ => Value::Null,
            }
        }
    }

    fn resolved(id: Value) -> ResolvedIdentificators {
        Identificators::single("id", "id").resolve(&Keyed(id))
    }

    #[test]
    fn resolver_appends_primary_identifier() {
        let resolver = BaseUrlResolver::new("https://api.example.com/");
        assert_eq!(
            resolver.resolve("vehicles", &resolved(json!(1))),
            "https://api.example.com/vehicles/1"
        );
        assert_eq!(
            resolver.resolve("vehicles", &resolved(json!("ABC"))),
            "https://api.example.com/vehicles/ABC"
        );
    }

    #[test]
    fn resolver_null_identifier_yields_collection_address() {
        let resolver = BaseUrlResolver::new("https://api.example.com");
        assert_eq!(
            resolver.resolve("vehicles", &resolved(Value::Null)),
            "https://api.example.com/vehicles"
        );
        assert_eq!(
            resolver.resolve("vehicles", &ResolvedIdentificators::default()),
            "https://api.example.com/vehicles"
        );
    }

    proptest! {
        #[test]
        fn pluralize_is_lowercase_and_longer(name in "[A-Za-z]{1,24}") {
            let plural = pluralize(&name);
            prop_assert!(plural.len() > name.len().saturating_sub(1));
            prop_assert_eq!(plural.to_lowercase(), plural);
        }
    }
}
