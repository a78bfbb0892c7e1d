//! Test entities with mutable field and dirty-flag state.

use apinotify_model::{
    EndpointConfig, EntityRef, FieldSource, Identificators, Method, Notifiable,
};
use parking_lot::RwLock;
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};

/// A related record (dealer, vehicle type) with its own dirty tracking.
pub struct TestRelated {
    values: RwLock<BTreeMap<String, Value>>,
    dirty: RwLock<BTreeSet<String>>,
}

impl TestRelated {
    /// Creates a related record from `(field, value)` pairs, clean.
    pub fn new<const N: usize>(pairs: [(&str, Value); N]) -> Self {
        Self {
            values: RwLock::new(
                pairs
                    .into_iter()
                    .map(|(field, value)| (field.to_string(), value))
                    .collect(),
            ),
            dirty: RwLock::new(BTreeSet::new()),
        }
    }

    /// Sets a field value and marks it dirty.
    pub fn set(&self, field: &str, value: Value) {
        self.values.write().insert(field.to_string(), value);
        self.dirty.write().insert(field.to_string());
    }

    /// Clears all dirty flags.
    pub fn clear_dirty(&self) {
        self.dirty.write().clear();
    }
}

impl FieldSource for TestRelated {
    fn value_of(&self, field: &str) -> Value {
        self.values.read().get(field).cloned().unwrap_or(Value::Null)
    }

    fn changed(&self, field: &str) -> bool {
        self.dirty.read().contains(field)
    }
}

/// A notifiable vehicle record, mirroring a dealership inventory entity.
///
/// Freshly created vehicles have all own fields dirty (a new record);
/// call [`TestVehicle::clear_dirty`] to simulate a persisted, unchanged
/// record, then [`TestVehicle::set`] to dirty individual fields.
pub struct TestVehicle {
    id: u32,
    values: RwLock<BTreeMap<String, Value>>,
    dirty: RwLock<BTreeSet<String>>,
    dealer: Option<TestRelated>,
    vehicle_type: Option<TestRelated>,
    endpoints: Vec<EndpointConfig>,
    route: Option<String>,
    skip_api_notify: AtomicBool,
    dont_do_synchronize: AtomicBool,
}

const OWN_FIELDS: [&str; 4] = ["no", "vin", "make", "dealer_id"];

impl TestVehicle {
    /// Creates a vehicle with default field values, one `"vehicles"`
    /// endpoint, and every own field dirty.
    #[must_use]
    pub fn new(id: u32) -> Self {
        let values = BTreeMap::from([
            ("id".to_string(), json!(id)),
            ("no".to_string(), json!(format!("N-{id:03}"))),
            ("vin".to_string(), json!("ABC")),
            ("make".to_string(), json!("Ford")),
            ("dealer_id".to_string(), json!(7)),
        ]);
        Self {
            id,
            values: RwLock::new(values),
            dirty: RwLock::new(OWN_FIELDS.iter().map(|f| f.to_string()).collect()),
            dealer: Some(TestRelated::new([("title", json!("Main St Motors"))])),
            vehicle_type: Some(TestRelated::new([("title", json!("Sedan"))])),
            endpoints: vec![EndpointConfig::new("vehicles")],
            route: None,
            skip_api_notify: AtomicBool::new(false),
            dont_do_synchronize: AtomicBool::new(false),
        }
    }

    /// Adds a second endpoint with all methods allowed.
    #[must_use]
    pub fn with_extra_endpoint(mut self, name: &str) -> Self {
        self.endpoints.push(EndpointConfig::new(name));
        self
    }

    /// Attaches a skip predicate to the primary endpoint.
    #[must_use]
    pub fn with_skip_predicate(mut self, predicate: &str) -> Self {
        let primary = self.endpoints.remove(0);
        self.endpoints
            .insert(0, primary.with_skip_predicate(predicate));
        self
    }

    /// Restricts the primary endpoint to the given methods.
    #[must_use]
    pub fn with_endpoint_methods(mut self, methods: &[Method]) -> Self {
        let primary = self.endpoints.remove(0);
        self.endpoints.insert(0, primary.with_methods(methods));
        self
    }

    /// Declares an explicit route name.
    #[must_use]
    pub fn with_route(mut self, route: &str) -> Self {
        self.route = Some(route.to_string());
        self
    }

    /// Removes the related dealer record.
    #[must_use]
    pub fn without_dealer(mut self) -> Self {
        self.dealer = None;
        self
    }

    /// Sets an own field value and marks it dirty.
    pub fn set(&self, field: &str, value: Value) {
        self.values.write().insert(field.to_string(), value);
        self.dirty.write().insert(field.to_string());
    }

    /// Clears dirty flags on the vehicle and its related records,
    /// simulating a freshly persisted state.
    pub fn clear_dirty(&self) {
        self.dirty.write().clear();
        if let Some(dealer) = &self.dealer {
            dealer.clear_dirty();
        }
        if let Some(vehicle_type) = &self.vehicle_type {
            vehicle_type.clear_dirty();
        }
    }

    /// Returns the related dealer, if present.
    #[must_use]
    pub fn dealer(&self) -> Option<&TestRelated> {
        self.dealer.as_ref()
    }

    /// Sets the per-save opt-out flag.
    pub fn set_skip_api_notify(&self, skip: bool) {
        self.skip_api_notify.store(skip, Ordering::SeqCst);
    }

    /// Sets the `dont_do_synchronize` predicate value.
    pub fn set_dont_do_synchronize(&self, value: bool) {
        self.dont_do_synchronize.store(value, Ordering::SeqCst);
    }
}

impl FieldSource for TestVehicle {
    fn value_of(&self, field: &str) -> Value {
        self.values.read().get(field).cloned().unwrap_or(Value::Null)
    }

    fn changed(&self, field: &str) -> bool {
        self.dirty.read().contains(field)
    }

    fn related(&self, name: &str) -> Option<&dyn FieldSource> {
        match name {
            "dealer" => self.dealer.as_ref().map(|d| d as &dyn FieldSource),
            "vehicle_type" => self.vehicle_type.as_ref().map(|t| t as &dyn FieldSource),
            _ => None,
        }
    }
}

impl Notifiable for TestVehicle {
    fn entity_ref(&self) -> EntityRef {
        EntityRef::new("Vehicle", self.id)
    }

    fn trackable_fields(&self) -> Vec<String> {
        [
            "no",
            "vin",
            "make",
            "dealer_id",
            "dealer.title",
            "vehicle_type.title",
        ]
        .iter()
        .map(|f| f.to_string())
        .collect()
    }

    fn identificators(&self) -> Identificators {
        Identificators::single("id", "id")
    }

    fn endpoints(&self) -> Vec<EndpointConfig> {
        self.endpoints.clone()
    }

    fn route_name(&self) -> Option<String> {
        self.route.clone()
    }

    fn skip_api_notify(&self) -> bool {
        self.skip_api_notify.load(Ordering::SeqCst)
    }

    fn predicate(&self, name: &str) -> bool {
        name == "dont_do_synchronize" && self.dont_do_synchronize.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apinotify_model::{resolve_changed, resolve_value};

    #[test]
    fn new_vehicle_has_all_own_fields_dirty() {
        let vehicle = TestVehicle::new(1);
        for field in OWN_FIELDS {
            assert!(vehicle.changed(field), "{field} should be dirty");
        }
    }

    #[test]
    fn clear_dirty_cascades_to_relations() {
        let vehicle = TestVehicle::new(1);
        vehicle.dealer().unwrap().set("title", json!("Elm St Motors"));
        assert!(resolve_changed(&vehicle, "dealer.title"));

        vehicle.clear_dirty();
        assert!(!vehicle.changed("vin"));
        assert!(!resolve_changed(&vehicle, "dealer.title"));
    }

    #[test]
    fn dotted_paths_resolve_into_relations() {
        let vehicle = TestVehicle::new(1);
        assert_eq!(
            resolve_value(&vehicle, "dealer.title"),
            json!("Main St Motors")
        );
        assert_eq!(resolve_value(&vehicle, "vehicle_type.title"), json!("Sedan"));
        assert_eq!(
            resolve_value(&vehicle.without_dealer(), "dealer.title"),
            Value::Null
        );
    }

    #[test]
    fn predicate_only_answers_its_own_name() {
        let vehicle = TestVehicle::new(1);
        vehicle.set_dont_do_synchronize(true);
        assert!(vehicle.predicate("dont_do_synchronize"));
        assert!(!vehicle.predicate("some_other_predicate"));
    }
}
