//! Per-endpoint change detection.

use crate::error::SyncResult;
use apinotify_model::{resolve_changed, Notifiable, SyncLogStore};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Computes which fields must be sent to each endpoint.
///
/// A field is included when it changed since the tracked snapshot, or
/// unconditionally when no sync log row exists for the `(entity,
/// endpoint)` pair yet — the must-sync override that forces a complete
/// payload on first contact.
pub struct ChangeTracker {
    logs: Arc<dyn SyncLogStore>,
}

impl ChangeTracker {
    /// Creates a tracker reading sync history from the given store.
    pub fn new(logs: Arc<dyn SyncLogStore>) -> Self {
        Self { logs }
    }

    /// Computes the ordered field names to send to one endpoint.
    ///
    /// Only valid while the entity's pre-write dirty state is still
    /// readable; use [`ChangeTracker::capture`] to snapshot it before
    /// the write commits.
    pub fn changed_fields(
        &self,
        entity: &dyn Notifiable,
        endpoint: &str,
    ) -> SyncResult<Vec<String>> {
        let must_sync = self.logs.find(&entity.entity_ref(), endpoint)?.is_none();
        Ok(entity
            .trackable_fields()
            .into_iter()
            .filter(|field| must_sync || resolve_changed(entity, field))
            .collect())
    }

    /// Returns true if at least one field must be sent to the endpoint.
    pub fn has_changed_fields(&self, entity: &dyn Notifiable, endpoint: &str) -> SyncResult<bool> {
        Ok(!self.changed_fields(entity, endpoint)?.is_empty())
    }

    /// Snapshots the changed fields for every configured endpoint.
    pub fn capture(&self, entity: &dyn Notifiable) -> SyncResult<ChangeSet> {
        let mut per_endpoint = BTreeMap::new();
        for endpoint in entity.endpoints() {
            per_endpoint.insert(
                endpoint.name().to_string(),
                self.changed_fields(entity, endpoint.name())?,
            );
        }
        Ok(ChangeSet { per_endpoint })
    }
}

/// Point-in-time snapshot of changed fields, per endpoint.
///
/// Captured before the entity's write commits and consulted afterwards,
/// because the dirty flags it is computed from are only valid before
/// the write.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    per_endpoint: BTreeMap<String, Vec<String>>,
}

impl ChangeSet {
    /// Returns the captured field names for an endpoint. Endpoints that
    /// were not captured report no changes.
    #[must_use]
    pub fn fields_for(&self, endpoint: &str) -> &[String] {
        self.per_endpoint
            .get(endpoint)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns true if no endpoint has any changed field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.per_endpoint.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apinotify_model::{EntityRef, MemorySyncLogStore, SyncLog};
    use apinotify_testkit::TestVehicle;

    fn tracker() -> (ChangeTracker, Arc<MemorySyncLogStore>) {
        let logs = Arc::new(MemorySyncLogStore::new());
        (ChangeTracker::new(logs.clone()), logs)
    }

    #[test]
    fn first_contact_forces_full_field_set() {
        let (tracker, _logs) = tracker();
        let vehicle = TestVehicle::new(1);
        vehicle.clear_dirty();

        let fields = tracker.changed_fields(&vehicle, "vehicles").unwrap();
        assert_eq!(fields, vehicle.trackable_fields());
    }

    #[test]
    fn synced_entity_reports_only_dirty_fields() {
        let (tracker, logs) = tracker();
        let vehicle = TestVehicle::new(1);
        logs.record(SyncLog::now(vehicle.entity_ref(), "vehicles"))
            .unwrap();

        vehicle.clear_dirty();
        vehicle.set("make", "Honda".into());

        let fields = tracker.changed_fields(&vehicle, "vehicles").unwrap();
        assert_eq!(fields, vec!["make"]);
        assert!(tracker.has_changed_fields(&vehicle, "vehicles").unwrap());
    }

    #[test]
    fn synced_entity_with_no_changes_reports_none() {
        let (tracker, logs) = tracker();
        let vehicle = TestVehicle::new(1);
        logs.record(SyncLog::now(vehicle.entity_ref(), "vehicles"))
            .unwrap();
        vehicle.clear_dirty();

        assert!(!tracker.has_changed_fields(&vehicle, "vehicles").unwrap());
    }

    #[test]
    fn must_sync_is_per_endpoint() {
        let (tracker, logs) = tracker();
        let vehicle = TestVehicle::new(1).with_extra_endpoint("inventory");
        logs.record(SyncLog::now(vehicle.entity_ref(), "vehicles"))
            .unwrap();
        vehicle.clear_dirty();

        let snapshot = tracker.capture(&vehicle).unwrap();
        assert!(snapshot.fields_for("vehicles").is_empty());
        assert_eq!(snapshot.fields_for("inventory"), vehicle.trackable_fields());
    }

    #[test]
    fn field_order_follows_declaration() {
        let (tracker, _logs) = tracker();
        let vehicle = TestVehicle::new(1);

        let fields = tracker.changed_fields(&vehicle, "vehicles").unwrap();
        assert_eq!(
            fields,
            vec![
                "no",
                "vin",
                "make",
                "dealer_id",
                "dealer.title",
                "vehicle_type.title"
            ]
        );
    }

    #[test]
    fn empty_changeset_for_unknown_endpoint() {
        let snapshot = ChangeSet::default();
        assert!(snapshot.fields_for("vehicles").is_empty());
        assert!(snapshot.is_empty());
    }

    #[test]
    fn ref_to_entity_ref() {
        let vehicle = TestVehicle::new(42);
        assert_eq!(vehicle.entity_ref(), EntityRef::new("Vehicle", 42));
    }
}
