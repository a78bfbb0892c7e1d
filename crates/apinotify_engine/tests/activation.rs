//! Activation flag behavior.
//!
//! Runs as its own test binary (own process) because it mutates the
//! process-wide flag.

use apinotify_engine::{activation, Dispatcher, EngineConfig, MemoryQueue, MockTransport};
use apinotify_model::{
    LifecycleEvent, MemoryEntitySource, MemorySyncLogStore, MemoryTaskStore,
};
use apinotify_testkit::TestVehicle;
use std::sync::Arc;

#[test]
fn inactive_engine_creates_no_tasks_and_init_is_once() {
    let tasks = Arc::new(MemoryTaskStore::new());
    let queue = Arc::new(MemoryQueue::new());
    let dispatcher = Dispatcher::new(
        EngineConfig::new("https://api.example.com"),
        tasks.clone(),
        Arc::new(MemorySyncLogStore::new()),
        Arc::new(MemoryEntitySource::new()),
        queue.clone(),
        Arc::new(MockTransport::new()),
    );
    let vehicle = TestVehicle::new(1);

    // First init wins and deactivates sync.
    activation::init(false);
    assert!(!activation::is_active());

    // A later init is ignored.
    activation::init(true);
    assert!(!activation::is_active());

    dispatcher.on_before_write(&vehicle).unwrap();
    let created = dispatcher
        .on_after_write(&vehicle, LifecycleEvent::Create)
        .unwrap();
    assert!(created.is_empty());
    assert!(tasks.is_empty());
    assert!(queue.is_empty());

    // The explicit test toggle bypasses the init-once rule.
    activation::set_for_tests(true);
    assert!(activation::is_active());

    dispatcher.on_before_write(&vehicle).unwrap();
    let created = dispatcher
        .on_after_write(&vehicle, LifecycleEvent::Create)
        .unwrap();
    assert_eq!(created.len(), 1);
}
