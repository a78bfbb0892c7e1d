//! # apinotify Model
//!
//! Data model and persistence seams for the apinotify sync engine.
//!
//! This crate provides:
//! - `EntityRef`, `TaskId` and the method/event/status enums
//! - `EndpointConfig` for describing remote API targets
//! - The `Notifiable` / `FieldSource` traits entities implement
//! - `Task` and `SyncLog` persisted records
//! - Repository traits (`TaskStore`, `SyncLogStore`, `EntitySource`)
//!   with in-memory implementations
//!
//! This is a pure model crate with no I/O operations. The engine crate
//! builds the change-detection and dispatch machinery on top of it.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod endpoint;
mod entity;
mod error;
mod identificators;
mod log;
mod store;
mod task;
mod types;

pub use endpoint::EndpointConfig;
pub use entity::{resolve_changed, resolve_value, FieldSource, Notifiable};
pub use error::{StoreError, StoreResult};
pub use identificators::{Identificators, ResolvedIdentificators};
pub use log::SyncLog;
pub use store::{
    EntitySource, MemoryEntitySource, MemorySyncLogStore, MemoryTaskStore, SyncLogStore, TaskStore,
};
pub use task::{SyncResponse, Task};
pub use types::{EntityRef, LifecycleEvent, Method, Outcome, TaskId, TaskStatus};
