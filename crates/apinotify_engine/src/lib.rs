//! # apinotify Engine
//!
//! Change detection, task dispatch and retry engine for apinotify.
//!
//! This crate provides:
//! - `ChangeTracker` for per-endpoint change detection
//! - `Dispatcher` with the lifecycle entry points and the retry state
//!   machine
//! - `Synchronizer` request shaping over an abstract `Transport`
//! - Queue/worker seams for asynchronous execution
//! - `HookRegistry` for per-endpoint success/failure callbacks
//!
//! ## Architecture
//!
//! The engine implements a **capture-then-dispatch** model per entity
//! lifecycle event:
//! 1. `on_before_write` snapshots which fields changed, per endpoint,
//!    while the pending write's dirty state is still readable
//! 2. `on_after_write` decides, per endpoint, whether a sync task is
//!    needed and enqueues one
//! 3. A worker later runs `execute(task_id)`, which re-reads live field
//!    values, calls the transport, and retries failures up to a bound
//!
//! ## Key invariants
//!
//! - Task field *names* are frozen at creation, field *values* are read
//!   at execution time
//! - A destroy event always syncs, even with no changed fields
//! - A task makes at most `retry.max_attempts` attempts, then is
//!   terminally failed and the exhaustion is surfaced
//! - No two attempts of the same task id run concurrently

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod activation;
mod config;
mod dispatcher;
mod error;
mod hooks;
mod queue;
mod route;
mod synchronizer;
mod tracker;
mod transport;

pub use config::{EngineConfig, RetryConfig};
pub use dispatcher::Dispatcher;
pub use error::{SyncError, SyncResult};
pub use hooks::{HookFn, HookRegistry};
pub use queue::{MemoryQueue, TaskQueue, Worker};
pub use route::{pluralize, route_for, AddressResolver, BaseUrlResolver};
pub use synchronizer::Synchronizer;
pub use tracker::{ChangeSet, ChangeTracker};
pub use transport::{MockTransport, SentRequest, Transport, TransportReply};
