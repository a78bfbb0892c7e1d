//! # apinotify Testkit
//!
//! Shared fixtures for testing the apinotify crates.
//!
//! Provides `TestVehicle`, a fully wired `Notifiable` entity with
//! mutable field state, dirty tracking, related entities and
//! configurable endpoints, modeled on a dealership inventory record.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod fixtures;

pub use fixtures::{TestRelated, TestVehicle};
