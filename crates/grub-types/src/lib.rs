//! Common types module for the GrubDash service.
//!
//! This module defines the records, request envelopes and error payloads
//! shared by the storage, core and service crates.

/// API types for HTTP endpoints and error payloads.
pub mod api;
/// Dish records managed by the dishes collection.
pub mod dish;
/// Order records and the order status lifecycle.
pub mod order;
/// Registry trait for pluggable backends.
pub mod registry;
/// Storage keys for the record collections.
pub mod storage;

// Re-export all types for convenient access
pub use api::*;
pub use dish::*;
pub use order::*;
pub use registry::ImplementationRegistry;
pub use storage::*;
