//! Twin Registry Module
//!
//! Persistence and query layer for digital twins: twin model blueprints,
//! twin instances with a desired/reported property shadow, and append-only
//! time-series telemetry.
//!
//! ## Public API
//!
//! The public API is defined in the `cf-twin-registry-sdk` crate and re-exported here:
//! - `TwinRegistryClientV1` - trait for inter-module communication
//! - `TwinModel`, `TwinInstance`, `TelemetryRecord` and their input types - data models
//! - `TwinRegistryError`, `ErrorKind` - error types
//!
//! Build a [`TwinRegistry`] from a [`TwinRegistryConfig`] and hand out
//! `registry.client()` to consumers.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
// === PUBLIC API (from SDK) ===
pub use twin_registry_sdk::{
    ErrorKind, LatestTelemetry, NewTelemetryRecord, NewTwinInstance, NewTwinModel, PropertyMap,
    SortOrder, TagMap, TelemetryRangeQuery, TelemetryRecord, TelemetryValue, TelemetryValueSlots,
    TwinInstance, TwinInstanceUpdate, TwinModel, TwinModelUpdate, TwinRegistryClientV1,
    TwinRegistryError,
};

// === MODULE DEFINITION ===
pub mod module;
pub use module::TwinRegistry;

pub mod config;
pub use config::TwinRegistryConfig;

// === LOCAL CLIENT ===
// Local client adapter that implements TwinRegistryClientV1
pub mod local_client;

// === INTERNAL MODULES ===
// WARNING: These modules are internal implementation details!
// They are exposed only for comprehensive testing and should NOT be used by external consumers.
// Only use the SDK types for stable public APIs.
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
