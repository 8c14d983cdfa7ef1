//! Twin Registry SDK
//!
//! This crate provides the public API for the `twin-registry` module:
//! - `TwinRegistryClientV1` trait
//! - Model types for twin models, twin instances and telemetry
//! - Error type (`TwinRegistryError`) and its closed `ErrorKind`
//!
//! ## Usage
//!
//! ```ignore
//! use twin_registry_sdk::{NewTwinModel, TwinRegistryClientV1};
//!
//! let model = client
//!     .create_model(NewTwinModel::named("Thermostat"))
//!     .await?;
//! let twins = client.list_twins_by_model(&model.id).await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod client;
pub mod errors;
pub mod models;

pub use client::TwinRegistryClientV1;
pub use errors::{ErrorKind, TwinRegistryError};
pub use models::{
    LatestTelemetry, NewTelemetryRecord, NewTwinInstance, NewTwinModel, PropertyMap, SortOrder,
    TagMap, TelemetryRangeQuery, TelemetryRecord, TelemetryValue, TelemetryValueSlots,
    TwinInstance, TwinInstanceUpdate, TwinModel, TwinModelUpdate,
};
