//! Object-safe client boundary for the `twin-registry` module.
//!
//! Consumers hold it as `Arc<dyn TwinRegistryClientV1>`; the in-process
//! implementation lives in the `cf-twin-registry` crate.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::errors::TwinRegistryError;
use crate::models::{
    LatestTelemetry, NewTelemetryRecord, NewTwinInstance, NewTwinModel, PropertyMap, TagMap,
    TelemetryRangeQuery, TelemetryRecord, TwinInstance, TwinInstanceUpdate, TwinModel,
    TwinModelUpdate,
};

/// Public API trait for the `twin-registry` module.
#[async_trait]
pub trait TwinRegistryClientV1: Send + Sync {
    // ==================== Twin Models ====================

    /// Create a twin model. A blank id is replaced with a generated one.
    async fn create_model(&self, new_model: NewTwinModel) -> Result<TwinModel, TwinRegistryError>;

    /// Get a twin model by ID.
    async fn get_model(&self, id: &str) -> Result<TwinModel, TwinRegistryError>;

    /// List all twin models ordered by ID.
    async fn list_models(&self) -> Result<Vec<TwinModel>, TwinRegistryError>;

    /// Replace the display name and description of a twin model.
    async fn update_model(
        &self,
        id: &str,
        update: TwinModelUpdate,
    ) -> Result<TwinModel, TwinRegistryError>;

    /// Delete a twin model. Fails with `Conflict` while any twin references it.
    async fn delete_model(&self, id: &str) -> Result<(), TwinRegistryError>;

    // ==================== Twin Instances ====================

    /// Create a twin instance of an existing model.
    async fn create_twin(
        &self,
        new_twin: NewTwinInstance,
    ) -> Result<TwinInstance, TwinRegistryError>;

    /// Get a twin instance by ID.
    async fn get_twin(&self, id: &str) -> Result<TwinInstance, TwinRegistryError>;

    /// List all twin instances ordered by ID.
    async fn list_twins(&self) -> Result<Vec<TwinInstance>, TwinRegistryError>;

    /// List the twin instances of one model ordered by ID.
    async fn list_twins_by_model(
        &self,
        model_id: &str,
    ) -> Result<Vec<TwinInstance>, TwinRegistryError>;

    /// Apply a partial update. Never touches reported properties.
    async fn update_twin(
        &self,
        id: &str,
        update: TwinInstanceUpdate,
    ) -> Result<TwinInstance, TwinRegistryError>;

    /// Overwrite the reported properties of a twin.
    async fn update_reported_properties(
        &self,
        id: &str,
        properties: PropertyMap,
    ) -> Result<TwinInstance, TwinRegistryError>;

    /// Overwrite the desired properties of a twin.
    async fn update_desired_properties(
        &self,
        id: &str,
        properties: PropertyMap,
    ) -> Result<TwinInstance, TwinRegistryError>;

    /// Overwrite the tags of a twin.
    async fn update_tags(&self, id: &str, tags: TagMap) -> Result<TwinInstance, TwinRegistryError>;

    /// Delete a twin instance. Its telemetry is kept.
    async fn delete_twin(&self, id: &str) -> Result<(), TwinRegistryError>;

    // ==================== Telemetry ====================

    /// Append one telemetry reading.
    async fn append_telemetry(
        &self,
        twin_id: &str,
        record: NewTelemetryRecord,
    ) -> Result<TelemetryRecord, TwinRegistryError>;

    /// Append a batch of readings for one twin, all or nothing.
    ///
    /// Returns the number of records written.
    async fn append_telemetry_batch(
        &self,
        twin_id: &str,
        records: Vec<NewTelemetryRecord>,
    ) -> Result<u64, TwinRegistryError>;

    /// Query one series over an inclusive time range.
    async fn query_telemetry_range(
        &self,
        query: TelemetryRangeQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<TelemetryRecord>, TwinRegistryError>;

    /// Latest reading per name. An empty `names` means every name of the twin.
    ///
    /// Names without any reading are absent from the result.
    async fn query_latest_telemetry(
        &self,
        twin_id: &str,
        names: &[String],
        cancel: &CancellationToken,
    ) -> Result<LatestTelemetry, TwinRegistryError>;
}
