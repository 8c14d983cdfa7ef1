//! Local implementation of `TwinRegistryClientV1`.
//!
//! Used for in-process communication. It delegates to the domain services
//! and converts domain errors into SDK error types.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use twin_registry_sdk::{
    LatestTelemetry, NewTelemetryRecord, NewTwinInstance, NewTwinModel, PropertyMap, TagMap,
    TelemetryRangeQuery, TelemetryRecord, TwinInstance, TwinInstanceUpdate, TwinModel,
    TwinModelUpdate, TwinRegistryClientV1, TwinRegistryError,
};

use crate::domain::service::{ModelsService, TelemetryService, TwinsService};

/// Local client over the three domain services.
pub struct TwinRegistryLocalClient {
    models: ModelsService,
    twins: TwinsService,
    telemetry: TelemetryService,
}

impl TwinRegistryLocalClient {
    #[must_use]
    pub fn new(models: ModelsService, twins: TwinsService, telemetry: TelemetryService) -> Self {
        Self {
            models,
            twins,
            telemetry,
        }
    }
}

#[async_trait]
impl TwinRegistryClientV1 for TwinRegistryLocalClient {
    // Twin models
    async fn create_model(&self, new_model: NewTwinModel) -> Result<TwinModel, TwinRegistryError> {
        self.models.create_model(new_model).await.map_err(Into::into)
    }

    async fn get_model(&self, id: &str) -> Result<TwinModel, TwinRegistryError> {
        self.models.get_model(id).await.map_err(Into::into)
    }

    async fn list_models(&self) -> Result<Vec<TwinModel>, TwinRegistryError> {
        self.models.list_models().await.map_err(Into::into)
    }

    async fn update_model(
        &self,
        id: &str,
        update: TwinModelUpdate,
    ) -> Result<TwinModel, TwinRegistryError> {
        self.models
            .update_model(id, update)
            .await
            .map_err(Into::into)
    }

    async fn delete_model(&self, id: &str) -> Result<(), TwinRegistryError> {
        self.models.delete_model(id).await.map_err(Into::into)
    }

    // Twin instances
    async fn create_twin(
        &self,
        new_twin: NewTwinInstance,
    ) -> Result<TwinInstance, TwinRegistryError> {
        self.twins.create_twin(new_twin).await.map_err(Into::into)
    }

    async fn get_twin(&self, id: &str) -> Result<TwinInstance, TwinRegistryError> {
        self.twins.get_twin(id).await.map_err(Into::into)
    }

    async fn list_twins(&self) -> Result<Vec<TwinInstance>, TwinRegistryError> {
        self.twins.list_twins().await.map_err(Into::into)
    }

    async fn list_twins_by_model(
        &self,
        model_id: &str,
    ) -> Result<Vec<TwinInstance>, TwinRegistryError> {
        self.twins
            .list_twins_by_model(model_id)
            .await
            .map_err(Into::into)
    }

    async fn update_twin(
        &self,
        id: &str,
        update: TwinInstanceUpdate,
    ) -> Result<TwinInstance, TwinRegistryError> {
        self.twins.update_twin(id, update).await.map_err(Into::into)
    }

    async fn update_reported_properties(
        &self,
        id: &str,
        properties: PropertyMap,
    ) -> Result<TwinInstance, TwinRegistryError> {
        self.twins
            .update_reported_properties(id, properties)
            .await
            .map_err(Into::into)
    }

    async fn update_desired_properties(
        &self,
        id: &str,
        properties: PropertyMap,
    ) -> Result<TwinInstance, TwinRegistryError> {
        self.twins
            .update_desired_properties(id, properties)
            .await
            .map_err(Into::into)
    }

    async fn update_tags(&self, id: &str, tags: TagMap) -> Result<TwinInstance, TwinRegistryError> {
        self.twins.update_tags(id, tags).await.map_err(Into::into)
    }

    async fn delete_twin(&self, id: &str) -> Result<(), TwinRegistryError> {
        self.twins.delete_twin(id).await.map_err(Into::into)
    }

    // Telemetry
    async fn append_telemetry(
        &self,
        twin_id: &str,
        record: NewTelemetryRecord,
    ) -> Result<TelemetryRecord, TwinRegistryError> {
        self.telemetry
            .append_telemetry(twin_id, record)
            .await
            .map_err(Into::into)
    }

    async fn append_telemetry_batch(
        &self,
        twin_id: &str,
        records: Vec<NewTelemetryRecord>,
    ) -> Result<u64, TwinRegistryError> {
        self.telemetry
            .append_telemetry_batch(twin_id, records)
            .await
            .map_err(Into::into)
    }

    async fn query_telemetry_range(
        &self,
        query: TelemetryRangeQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<TelemetryRecord>, TwinRegistryError> {
        self.telemetry
            .query_telemetry_range(query, cancel)
            .await
            .map_err(Into::into)
    }

    async fn query_latest_telemetry(
        &self,
        twin_id: &str,
        names: &[String],
        cancel: &CancellationToken,
    ) -> Result<LatestTelemetry, TwinRegistryError> {
        self.telemetry
            .query_latest_telemetry(twin_id, names, cancel)
            .await
            .map_err(Into::into)
    }
}
