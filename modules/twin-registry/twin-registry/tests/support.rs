#![allow(dead_code)]

use std::sync::Arc;

use time::OffsetDateTime;
use twin_registry::{
    NewTwinInstance, NewTwinModel, TwinInstance, TwinModel, TwinRegistry, TwinRegistryClientV1,
    TwinRegistryConfig,
};

/// Registry over a fresh in-memory SQLite database with migrations applied.
pub struct TestContext {
    pub registry: TwinRegistry,
    pub client: Arc<dyn TwinRegistryClientV1>,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_config(TwinRegistryConfig::default()).await
    }

    pub async fn with_config(cfg: TwinRegistryConfig) -> Self {
        let registry = TwinRegistry::connect(&cfg).await.unwrap();
        let client = registry.client();
        Self { registry, client }
    }

    pub async fn model(&self, id: &str) -> TwinModel {
        self.client
            .create_model(NewTwinModel::named(format!("Model {id}")).with_id(id))
            .await
            .unwrap()
    }

    pub async fn twin(&self, id: &str, model_id: &str) -> TwinInstance {
        let mut new_twin = NewTwinInstance::for_model(model_id);
        new_twin.id = Some(id.to_owned());
        self.client.create_twin(new_twin).await.unwrap()
    }
}

/// Timestamp `minutes` after 2024-03-01 08:00 UTC.
pub fn at(minutes: i64) -> OffsetDateTime {
    time::macros::datetime!(2024-03-01 08:00 UTC) + time::Duration::minutes(minutes)
}
