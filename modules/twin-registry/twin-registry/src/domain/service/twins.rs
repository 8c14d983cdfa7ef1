use std::sync::Arc;

use tracing::{debug, info, instrument};
use twin_registry_sdk::{NewTwinInstance, PropertyMap, TagMap, TwinInstance, TwinInstanceUpdate};

use super::{ServiceConfig, now_utc, resolve_id, validate_id};
use crate::domain::error::DomainError;
use crate::domain::repos::{ModelsRepository, TwinsRepository};

/// Domain service for twin instances and their property shadow.
///
/// Desired and reported properties are independent registers: every write
/// path replaces exactly the container it names.
#[derive(Clone)]
pub struct TwinsService {
    models: Arc<dyn ModelsRepository>,
    twins: Arc<dyn TwinsRepository>,
    config: ServiceConfig,
}

impl TwinsService {
    #[must_use]
    pub fn new(
        models: Arc<dyn ModelsRepository>,
        twins: Arc<dyn TwinsRepository>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            models,
            twins,
            config,
        }
    }

    /// The model must exist right now; the storage foreign key covers the
    /// window between this check and the write.
    async fn ensure_model_exists(&self, model_id: &str) -> Result<(), DomainError> {
        validate_id("model_id", model_id, self.config.max_id_length)?;
        if !self.models.exists(model_id).await? {
            return Err(DomainError::invalid_model_reference(model_id));
        }
        Ok(())
    }

    #[instrument(skip(self, new_twin), fields(model_id = %new_twin.model_id))]
    pub async fn create_twin(&self, new_twin: NewTwinInstance) -> Result<TwinInstance, DomainError> {
        let NewTwinInstance {
            id,
            model_id,
            desired_properties,
            tags,
        } = new_twin;

        self.ensure_model_exists(&model_id).await?;

        let (id, supplied) = resolve_id("twin", id, self.config.max_id_length)?;
        if supplied && self.twins.exists(&id).await? {
            return Err(DomainError::twin_already_exists(id));
        }

        let now = now_utc();
        let twin = self
            .twins
            .insert(TwinInstance {
                id,
                model_id,
                reported_properties: PropertyMap::new(),
                desired_properties,
                tags,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(twin_id = %twin.id, "Created twin instance");
        Ok(twin)
    }

    #[instrument(skip(self))]
    pub async fn get_twin(&self, id: &str) -> Result<TwinInstance, DomainError> {
        debug!("Getting twin instance by id");
        self.twins
            .get(id)
            .await?
            .ok_or_else(|| DomainError::twin_not_found(id))
    }

    #[instrument(skip(self))]
    pub async fn list_twins(&self) -> Result<Vec<TwinInstance>, DomainError> {
        let twins = self.twins.list().await?;
        debug!("Listed {} twin instances", twins.len());
        Ok(twins)
    }

    #[instrument(skip(self))]
    pub async fn list_twins_by_model(
        &self,
        model_id: &str,
    ) -> Result<Vec<TwinInstance>, DomainError> {
        let twins = self.twins.list_by_model(model_id).await?;
        debug!("Listed {} twin instances of model", twins.len());
        Ok(twins)
    }

    #[instrument(skip(self, update))]
    pub async fn update_twin(
        &self,
        id: &str,
        update: TwinInstanceUpdate,
    ) -> Result<TwinInstance, DomainError> {
        if let Some(model_id) = update.model_id.as_deref() {
            self.ensure_model_exists(model_id).await?;
        }

        let twin = self.twins.update(id, &update, now_utc()).await?;

        info!(
            model_changed = update.model_id.is_some(),
            desired_changed = update.desired_properties.is_some(),
            tags_changed = update.tags.is_some(),
            "Updated twin instance"
        );
        Ok(twin)
    }

    #[instrument(skip(self, properties))]
    pub async fn update_reported_properties(
        &self,
        id: &str,
        properties: PropertyMap,
    ) -> Result<TwinInstance, DomainError> {
        let twin = self.twins.update_reported(id, &properties, now_utc()).await?;
        info!(keys = properties.len(), "Updated reported properties");
        Ok(twin)
    }

    #[instrument(skip(self, properties))]
    pub async fn update_desired_properties(
        &self,
        id: &str,
        properties: PropertyMap,
    ) -> Result<TwinInstance, DomainError> {
        let keys = properties.len();
        let update = TwinInstanceUpdate {
            desired_properties: Some(properties),
            ..TwinInstanceUpdate::default()
        };
        let twin = self.twins.update(id, &update, now_utc()).await?;
        info!(keys, "Updated desired properties");
        Ok(twin)
    }

    #[instrument(skip(self, tags))]
    pub async fn update_tags(&self, id: &str, tags: TagMap) -> Result<TwinInstance, DomainError> {
        let count = tags.len();
        let update = TwinInstanceUpdate {
            tags: Some(tags),
            ..TwinInstanceUpdate::default()
        };
        let twin = self.twins.update(id, &update, now_utc()).await?;
        info!(count, "Updated twin tags");
        Ok(twin)
    }

    #[instrument(skip(self))]
    pub async fn delete_twin(&self, id: &str) -> Result<(), DomainError> {
        if !self.twins.delete(id).await? {
            return Err(DomainError::twin_not_found(id));
        }
        info!("Deleted twin instance");
        Ok(())
    }
}
