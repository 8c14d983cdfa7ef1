use std::sync::Arc;

use tracing::{debug, info, instrument};
use twin_registry_sdk::{NewTwinModel, TwinModel, TwinModelUpdate};

use super::{ServiceConfig, now_utc, resolve_id};
use crate::domain::error::DomainError;
use crate::domain::repos::{ModelsRepository, TwinsRepository};

/// Domain service for twin model blueprints.
///
/// Deleting a model is refused while any twin instance references it.
#[derive(Clone)]
pub struct ModelsService {
    models: Arc<dyn ModelsRepository>,
    twins: Arc<dyn TwinsRepository>,
    config: ServiceConfig,
}

impl ModelsService {
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

    fn validate_display_name(&self, display_name: &str) -> Result<(), DomainError> {
        if display_name.trim().is_empty() {
            return Err(DomainError::validation(
                "display_name",
                "must not be empty",
            ));
        }
        let len = display_name.chars().count();
        if len > self.config.max_display_name_length {
            return Err(DomainError::validation(
                "display_name",
                format!(
                    "{len} characters exceeds the maximum of {}",
                    self.config.max_display_name_length
                ),
            ));
        }
        Ok(())
    }

    #[instrument(skip(self, new_model), fields(display_name = %new_model.display_name))]
    pub async fn create_model(&self, new_model: NewTwinModel) -> Result<TwinModel, DomainError> {
        self.validate_display_name(&new_model.display_name)?;

        let NewTwinModel {
            id,
            display_name,
            description,
        } = new_model;
        let (id, supplied) = resolve_id("model", id, self.config.max_id_length)?;

        if supplied && self.models.exists(&id).await? {
            return Err(DomainError::model_already_exists(id));
        }

        let now = now_utc();
        let model = self
            .models
            .insert(TwinModel {
                id,
                display_name,
                description,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(model_id = %model.id, "Created twin model");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn get_model(&self, id: &str) -> Result<TwinModel, DomainError> {
        debug!("Getting twin model by id");
        self.models
            .get(id)
            .await?
            .ok_or_else(|| DomainError::model_not_found(id))
    }

    #[instrument(skip(self))]
    pub async fn list_models(&self) -> Result<Vec<TwinModel>, DomainError> {
        let models = self.models.list().await?;
        debug!("Listed {} twin models", models.len());
        Ok(models)
    }

    #[instrument(skip(self, update))]
    pub async fn update_model(
        &self,
        id: &str,
        update: TwinModelUpdate,
    ) -> Result<TwinModel, DomainError> {
        if let Some(body_id) = update.id.as_deref()
            && !body_id.trim().is_empty()
            && body_id != id
        {
            return Err(DomainError::validation(
                "id",
                format!("'{body_id}' does not match the model being updated ('{id}')"),
            ));
        }
        self.validate_display_name(&update.display_name)?;

        let model = self.models.update(id, &update, now_utc()).await?;

        info!("Updated twin model");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn delete_model(&self, id: &str) -> Result<(), DomainError> {
        if !self.models.exists(id).await? {
            return Err(DomainError::model_not_found(id));
        }

        let twins = self.twins.count_by_model(id).await?;
        if twins > 0 {
            debug!(twins, "Refusing to delete referenced twin model");
            return Err(DomainError::model_in_use(id));
        }

        if !self.models.delete(id).await? {
            return Err(DomainError::model_not_found(id));
        }

        info!("Deleted twin model");
        Ok(())
    }
}
