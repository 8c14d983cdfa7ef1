use async_trait::async_trait;
use time::OffsetDateTime;
use twin_registry_sdk::{TwinModel, TwinModelUpdate};

use crate::domain::error::DomainError;

/// Repository trait for twin model persistence.
///
/// Implementations map storage constraint failures onto domain errors:
/// a duplicate id becomes [`DomainError::ModelAlreadyExists`] and a delete
/// blocked by referencing twins becomes [`DomainError::ModelInUse`].
#[async_trait]
pub trait ModelsRepository: Send + Sync {
    /// Find a model by ID.
    async fn get(&self, id: &str) -> Result<Option<TwinModel>, DomainError>;

    /// All models ordered by ID. Rows that cannot be decoded are skipped.
    async fn list(&self) -> Result<Vec<TwinModel>, DomainError>;

    /// Check if a model with the given ID exists.
    async fn exists(&self, id: &str) -> Result<bool, DomainError>;

    /// Insert a fully populated model.
    async fn insert(&self, model: TwinModel) -> Result<TwinModel, DomainError>;

    /// Replace display name and description, stamping `updated_at`.
    async fn update(
        &self,
        id: &str,
        update: &TwinModelUpdate,
        updated_at: OffsetDateTime,
    ) -> Result<TwinModel, DomainError>;

    /// Delete a model by ID. Returns `false` when nothing was deleted.
    async fn delete(&self, id: &str) -> Result<bool, DomainError>;
}
