use async_trait::async_trait;
use time::OffsetDateTime;
use twin_registry_sdk::{PropertyMap, TwinInstance, TwinInstanceUpdate};

use crate::domain::error::DomainError;

/// Repository trait for twin instance persistence.
///
/// Every write touches only the columns it names plus `updated_at`, so
/// concurrent writes to different containers of one twin never overwrite
/// each other.
#[async_trait]
pub trait TwinsRepository: Send + Sync {
    /// Find a twin by ID.
    async fn get(&self, id: &str) -> Result<Option<TwinInstance>, DomainError>;

    /// All twins ordered by ID. Rows that cannot be decoded are skipped.
    async fn list(&self) -> Result<Vec<TwinInstance>, DomainError>;

    /// Twins of one model ordered by ID. Rows that cannot be decoded are skipped.
    async fn list_by_model(&self, model_id: &str) -> Result<Vec<TwinInstance>, DomainError>;

    /// Number of twins referencing a model.
    async fn count_by_model(&self, model_id: &str) -> Result<u64, DomainError>;

    /// Check if a twin with the given ID exists.
    async fn exists(&self, id: &str) -> Result<bool, DomainError>;

    /// Insert a fully populated twin.
    ///
    /// A dangling `model_id` surfaces as [`DomainError::InvalidModelReference`].
    async fn insert(&self, twin: TwinInstance) -> Result<TwinInstance, DomainError>;

    /// Write the supplied fields of `update`. Reported properties are never written.
    async fn update(
        &self,
        id: &str,
        update: &TwinInstanceUpdate,
        updated_at: OffsetDateTime,
    ) -> Result<TwinInstance, DomainError>;

    /// Overwrite the reported properties only.
    async fn update_reported(
        &self,
        id: &str,
        properties: &PropertyMap,
        updated_at: OffsetDateTime,
    ) -> Result<TwinInstance, DomainError>;

    /// Delete a twin by ID. Returns `false` when nothing was deleted.
    async fn delete(&self, id: &str) -> Result<bool, DomainError>;
}
