use async_trait::async_trait;
use twin_registry_sdk::{TelemetryRangeQuery, TelemetryRecord};

use crate::domain::error::DomainError;

/// Repository trait for the append-only telemetry store.
///
/// Records with equal timestamps are ordered by insertion.
#[async_trait]
pub trait TelemetryRepository: Send + Sync {
    /// Append one validated record.
    async fn append(&self, record: &TelemetryRecord) -> Result<(), DomainError>;

    /// Append validated records in a single statement. Returns the count written.
    async fn append_many(&self, records: &[TelemetryRecord]) -> Result<u64, DomainError>;

    /// Records of one series with `start <= ts <= end` in the requested order.
    async fn range(&self, query: &TelemetryRangeQuery)
    -> Result<Vec<TelemetryRecord>, DomainError>;

    /// Distinct telemetry names ever recorded for a twin, sorted.
    async fn names(&self, twin_id: &str) -> Result<Vec<String>, DomainError>;

    /// The most recent record of one series, if any.
    async fn latest(&self, twin_id: &str, name: &str)
    -> Result<Option<TelemetryRecord>, DomainError>;
}
