use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};
use twin_registry_sdk::{
    LatestTelemetry, NewTelemetryRecord, TelemetryRangeQuery, TelemetryRecord, TelemetryValue,
    TwinRegistryError,
};

use super::{ServiceConfig, run_cancellable, to_storage_precision, validate_id};
use crate::domain::error::DomainError;
use crate::domain::repos::TelemetryRepository;

/// Domain service for the append-only telemetry store.
///
/// Appends do not check that the twin exists. Queries honour the caller's
/// cancellation token and the configured query timeout.
#[derive(Clone)]
pub struct TelemetryService {
    repo: Arc<dyn TelemetryRepository>,
    config: ServiceConfig,
}

/// Validate a caller record and bring it into stored form.
fn validate_record(
    twin_id: &str,
    record: NewTelemetryRecord,
    max_len: usize,
) -> Result<TelemetryRecord, DomainError> {
    validate_id("name", &record.name, max_len)?;
    let value = TelemetryValue::try_from(record.value).map_err(|e| match e {
        TwinRegistryError::InvalidArgument { message } => DomainError::validation("value", message),
        other => DomainError::validation("value", other.to_string()),
    })?;

    Ok(TelemetryRecord {
        timestamp: to_storage_precision(record.timestamp),
        twin_id: twin_id.to_owned(),
        name: record.name,
        value,
    })
}

impl TelemetryService {
    #[must_use]
    pub fn new(repo: Arc<dyn TelemetryRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    #[instrument(skip(self, record), fields(name = %record.name))]
    pub async fn append_telemetry(
        &self,
        twin_id: &str,
        record: NewTelemetryRecord,
    ) -> Result<TelemetryRecord, DomainError> {
        let max_len = self.config.max_id_length;
        validate_id("twin_id", twin_id, max_len)?;
        let record = validate_record(twin_id, record, max_len)?;
        self.repo.append(&record).await?;
        debug!("Appended telemetry record");
        Ok(record)
    }

    /// Validate every record, then write them all in one statement.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn append_telemetry_batch(
        &self,
        twin_id: &str,
        records: Vec<NewTelemetryRecord>,
    ) -> Result<u64, DomainError> {
        let max_len = self.config.max_id_length;
        validate_id("twin_id", twin_id, max_len)?;
        if records.is_empty() {
            return Ok(0);
        }

        let validated = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| {
                validate_record(twin_id, record, max_len).map_err(|e| match e {
                    DomainError::Validation { field, message } => {
                        DomainError::validation(format!("records[{i}].{field}"), message)
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let written = self.repo.append_many(&validated).await?;
        info!(written, "Appended telemetry batch");
        Ok(written)
    }

    #[instrument(skip(self, query, cancel), fields(twin_id = %query.twin_id, name = %query.name))]
    pub async fn query_telemetry_range(
        &self,
        query: TelemetryRangeQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<TelemetryRecord>, DomainError> {
        let max_len = self.config.max_id_length;
        validate_id("twin_id", &query.twin_id, max_len)?;
        validate_id("name", &query.name, max_len)?;
        if query.start > query.end {
            return Err(DomainError::validation("start", "must not be after end"));
        }

        let records = run_cancellable(
            "telemetry range query",
            self.config.query_timeout,
            cancel,
            self.repo.range(&query),
        )
        .await?;

        debug!("Range query returned {} records", records.len());
        Ok(records)
    }

    #[instrument(skip(self, cancel))]
    pub async fn query_latest_telemetry(
        &self,
        twin_id: &str,
        names: &[String],
        cancel: &CancellationToken,
    ) -> Result<LatestTelemetry, DomainError> {
        let max_len = self.config.max_id_length;
        validate_id("twin_id", twin_id, max_len)?;
        for name in names {
            validate_id("names", name, max_len)?;
        }

        let latest = run_cancellable(
            "latest telemetry query",
            self.config.query_timeout,
            cancel,
            async {
                let names = if names.is_empty() {
                    self.repo.names(twin_id).await?
                } else {
                    names.to_vec()
                };

                let mut latest = LatestTelemetry::new();
                for name in names {
                    if latest.contains_key(&name) {
                        continue;
                    }
                    if let Some(record) = self.repo.latest(twin_id, &name).await? {
                        latest.insert(name, record);
                    }
                }
                Ok(latest)
            },
        )
        .await?;

        debug!("Latest query returned {} series", latest.len());
        Ok(latest)
    }
}
