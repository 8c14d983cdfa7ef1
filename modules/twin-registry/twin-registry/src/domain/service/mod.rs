//! Domain service layer - business logic and rules.
//!
//! One service per entity family:
//! - `models` - twin model CRUD, referential checks before delete
//! - `twins` - twin instance CRUD and the desired/reported property shadow
//! - `telemetry` - append and cancellable range/latest queries
//!
//! Services depend only on the repository ports in `domain::repos`.

use std::future::Future;
use std::time::Duration;

use time::{OffsetDateTime, UtcOffset};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::TwinRegistryConfig;
use crate::domain::error::DomainError;

mod models;
mod telemetry;
#[cfg(test)]
mod test_support;
mod twins;

pub use models::ModelsService;
pub use telemetry::TelemetryService;
pub use twins::TwinsService;

/// Configuration for the domain services
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_id_length: usize,
    pub max_display_name_length: usize,
    pub query_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::from(&TwinRegistryConfig::default())
    }
}

impl From<&TwinRegistryConfig> for ServiceConfig {
    fn from(cfg: &TwinRegistryConfig) -> Self {
        Self {
            max_id_length: cfg.max_id_length,
            max_display_name_length: cfg.max_display_name_length,
            query_timeout: cfg.query_timeout,
        }
    }
}

/// Current time in UTC at the precision the store keeps.
pub(crate) fn now_utc() -> OffsetDateTime {
    to_storage_precision(OffsetDateTime::now_utc())
}

/// Convert to UTC and drop sub-microsecond digits.
pub(crate) fn to_storage_precision(ts: OffsetDateTime) -> OffsetDateTime {
    let ts = ts.to_offset(UtcOffset::UTC);
    let nanos = ts.nanosecond();
    ts.replace_nanosecond(nanos - nanos % 1_000).unwrap_or(ts)
}

/// Use the supplied id, or generate `<prefix>-<uuid v7>` when it is absent or blank.
pub(crate) fn resolve_id(
    prefix: &str,
    supplied: Option<String>,
    max_len: usize,
) -> Result<(String, bool), DomainError> {
    match supplied {
        Some(id) if !id.trim().is_empty() => {
            validate_id("id", &id, max_len)?;
            Ok((id, true))
        }
        _ => Ok((format!("{prefix}-{}", Uuid::now_v7()), false)),
    }
}

pub(crate) fn validate_id(field: &str, id: &str, max_len: usize) -> Result<(), DomainError> {
    if id.trim().is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    if id.chars().count() > max_len {
        return Err(DomainError::validation(
            field,
            format!("must be at most {max_len} characters"),
        ));
    }
    Ok(())
}

/// Run `fut` unless `cancel` fires or `timeout` elapses first.
///
/// A token that is already cancelled short-circuits before `fut` is polled.
/// On cancellation or timeout `fut` is dropped and no partial result escapes.
pub(crate) async fn run_cancellable<T, F>(
    operation: &'static str,
    timeout: Duration,
    cancel: &CancellationToken,
    fut: F,
) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    if cancel.is_cancelled() {
        return Err(DomainError::cancelled(operation));
    }

    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            tracing::debug!(operation, "query cancelled by caller");
            Err(DomainError::cancelled(operation))
        }
        res = tokio::time::timeout(timeout, fut) => match res {
            Ok(inner) => inner,
            Err(_elapsed) => {
                tracing::warn!(operation, ?timeout, "query deadline exceeded");
                Err(DomainError::deadline_exceeded(operation, timeout))
            }
        },
    }
}
