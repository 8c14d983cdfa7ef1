//! Conversions between SeaORM rows and SDK contract types.
//!
//! Rows are decoded strictly: a row that violates an entity invariant is
//! reported as [`MalformedRow`] instead of being patched up, except for JSON
//! `null` containers which read back as empty. Listings decode every raw
//! [`QueryResult`] on its own, so a column SeaORM cannot read skips that row
//! only.

use sea_orm::{FromQueryResult, QueryResult};
use serde_json::Value;
use time::OffsetDateTime;
use twin_registry_sdk::{
    PropertyMap, TagMap, TelemetryRecord, TelemetryValue, TelemetryValueSlots, TwinInstance,
    TwinModel,
};

use crate::domain::error::DomainError;
use crate::infra::storage::entity::{telemetry, twin_instance, twin_model};

const NANOS_PER_MICRO: i128 = 1_000;

/// A stored row that cannot be turned into a valid entity.
#[derive(Debug, thiserror::Error)]
#[error("malformed {table} row '{id}': {reason}")]
pub struct MalformedRow {
    pub table: &'static str,
    pub id: String,
    pub reason: String,
}

impl MalformedRow {
    fn new(table: &'static str, id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            table,
            id: id.into(),
            reason: reason.into(),
        }
    }
}

impl From<MalformedRow> for DomainError {
    fn from(e: MalformedRow) -> Self {
        DomainError::database(e.to_string())
    }
}

/// Keep the decoded rows, dropping the failures with a warning.
fn skip_malformed<T>(decoded: impl IntoIterator<Item = Result<T, MalformedRow>>) -> Vec<T> {
    decoded
        .into_iter()
        .filter_map(|row| match row {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(
                    table = e.table,
                    id = %e.id,
                    reason = %e.reason,
                    "Skipping malformed row"
                );
                None
            }
        })
        .collect()
}

/// Read one raw row into the entity model `M`, then into `T`.
///
/// `key` names the column used to identify the row in the error when the
/// model itself cannot be read.
pub fn decode_raw<M, T>(
    row: &QueryResult,
    table: &'static str,
    key: &str,
) -> Result<T, MalformedRow>
where
    M: FromQueryResult,
    T: TryFrom<M, Error = MalformedRow>,
{
    let model = M::from_query_result(row, "").map_err(|e| {
        let id = row
            .try_get::<String>("", key)
            .or_else(|_| row.try_get::<i64>("", key).map(|seq| seq.to_string()))
            .unwrap_or_else(|_| "?".to_owned());
        MalformedRow::new(table, id, e.to_string())
    })?;
    T::try_from(model)
}

/// Decode raw rows one by one, dropping the ones that fail with a warning.
#[must_use]
pub fn decode_raw_rows<M, T>(
    rows: &[QueryResult],
    table: &'static str,
    key: &str,
) -> Vec<T>
where
    M: FromQueryResult,
    T: TryFrom<M, Error = MalformedRow>,
{
    skip_malformed(rows.iter().map(|row| decode_raw::<M, T>(row, table, key)))
}

impl TryFrom<twin_model::Model> for TwinModel {
    type Error = MalformedRow;

    fn try_from(e: twin_model::Model) -> Result<Self, Self::Error> {
        if e.display_name.trim().is_empty() {
            return Err(MalformedRow::new("twin_models", e.id, "empty display name"));
        }
        Ok(Self {
            id: e.id,
            display_name: e.display_name,
            description: e.description,
            created_at: e.created_at,
            updated_at: e.updated_at,
        })
    }
}

fn json_to_properties(value: Value) -> Result<PropertyMap, String> {
    match value {
        Value::Null => Ok(PropertyMap::new()),
        Value::Object(map) => Ok(map),
        other => Err(format!("expected a JSON object, found {}", json_kind(&other))),
    }
}

fn json_to_tags(value: Value) -> Result<TagMap, String> {
    json_to_properties(value)?
        .into_iter()
        .map(|(k, v)| match v {
            Value::String(s) => Ok((k, s)),
            other => Err(format!(
                "tag '{k}' must be a string, found {}",
                json_kind(&other)
            )),
        })
        .collect()
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[must_use]
pub fn properties_to_json(properties: &PropertyMap) -> Value {
    Value::Object(properties.clone())
}

#[must_use]
pub fn tags_to_json(tags: &TagMap) -> Value {
    Value::Object(
        tags.iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}

impl TryFrom<twin_instance::Model> for TwinInstance {
    type Error = MalformedRow;

    fn try_from(e: twin_instance::Model) -> Result<Self, Self::Error> {
        let malformed = |field: &str, reason: String| {
            MalformedRow::new("twin_instances", e.id.clone(), format!("{field}: {reason}"))
        };
        let reported_properties = json_to_properties(e.reported_properties)
            .map_err(|r| malformed("reported_properties", r))?;
        let desired_properties = json_to_properties(e.desired_properties)
            .map_err(|r| malformed("desired_properties", r))?;
        let tags = json_to_tags(e.tags).map_err(|r| malformed("tags", r))?;

        Ok(Self {
            id: e.id,
            model_id: e.model_id,
            reported_properties,
            desired_properties,
            tags,
            created_at: e.created_at,
            updated_at: e.updated_at,
        })
    }
}

/// Unix microseconds of a timestamp, rounding towards the past.
pub fn unix_micros_floor(ts: OffsetDateTime) -> Result<i64, DomainError> {
    i64::try_from(ts.unix_timestamp_nanos().div_euclid(NANOS_PER_MICRO))
        .map_err(|_| DomainError::validation("timestamp", "outside the storable range"))
}

/// Unix microseconds of a timestamp, rounding towards the future.
pub fn unix_micros_ceil(ts: OffsetDateTime) -> Result<i64, DomainError> {
    let nanos = ts.unix_timestamp_nanos();
    let micros =
        nanos.div_euclid(NANOS_PER_MICRO) + i128::from(nanos.rem_euclid(NANOS_PER_MICRO) != 0);
    i64::try_from(micros)
        .map_err(|_| DomainError::validation("timestamp", "outside the storable range"))
}

fn from_unix_micros(micros: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(micros) * NANOS_PER_MICRO).ok()
}

impl TryFrom<telemetry::Model> for TelemetryRecord {
    type Error = MalformedRow;

    fn try_from(e: telemetry::Model) -> Result<Self, Self::Error> {
        let seq = e.seq.to_string();
        let timestamp = from_unix_micros(e.ts).ok_or_else(|| {
            MalformedRow::new("telemetry", &seq, format!("timestamp {} out of range", e.ts))
        })?;
        let value = TelemetryValue::try_from(TelemetryValueSlots {
            numeric: e.value_numeric,
            text: e.value_text,
            boolean: e.value_boolean,
        })
        .map_err(|err| MalformedRow::new("telemetry", &seq, err.to_string()))?;

        Ok(Self {
            timestamp,
            twin_id: e.twin_id,
            name: e.name,
            value,
        })
    }
}

/// Split a telemetry value into its storage columns.
#[must_use]
pub fn value_columns(value: &TelemetryValue) -> (Option<f64>, Option<String>, Option<bool>) {
    match value {
        TelemetryValue::Numeric(v) => (Some(*v), None, None),
        TelemetryValue::Text(v) => (None, Some(v.clone()), None),
        TelemetryValue::Boolean(v) => (None, None, Some(*v)),
    }
}
