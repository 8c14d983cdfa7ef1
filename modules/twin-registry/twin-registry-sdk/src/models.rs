//! Public models for the `twin-registry` module.
//!
//! These are transport-agnostic data structures that define the contract
//! between the `twin-registry` module and its consumers.

use std::collections::BTreeMap;

use time::OffsetDateTime;

use crate::errors::TwinRegistryError;

/// Free-form JSON object holding twin properties.
pub type PropertyMap = serde_json::Map<String, serde_json::Value>;

/// String-to-string labels attached to a twin.
pub type TagMap = BTreeMap<String, String>;

/// A twin model blueprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwinModel {
    pub id: String,
    pub display_name: String,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Data for creating a new twin model.
///
/// A missing or blank `id` makes the registry generate one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTwinModel {
    pub id: Option<String>,
    pub display_name: String,
    pub description: Option<String>,
}

impl NewTwinModel {
    /// A model with just a display name; the id is generated on create.
    #[must_use]
    pub fn named(display_name: impl Into<String>) -> Self {
        Self {
            id: None,
            display_name: display_name.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Replacement data for an existing twin model.
///
/// `id`, when present, must match the id of the model being updated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TwinModelUpdate {
    pub id: Option<String>,
    pub display_name: String,
    pub description: Option<String>,
}

/// A twin instance with its desired/reported property shadow.
#[derive(Debug, Clone, PartialEq)]
pub struct TwinInstance {
    pub id: String,
    pub model_id: String,
    /// State last reported by the physical asset.
    pub reported_properties: PropertyMap,
    /// State requested by operators.
    pub desired_properties: PropertyMap,
    pub tags: TagMap,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Data for creating a new twin instance.
///
/// There is no reported container here: a new twin always starts with
/// empty reported properties.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewTwinInstance {
    pub id: Option<String>,
    pub model_id: String,
    pub desired_properties: PropertyMap,
    pub tags: TagMap,
}

impl NewTwinInstance {
    /// A twin of the given model with empty desired properties and tags.
    #[must_use]
    pub fn for_model(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            ..Self::default()
        }
    }
}

/// Partial update of a twin instance.
///
/// Only the supplied fields are written. Reported properties can only be
/// changed through `update_reported_properties`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TwinInstanceUpdate {
    pub model_id: Option<String>,
    pub desired_properties: Option<PropertyMap>,
    pub tags: Option<TagMap>,
}

/// A single telemetry value. Exactly one kind per record.
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryValue {
    Numeric(f64),
    Text(String),
    Boolean(bool),
}

impl TelemetryValue {
    #[must_use]
    pub const fn as_numeric(&self) -> Option<f64> {
        match self {
            Self::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

/// Caller-facing form of a telemetry value: three optional slots.
///
/// Converts into [`TelemetryValue`] only when exactly one slot is populated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TelemetryValueSlots {
    pub numeric: Option<f64>,
    pub text: Option<String>,
    pub boolean: Option<bool>,
}

impl TryFrom<TelemetryValueSlots> for TelemetryValue {
    type Error = TwinRegistryError;

    fn try_from(slots: TelemetryValueSlots) -> Result<Self, Self::Error> {
        match (slots.numeric, slots.text, slots.boolean) {
            (Some(v), None, None) => {
                if v.is_finite() {
                    Ok(Self::Numeric(v))
                } else {
                    Err(TwinRegistryError::invalid_argument(
                        "numeric telemetry value must be finite",
                    ))
                }
            }
            (None, Some(v), None) => Ok(Self::Text(v)),
            (None, None, Some(v)) => Ok(Self::Boolean(v)),
            (None, None, None) => Err(TwinRegistryError::invalid_argument(
                "telemetry value must populate one of numeric, text or boolean",
            )),
            _ => Err(TwinRegistryError::invalid_argument(
                "telemetry value must populate only one of numeric, text or boolean",
            )),
        }
    }
}

impl From<TelemetryValue> for TelemetryValueSlots {
    fn from(value: TelemetryValue) -> Self {
        match value {
            TelemetryValue::Numeric(v) => Self {
                numeric: Some(v),
                ..Self::default()
            },
            TelemetryValue::Text(v) => Self {
                text: Some(v),
                ..Self::default()
            },
            TelemetryValue::Boolean(v) => Self {
                boolean: Some(v),
                ..Self::default()
            },
        }
    }
}

/// A stored telemetry reading.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryRecord {
    /// UTC, microsecond precision.
    pub timestamp: OffsetDateTime,
    pub twin_id: String,
    pub name: String,
    pub value: TelemetryValue,
}

/// Latest reading per telemetry name.
pub type LatestTelemetry = BTreeMap<String, TelemetryRecord>;

/// A telemetry reading to append. The twin is given separately.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTelemetryRecord {
    pub timestamp: OffsetDateTime,
    pub name: String,
    pub value: TelemetryValueSlots,
}

impl NewTelemetryRecord {
    #[must_use]
    pub fn numeric(name: impl Into<String>, timestamp: OffsetDateTime, value: f64) -> Self {
        Self {
            timestamp,
            name: name.into(),
            value: TelemetryValueSlots {
                numeric: Some(value),
                ..TelemetryValueSlots::default()
            },
        }
    }

    #[must_use]
    pub fn text(
        name: impl Into<String>,
        timestamp: OffsetDateTime,
        value: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            name: name.into(),
            value: TelemetryValueSlots {
                text: Some(value.into()),
                ..TelemetryValueSlots::default()
            },
        }
    }

    #[must_use]
    pub fn boolean(name: impl Into<String>, timestamp: OffsetDateTime, value: bool) -> Self {
        Self {
            timestamp,
            name: name.into(),
            value: TelemetryValueSlots {
                boolean: Some(value),
                ..TelemetryValueSlots::default()
            },
        }
    }
}

/// Direction of a telemetry range query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// A time-range query over one telemetry series.
///
/// Both bounds are inclusive. `limit == 0` means unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryRangeQuery {
    pub twin_id: String,
    pub name: String,
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
    pub order: SortOrder,
    pub limit: u64,
}

impl TelemetryRangeQuery {
    /// Ascending, unbounded query over `[start, end]`.
    #[must_use]
    pub fn new(
        twin_id: impl Into<String>,
        name: impl Into<String>,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Self {
        Self {
            twin_id: twin_id.into(),
            name: name.into(),
            start,
            end,
            order: SortOrder::Ascending,
            limit: 0,
        }
    }

    #[must_use]
    pub const fn descending(mut self) -> Self {
        self.order = SortOrder::Descending;
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }
}
