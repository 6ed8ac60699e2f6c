//! Field specifications derived from column metadata
//!
//! A [`FieldSpec`] is the schema-level view of a column: its name, stored
//! data type and the role-specific attributes of its [`FieldType`].

use crate::types::{DataType, FieldType, TimeUnit};
use serde::Serialize;

/// Granularity of a TIME column: how its values map onto wall-clock time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeGranularitySpec {
    pub data_type: DataType,
    pub time_unit: TimeUnit,
    pub name: String,
}

impl TimeGranularitySpec {
    pub fn new(data_type: DataType, time_unit: TimeUnit, name: impl Into<String>) -> Self {
        Self {
            data_type,
            time_unit,
            name: name.into(),
        }
    }
}

/// Schema-level description of a column, one variant per field type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "fieldType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldSpec {
    Dimension {
        name: String,
        data_type: DataType,
        single_value: bool,
    },
    Metric {
        name: String,
        data_type: DataType,
    },
    Time {
        incoming: TimeGranularitySpec,
    },
    DateTime {
        name: String,
        data_type: DataType,
        format: Option<String>,
        granularity: Option<String>,
    },
}

impl FieldSpec {
    pub fn dimension(name: impl Into<String>, data_type: DataType, single_value: bool) -> Self {
        Self::Dimension {
            name: name.into(),
            data_type,
            single_value,
        }
    }

    pub fn metric(name: impl Into<String>, data_type: DataType) -> Self {
        Self::Metric {
            name: name.into(),
            data_type,
        }
    }

    pub fn time(incoming: TimeGranularitySpec) -> Self {
        Self::Time { incoming }
    }

    pub fn date_time(
        name: impl Into<String>,
        data_type: DataType,
        format: Option<String>,
        granularity: Option<String>,
    ) -> Self {
        Self::DateTime {
            name: name.into(),
            data_type,
            format,
            granularity,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Dimension { name, .. } | Self::Metric { name, .. } | Self::DateTime { name, .. } => name,
            Self::Time { incoming } => &incoming.name,
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Self::Dimension { data_type, .. }
            | Self::Metric { data_type, .. }
            | Self::DateTime { data_type, .. } => *data_type,
            Self::Time { incoming } => incoming.data_type,
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Dimension { .. } => FieldType::Dimension,
            Self::Metric { .. } => FieldType::Metric,
            Self::Time { .. } => FieldType::Time,
            Self::DateTime { .. } => FieldType::DateTime,
        }
    }

    /// Only dimensions may be multi-valued
    pub fn is_single_value(&self) -> bool {
        match self {
            Self::Dimension { single_value, .. } => *single_value,
            _ => true,
        }
    }
}
