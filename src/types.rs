//! Column Types - data types, field types, time units, text index types
//!
//! Every enum here is persisted as its upper-case name in
//! `metadata.properties`. Parsing upper-cases the input first, so
//! `"int"`, `"Int"` and `"INT"` all resolve to [`DataType::Int`].

use crate::{ColumnMetadataError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Cardinality recorded for no-dictionary columns of a realtime segment
pub const UNKNOWN_CARDINALITY: i32 = i32::MIN;

/// Padding character used by segments written before the padding key existed
pub const LEGACY_STRING_PAD_CHAR: char = '%';

/// Time unit assumed when the segment does not record one
pub const DEFAULT_TIME_UNIT: TimeUnit = TimeUnit::Days;

/// Logical data type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    Int,
    Long,
    Float,
    Double,
    Boolean,
    Timestamp,
    String,
    Json,
    Bytes,
    Struct,
    Map,
    List,
}

impl DataType {
    /// The physical type values of this logical type are stored as
    pub fn stored_type(self) -> Self {
        match self {
            Self::Boolean => Self::Int,
            Self::Timestamp => Self::Long,
            Self::Json => Self::String,
            other => other,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Int => "INT",
            Self::Long => "LONG",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Boolean => "BOOLEAN",
            Self::Timestamp => "TIMESTAMP",
            Self::String => "STRING",
            Self::Json => "JSON",
            Self::Bytes => "BYTES",
            Self::Struct => "STRUCT",
            Self::Map => "MAP",
            Self::List => "LIST",
        }
    }
}

impl FromStr for DataType {
    type Err = ColumnMetadataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "INT" => Ok(Self::Int),
            "LONG" => Ok(Self::Long),
            "FLOAT" => Ok(Self::Float),
            "DOUBLE" => Ok(Self::Double),
            "BOOLEAN" => Ok(Self::Boolean),
            "TIMESTAMP" => Ok(Self::Timestamp),
            "STRING" => Ok(Self::String),
            "JSON" => Ok(Self::Json),
            "BYTES" => Ok(Self::Bytes),
            "STRUCT" => Ok(Self::Struct),
            "MAP" => Ok(Self::Map),
            "LIST" => Ok(Self::List),
            _ => Err(ColumnMetadataError::unrecognized("data type", s)),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Semantic role of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    Dimension,
    Metric,
    Time,
    DateTime,
}

impl FieldType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Dimension => "DIMENSION",
            Self::Metric => "METRIC",
            Self::Time => "TIME",
            Self::DateTime => "DATE_TIME",
        }
    }
}

impl FromStr for FieldType {
    type Err = ColumnMetadataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "DIMENSION" => Ok(Self::Dimension),
            "METRIC" => Ok(Self::Metric),
            "TIME" => Ok(Self::Time),
            "DATE_TIME" => Ok(Self::DateTime),
            _ => Err(ColumnMetadataError::unrecognized("field type", s)),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Granularity of a TIME column's values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    pub fn name(self) -> &'static str {
        match self {
            Self::Nanoseconds => "NANOSECONDS",
            Self::Microseconds => "MICROSECONDS",
            Self::Milliseconds => "MILLISECONDS",
            Self::Seconds => "SECONDS",
            Self::Minutes => "MINUTES",
            Self::Hours => "HOURS",
            Self::Days => "DAYS",
        }
    }
}

impl Default for TimeUnit {
    fn default() -> Self {
        DEFAULT_TIME_UNIT
    }
}

impl FromStr for TimeUnit {
    type Err = ColumnMetadataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "NANOSECONDS" => Ok(Self::Nanoseconds),
            "MICROSECONDS" => Ok(Self::Microseconds),
            "MILLISECONDS" => Ok(Self::Milliseconds),
            "SECONDS" => Ok(Self::Seconds),
            "MINUTES" => Ok(Self::Minutes),
            "HOURS" => Ok(Self::Hours),
            "DAYS" => Ok(Self::Days),
            _ => Err(ColumnMetadataError::unrecognized("time unit", s)),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Text index attached to a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextIndexType {
    #[default]
    None,
    Lucene,
}

impl TextIndexType {
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Lucene => "LUCENE",
        }
    }
}

impl FromStr for TextIndexType {
    type Err = ColumnMetadataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "NONE" => Ok(Self::None),
            "LUCENE" => Ok(Self::Lucene),
            _ => Err(ColumnMetadataError::unrecognized("text index type", s)),
        }
    }
}

impl fmt::Display for TextIndexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_parse_is_case_insensitive() {
        assert_eq!("int".parse::<DataType>().unwrap(), DataType::Int);
        assert_eq!("Bytes".parse::<DataType>().unwrap(), DataType::Bytes);
        assert_eq!("TIMESTAMP".parse::<DataType>().unwrap(), DataType::Timestamp);
    }

    #[test]
    fn test_data_type_unknown() {
        match "DECIMAL".parse::<DataType>() {
            Err(ColumnMetadataError::UnrecognizedEnumValue { kind, value }) => {
                assert_eq!(kind, "data type");
                assert_eq!(value, "DECIMAL");
            }
            other => panic!("Expected UnrecognizedEnumValue, got {:?}", other),
        }
    }

    #[test]
    fn test_stored_type() {
        assert_eq!(DataType::Boolean.stored_type(), DataType::Int);
        assert_eq!(DataType::Timestamp.stored_type(), DataType::Long);
        assert_eq!(DataType::Json.stored_type(), DataType::String);
        assert_eq!(DataType::Double.stored_type(), DataType::Double);
        assert_eq!(DataType::Bytes.stored_type(), DataType::Bytes);
    }

    #[test]
    fn test_field_type_parse() {
        assert_eq!("date_time".parse::<FieldType>().unwrap(), FieldType::DateTime);
        assert_eq!("metric".parse::<FieldType>().unwrap(), FieldType::Metric);
        assert!("DATETIME".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_time_unit_default_and_parse() {
        assert_eq!(TimeUnit::default(), TimeUnit::Days);
        assert_eq!("milliseconds".parse::<TimeUnit>().unwrap(), TimeUnit::Milliseconds);
        assert_eq!(TimeUnit::Hours.to_string(), "HOURS");
    }

    #[test]
    fn test_text_index_type() {
        assert_eq!(TextIndexType::default(), TextIndexType::None);
        assert_eq!("lucene".parse::<TextIndexType>().unwrap(), TextIndexType::Lucene);
        assert!("FST".parse::<TextIndexType>().is_err());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(DataType::Long.to_string(), "LONG");
        assert_eq!(FieldType::DateTime.to_string(), "DATE_TIME");
        assert_eq!(TimeUnit::Seconds.to_string(), "SECONDS");
        assert_eq!(TextIndexType::Lucene.to_string(), "LUCENE");
    }
}
