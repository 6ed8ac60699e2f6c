//! # ALICE-Column-Meta
//!
//! Per-column metadata for immutable columnar segments.
//!
//! Every segment directory carries a `metadata.properties` file describing
//! how each column's raw bytes are encoded: cardinality, bit width,
//! dictionary and index presence, value range, partitioning and temporal
//! semantics. This crate decodes that flat key/value file into typed,
//! immutable [`ColumnMetadata`] that readers, indexers and query executors
//! rely on.
//!
//! ## Pipeline
//!
//! ```text
//! metadata.properties
//!     ↓  SegmentProperties (MetadataConfig)
//! ColumnMetadata::from_config(column, &config)
//!     ↓  type-directed parsing (bounds, partitions, padding)
//! ColumnMetadataBuilder
//!     ↓  build()
//! ColumnMetadata + derived FieldSpec
//! ```
//!
//! ## Example
//!
//! ```rust
//! use alice_column_meta::{ColumnMetadata, ColumnValue, FieldType, SegmentProperties};
//!
//! let props: SegmentProperties = "\
//! clicks.cardinality = 10
//! clicks.totalDocs = 1000
//! clicks.dataType = INT
//! clicks.bitsPerElement = 4
//! clicks.dictionaryElementSize = 4
//! clicks.columnType = METRIC
//! clicks.isSorted = false
//! clicks.hasNullValue = false
//! clicks.hasInvertedIndex = false
//! clicks.isSingleValued = true
//! clicks.maxMultiValueElements = 0
//! clicks.totalNumberOfEntries = 1000
//! clicks.minValue = 5
//! clicks.maxValue = 100
//! "
//! .parse()
//! .unwrap();
//!
//! let meta = ColumnMetadata::from_config("clicks", &props).unwrap();
//! assert_eq!(meta.field_type(), FieldType::Metric);
//! assert_eq!(meta.min_value(), Some(&ColumnValue::Int(5)));
//! assert_eq!(meta.max_value(), Some(&ColumnValue::Int(100)));
//! ```

// --- Global Allocator: mimalloc (Microsoft's high-performance allocator) ---
#[cfg(not(target_env = "msvc"))]
use mimalloc::MiMalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

pub mod column_metadata;
pub mod config;
pub mod escape;
pub mod field_spec;
pub mod partition;
pub mod segment;
pub mod types;
pub mod value;

pub use column_metadata::{ColumnMetadata, ColumnMetadataBuilder};
pub use config::{column_key, keys, MetadataConfig, SegmentProperties};
pub use escape::unescape;
pub use field_spec::{FieldSpec, TimeGranularitySpec};
pub use partition::{extract_partitions, partition_function, PartitionFunction};
pub use segment::SegmentColumns;
pub use types::{
    DataType, FieldType, TextIndexType, TimeUnit, DEFAULT_TIME_UNIT, LEGACY_STRING_PAD_CHAR,
    UNKNOWN_CARDINALITY,
};
pub use value::ColumnValue;

use thiserror::Error;

/// Error types for column metadata decoding
///
/// Every variant is fatal for the column being decoded; no partially built
/// metadata is ever returned.
#[derive(Error, Debug)]
pub enum ColumnMetadataError {
    #[error("Missing required property: {key}")]
    MissingRequiredProperty { key: String },

    #[error("Unrecognized {kind}: {value}")]
    UnrecognizedEnumValue { kind: &'static str, value: String },

    #[error("Malformed numeric value for {key}: {value:?}")]
    MalformedNumericLiteral { key: String, value: String },

    #[error("Unsupported data type: {data_type} for column: {column}")]
    UnsupportedDataTypeForBounds { column: String, data_type: DataType },

    #[error("Unsupported field type: {field_type}")]
    UnsupportedFieldType { field_type: String },

    #[error("Invalid padding character: {raw:?} decodes to an empty string")]
    InvalidPaddingCharacter { raw: String },

    #[error("Column {column} has {present} but no {missing}")]
    MismatchedBounds {
        column: String,
        present: &'static str,
        missing: &'static str,
    },

    #[error("Malformed hex value for {key}: {value:?}")]
    MalformedHex { key: String, value: String },

    #[error("Malformed boolean value for {key}: {value:?}")]
    MalformedBoolean { key: String, value: String },

    #[error("Unknown partition function: {name}")]
    UnknownPartitionFunction { name: String },

    #[error("Invalid number of partitions: {num_partitions}")]
    InvalidNumPartitions { num_partitions: i32 },

    #[error("Malformed partition value: {value:?}")]
    MalformedPartitionValue { value: String },

    #[error("Invalid escape sequence in {raw:?}")]
    InvalidEscape { raw: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ColumnMetadataError {
    pub fn missing(key: impl Into<String>) -> Self {
        Self::MissingRequiredProperty { key: key.into() }
    }

    pub fn unrecognized(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnrecognizedEnumValue {
            kind,
            value: value.into(),
        }
    }

    pub fn malformed_number(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::MalformedNumericLiteral {
            key: key.into(),
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ColumnMetadataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ColumnMetadataError::missing("clicks.dataType").to_string(),
            "Missing required property: clicks.dataType"
        );
        assert_eq!(
            ColumnMetadataError::unrecognized("field type", "FACT").to_string(),
            "Unrecognized field type: FACT"
        );
        assert_eq!(
            ColumnMetadataError::UnsupportedDataTypeForBounds {
                column: "m".to_string(),
                data_type: DataType::Map,
            }
            .to_string(),
            "Unsupported data type: MAP for column: m"
        );
    }

    #[test]
    fn test_constants() {
        assert_eq!(UNKNOWN_CARDINALITY, i32::MIN);
        assert_eq!(LEGACY_STRING_PAD_CHAR, '%');
        assert_eq!(DEFAULT_TIME_UNIT, TimeUnit::Days);
    }
}
