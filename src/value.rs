//! Typed column values (min/max bounds)
//!
//! Bounds are persisted as text and parsed back according to the column's
//! stored data type. Values compare only against values of the same variant.

use crate::config::column_key;
use crate::types::DataType;
use crate::{ColumnMetadataError, Result};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// A single value of a column's stored data type
#[derive(Debug, Clone)]
pub enum ColumnValue {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
}

impl Serialize for ColumnValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Int(v) => serializer.serialize_i32(*v),
            Self::Long(v) => serializer.serialize_i64(*v),
            Self::Float(v) => serializer.serialize_f32(*v),
            Self::Double(v) => serializer.serialize_f64(*v),
            Self::String(s) => serializer.serialize_str(s),
            Self::Bytes(b) => serializer.serialize_str(&hex::encode(b)),
        }
    }
}

impl ColumnValue {
    /// Parse a persisted bound of `column` for the given stored data type
    ///
    /// `property` names the key the text was read from and only serves to
    /// describe failures.
    pub fn parse(data_type: DataType, column: &str, property: &str, text: &str) -> Result<Self> {
        let key = || column_key(column, property);
        let malformed = || ColumnMetadataError::malformed_number(key(), text);
        match data_type {
            DataType::Int => text.trim().parse().map(Self::Int).map_err(|_| malformed()),
            DataType::Long => text.trim().parse().map(Self::Long).map_err(|_| malformed()),
            DataType::Float => text.trim().parse().map(Self::Float).map_err(|_| malformed()),
            DataType::Double => text.trim().parse().map(Self::Double).map_err(|_| malformed()),
            DataType::String => Ok(Self::String(text.to_string())),
            DataType::Bytes => hex::decode(text.trim())
                .map(Self::Bytes)
                .map_err(|_| ColumnMetadataError::MalformedHex {
                    key: key(),
                    value: text.to_string(),
                }),
            other => Err(ColumnMetadataError::UnsupportedDataTypeForBounds {
                column: column.to_string(),
                data_type: other,
            }),
        }
    }

    /// Stored data type this value belongs to
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Int(_) => DataType::Int,
            Self::Long(_) => DataType::Long,
            Self::Float(_) => DataType::Float,
            Self::Double(_) => DataType::Double,
            Self::String(_) => DataType::String,
            Self::Bytes(_) => DataType::Bytes,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

/// Floating point values are equal when their bits are, so NaN equals NaN
impl PartialEq for ColumnValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan()),
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan()),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialOrd for ColumnValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.partial_cmp(b),
            (Self::Long(a), Self::Long(b)) => a.partial_cmp(b),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Double(a), Self::Double(b)) => a.partial_cmp(b),
            (Self::String(a), Self::String(b)) => a.partial_cmp(b),
            // Unsigned lexicographic, same as the on-disk dictionary order
            (Self::Bytes(a), Self::Bytes(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Long(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Double(v) => write!(f, "{}", v),
            Self::String(s) => f.write_str(s),
            Self::Bytes(b) => f.write_str(&hex::encode(b)),
        }
    }
}
