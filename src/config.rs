//! Segment configuration - `metadata.properties`
//!
//! Column metadata is decoded from a flat key/value mapping. The
//! [`MetadataConfig`] trait is the read-only view decoding needs;
//! [`SegmentProperties`] is the in-memory store parsed from the text of a
//! `metadata.properties` file.
//!
//! ## File Syntax
//!
//! ```text
//! # comment            ! also a comment
//! segment.time.unit = DAYS
//! country.dataType: STRING
//! country.partitionValues = 0,2      (list)
//! country.defaultNullValue = a\,b    (escaped comma, single value)
//! ts.minValue = ${other.key}         (substituted by get_string only)
//! long.value = first \
//!              second                (continuation)
//! ```

use crate::escape::unescape;
use crate::{ColumnMetadataError, Result};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

/// Property names recognized in `metadata.properties`
pub mod keys {
    // --- Column-scoped (prefixed with "<column>.") ---
    pub const CARDINALITY: &str = "cardinality";
    pub const TOTAL_DOCS: &str = "totalDocs";
    pub const DATA_TYPE: &str = "dataType";
    pub const BITS_PER_ELEMENT: &str = "bitsPerElement";
    pub const DICTIONARY_ELEMENT_SIZE: &str = "dictionaryElementSize";
    pub const COLUMN_TYPE: &str = "columnType";
    pub const IS_SORTED: &str = "isSorted";
    pub const HAS_NULL_VALUE: &str = "hasNullValue";
    pub const HAS_DICTIONARY: &str = "hasDictionary";
    pub const HAS_INVERTED_INDEX: &str = "hasInvertedIndex";
    pub const HAS_FST_INDEX: &str = "hasFSTIndex";
    pub const IS_SINGLE_VALUED: &str = "isSingleValued";
    pub const MAX_MULTI_VALUE_ELEMENTS: &str = "maxMultiValueElements";
    pub const TOTAL_NUMBER_OF_ENTRIES: &str = "totalNumberOfEntries";
    pub const IS_AUTO_GENERATED: &str = "isAutoGenerated";
    pub const DEFAULT_NULL_VALUE: &str = "defaultNullValue";
    pub const MIN_VALUE: &str = "minValue";
    pub const MAX_VALUE: &str = "maxValue";
    pub const PARTITION_FUNCTION: &str = "partitionFunction";
    pub const NUM_PARTITIONS: &str = "numPartitions";
    pub const PARTITION_VALUES: &str = "partitionValues";
    pub const DATETIME_FORMAT: &str = "dateTimeFormat";
    pub const DATETIME_GRANULARITY: &str = "dateTimeGranularity";
    pub const TEXT_INDEX_TYPE: &str = "textIndexType";

    // --- Segment-scoped (bare keys) ---
    pub const TIME_UNIT: &str = "segment.time.unit";
    pub const PADDING_CHARACTER: &str = "segment.padding.character";
    pub const DIMENSION_COLUMNS: &str = "segment.dimension.column.names";
    pub const METRIC_COLUMNS: &str = "segment.metric.column.names";
    pub const TIME_COLUMN: &str = "segment.time.column.name";
    pub const DATETIME_COLUMNS: &str = "segment.datetime.column.names";
}

/// Key of a column-scoped property: `"<column>.<property>"`
pub fn column_key(column: &str, property: &str) -> String {
    format!("{}.{}", column, property)
}

/// Read-only view of a segment's configuration mapping
pub trait MetadataConfig {
    /// Raw value, never interpolated
    fn get_property(&self, key: &str) -> Option<&str>;

    /// Value with `${key}` references substituted
    fn get_string(&self, key: &str) -> Option<String>;

    /// List value; empty when absent
    fn get_list(&self, key: &str) -> Vec<String>;

    fn contains_key(&self, key: &str) -> bool {
        self.get_property(key).is_some()
    }

    fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or_else(|| default.to_string())
    }

    /// Required integer
    fn get_int(&self, key: &str) -> Result<i32> {
        let value = self.get_string(key).ok_or_else(|| ColumnMetadataError::missing(key))?;
        value
            .trim()
            .parse()
            .map_err(|_| ColumnMetadataError::malformed_number(key, &value))
    }

    /// Required boolean
    fn get_bool(&self, key: &str) -> Result<bool> {
        let value = self.get_string(key).ok_or_else(|| ColumnMetadataError::missing(key))?;
        parse_bool(key, &value)
    }

    fn get_bool_or(&self, key: &str, default: bool) -> Result<bool> {
        match self.get_string(key) {
            Some(value) => parse_bool(key, &value),
            None => Ok(default),
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "y" | "t" => Ok(true),
        "false" | "no" | "off" | "n" | "f" => Ok(false),
        _ => Err(ColumnMetadataError::MalformedBoolean {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Plain string maps behave as configurations without interpolation
impl MetadataConfig for HashMap<String, String> {
    fn get_property(&self, key: &str) -> Option<&str> {
        self.get(key).map(|s| s.as_str())
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }

    fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PropertyValue {
    text: String,
    items: Vec<String>,
}

/// Parsed `metadata.properties`, keys kept in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentProperties {
    keys: Vec<String>,
    values: HashMap<String, PropertyValue>,
}

/// Nesting limit for `${key}` substitution
const MAX_INTERPOLATION_DEPTH: usize = 16;

fn variable_regex() -> &'static Regex {
    static VARIABLE: OnceLock<Regex> = OnceLock::new();
    VARIABLE.get_or_init(|| Regex::new(r"\$?\$\{([^}]+)\}").unwrap())
}

impl SegmentProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse a properties file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let props = text.parse::<Self>()?;
        log::debug!("Loaded {} properties from {}", props.len(), path.as_ref().display());
        Ok(props)
    }

    /// Set a single-valued property
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        self.insert(
            key.into(),
            PropertyValue {
                items: vec![value.clone()],
                text: value,
            },
        );
        self
    }

    /// Set a list-valued property
    pub fn set_list<S: Into<String>>(&mut self, key: impl Into<String>, items: impl IntoIterator<Item = S>) -> &mut Self {
        let items: Vec<String> = items.into_iter().map(Into::into).collect();
        self.insert(
            key.into(),
            PropertyValue {
                text: items.join(","),
                items,
            },
        );
        self
    }

    pub fn remove(&mut self, key: &str) -> bool {
        if self.values.remove(key).is_some() {
            self.keys.retain(|k| k != key);
            true
        } else {
            false
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn insert(&mut self, key: String, value: PropertyValue) {
        if !self.values.contains_key(&key) {
            self.keys.push(key.clone());
        }
        self.values.insert(key, value);
    }

    /// A repeated key extends the existing list
    fn append(&mut self, key: String, value: PropertyValue) {
        match self.values.get_mut(&key) {
            Some(existing) => {
                existing.text.push(',');
                existing.text.push_str(&value.text);
                existing.items.extend(value.items);
            }
            None => self.insert(key, value),
        }
    }

    /// Expand `${key}` references in the value stored under `key`
    ///
    /// Each referenced key is expanded once per call. A reference back to a
    /// key that is still being expanded is left as written.
    fn interpolate(&self, key: &str, text: &str) -> String {
        let mut resolving = vec![key.to_string()];
        self.expand(text, &mut resolving, &mut HashMap::new())
    }

    fn expand(&self, text: &str, resolving: &mut Vec<String>, expanded: &mut HashMap<String, String>) -> String {
        if !text.contains("${") {
            return text.to_string();
        }

        variable_regex()
            .replace_all(text, |caps: &Captures| {
                let whole = &caps[0];
                if let Some(escaped) = whole.strip_prefix("$$") {
                    return format!("${}", escaped);
                }
                let name = &caps[1];
                if let Some(done) = expanded.get(name) {
                    return done.clone();
                }
                let Some(value) = self.values.get(name) else {
                    return whole.to_string();
                };
                if resolving.len() >= MAX_INTERPOLATION_DEPTH || resolving.iter().any(|k| k == name) {
                    log::warn!("Reference {} is cyclic or too deep, left unexpanded", whole);
                    return whole.to_string();
                }

                resolving.push(name.to_string());
                let result = self.expand(&value.text, resolving, expanded);
                resolving.pop();
                expanded.insert(name.to_string(), result.clone());
                result
            })
            .into_owned()
    }
}

impl MetadataConfig for SegmentProperties {
    fn get_property(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|v| v.text.as_str())
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|v| self.interpolate(key, &v.text))
    }

    fn get_list(&self, key: &str) -> Vec<String> {
        self.values
            .get(key)
            .map(|v| v.items.iter().map(|item| self.interpolate(key, item)).collect())
            .unwrap_or_default()
    }
}

impl FromStr for SegmentProperties {
    type Err = ColumnMetadataError;

    fn from_str(text: &str) -> Result<Self> {
        let mut props = Self::new();

        for line in logical_lines(text) {
            let (key, raw_value) = split_key_value(&line);
            if key.is_empty() {
                continue;
            }
            let key = unescape(&key)?;

            let items = split_unescaped_commas(raw_value)
                .into_iter()
                .map(|item| unescape(item.trim()))
                .collect::<Result<Vec<_>>>()?;
            let text = unescape(raw_value)?;

            props.append(key, PropertyValue { text, items });
        }

        Ok(props)
    }
}

/// Join continuation lines, drop blanks and comments
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;

    for physical in text.lines() {
        let trimmed = physical.trim_start();
        let mut current = match pending.take() {
            Some(mut acc) => {
                acc.push_str(trimmed);
                acc
            }
            None => {
                if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                    continue;
                }
                trimmed.to_string()
            }
        };

        let trailing = current.chars().rev().take_while(|&c| c == '\\').count();
        if trailing % 2 == 1 {
            current.pop();
            pending = Some(current);
        } else {
            lines.push(current);
        }
    }

    if let Some(rest) = pending {
        lines.push(rest);
    }
    lines
}

/// Key ends at the first unescaped `=`, `:` or whitespace
fn split_key_value(line: &str) -> (String, &str) {
    let mut key = String::new();
    let mut escaped = false;
    let mut value_start = line.len();

    for (idx, c) in line.char_indices() {
        if escaped {
            key.push('\\');
            key.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' => {
                value_start = idx;
                break;
            }
            _ => key.push(c),
        }
    }

    let is_blank = |c: char| c == ' ' || c == '\t';
    let rest = line[value_start..].trim_start_matches(is_blank);
    let rest = rest
        .strip_prefix('=')
        .or_else(|| rest.strip_prefix(':'))
        .unwrap_or(rest);
    (key, rest.trim_start_matches(is_blank).trim_end())
}

fn split_unescaped_commas(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;

    for (idx, c) in value.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            ',' => {
                parts.push(&value[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);
    parts
}
