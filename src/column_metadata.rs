//! Column Metadata - immutable per-column description of a segment
//!
//! [`ColumnMetadata::from_config`] reads every recognized key for one
//! column, parses typed values (bounds, partitions, padding) and drives a
//! [`ColumnMetadataBuilder`]. The built metadata never changes afterwards
//! and can be shared freely between readers.
//!
//! ## Decode Order
//!
//! ```text
//! 1. scalar attributes + optional defaults
//! 2. padding character       (segment-scoped, unescaped)
//! 3. date-time format/granularity
//! 4. min/max bounds          (parsed by stored data type)
//! 5. partition function, count and partition ids
//! 6. build()                 (text index type, FieldSpec)
//! ```

use crate::config::{column_key, keys, MetadataConfig};
use crate::escape::unescape;
use crate::field_spec::{FieldSpec, TimeGranularitySpec};
use crate::partition::{extract_partitions, partition_function, same_partition_function, PartitionFunction};
use crate::types::{
    DataType, FieldType, TextIndexType, TimeUnit, LEGACY_STRING_PAD_CHAR, UNKNOWN_CARDINALITY,
};
use crate::value::ColumnValue;
use crate::{ColumnMetadataError, Result};
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Immutable metadata of a single column within a segment
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMetadata {
    column_name: String,
    cardinality: i32,
    total_docs: i32,
    data_type: DataType,
    bits_per_element: i32,
    column_max_length: i32,
    field_type: FieldType,
    is_sorted: bool,
    has_nulls: bool,
    has_dictionary: bool,
    has_inverted_index: bool,
    has_fst_index: bool,
    is_single_value: bool,
    is_auto_generated: bool,
    is_virtual: bool,
    max_number_of_multi_values: i32,
    total_number_of_entries: i32,
    default_null_value_string: Option<String>,
    time_unit: TimeUnit,
    padding_character: char,
    min_value: Option<ColumnValue>,
    max_value: Option<ColumnValue>,
    #[serde(serialize_with = "serialize_partition_function")]
    partition_function: Option<Arc<dyn PartitionFunction>>,
    num_partitions: i32,
    partitions: BTreeSet<i32>,
    date_time_format: Option<String>,
    date_time_granularity: Option<String>,
    text_index_type: TextIndexType,
    field_spec: FieldSpec,
}

fn serialize_partition_function<S: Serializer>(
    function: &Option<Arc<dyn PartitionFunction>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match function {
        Some(f) => serializer.serialize_some(f.name()),
        None => serializer.serialize_none(),
    }
}

impl ColumnMetadata {
    /// Decode the metadata of `column` from a segment configuration
    pub fn from_config<C: MetadataConfig + ?Sized>(column: &str, config: &C) -> Result<Self> {
        let key = |property: &str| column_key(column, property);

        // 1. Scalar attributes
        let data_type: DataType = required_string(config, &key(keys::DATA_TYPE))?.parse()?;
        let field_type: FieldType = required_string(config, &key(keys::COLUMN_TYPE))?.parse()?;
        let time_unit: TimeUnit = config.get_string_or(keys::TIME_UNIT, TimeUnit::default().name()).parse()?;

        let mut builder = ColumnMetadataBuilder::new()
            .column_name(column)
            .cardinality(config.get_int(&key(keys::CARDINALITY))?)
            .total_docs(config.get_int(&key(keys::TOTAL_DOCS))?)
            .data_type(data_type)
            .bits_per_element(config.get_int(&key(keys::BITS_PER_ELEMENT))?)
            .column_max_length(config.get_int(&key(keys::DICTIONARY_ELEMENT_SIZE))?)
            .field_type(field_type)
            .sorted(config.get_bool(&key(keys::IS_SORTED))?)
            .has_nulls(config.get_bool(&key(keys::HAS_NULL_VALUE))?)
            .has_dictionary(config.get_bool_or(&key(keys::HAS_DICTIONARY), true)?)
            .has_inverted_index(config.get_bool(&key(keys::HAS_INVERTED_INDEX))?)
            .has_fst_index(config.get_bool_or(&key(keys::HAS_FST_INDEX), false)?)
            .single_value(config.get_bool(&key(keys::IS_SINGLE_VALUED))?)
            .max_number_of_multi_values(config.get_int(&key(keys::MAX_MULTI_VALUE_ELEMENTS))?)
            .total_number_of_entries(config.get_int(&key(keys::TOTAL_NUMBER_OF_ENTRIES))?)
            .auto_generated(config.get_bool_or(&key(keys::IS_AUTO_GENERATED), false)?)
            .default_null_value_string(config.get_string(&key(keys::DEFAULT_NULL_VALUE)))
            .time_unit(time_unit)
            .text_index_type(config.get_string_or(&key(keys::TEXT_INDEX_TYPE), TextIndexType::None.name()));

        // 2. Padding character
        builder = builder.padding_character(padding_character(config)?);

        // 3. Date-time attributes
        if let Some(format) = config.get_string(&key(keys::DATETIME_FORMAT)) {
            builder = builder.date_time_format(format);
        }
        if let Some(granularity) = config.get_string(&key(keys::DATETIME_GRANULARITY)) {
            builder = builder.date_time_granularity(granularity);
        }

        // 4. Bounds, raw so that values like "$${" are not substituted
        let min_key = key(keys::MIN_VALUE);
        let max_key = key(keys::MAX_VALUE);
        match (config.get_property(&min_key), config.get_property(&max_key)) {
            (Some(min), Some(max)) => {
                let stored = data_type.stored_type();
                builder = builder
                    .min_value(ColumnValue::parse(stored, column, keys::MIN_VALUE, min)?)
                    .max_value(ColumnValue::parse(stored, column, keys::MAX_VALUE, max)?);
            }
            (Some(_), None) => {
                return Err(ColumnMetadataError::MismatchedBounds {
                    column: column.to_string(),
                    present: keys::MIN_VALUE,
                    missing: keys::MAX_VALUE,
                })
            }
            (None, Some(_)) => {
                return Err(ColumnMetadataError::MismatchedBounds {
                    column: column.to_string(),
                    present: keys::MAX_VALUE,
                    missing: keys::MIN_VALUE,
                })
            }
            (None, None) => {}
        }

        // 5. Partitioning
        if let Some(name) = config.get_string(&key(keys::PARTITION_FUNCTION)) {
            let num_partitions = config.get_int(&key(keys::NUM_PARTITIONS))?;
            let function = partition_function(&name, num_partitions)?;
            let partitions = extract_partitions(&config.get_list(&key(keys::PARTITION_VALUES)))?;
            builder = builder
                .partition_function(function)
                .num_partitions(num_partitions)
                .partitions(partitions);
        }

        // 6. Build
        let metadata = builder.build()?;
        log::debug!(
            "Decoded column {} ({} {}, cardinality {})",
            metadata.column_name,
            metadata.field_type,
            metadata.data_type,
            metadata.cardinality
        );
        Ok(metadata)
    }

    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    /// Distinct value count
    ///
    /// No-dictionary columns of a realtime segment report
    /// [`UNKNOWN_CARDINALITY`].
    pub fn cardinality(&self) -> i32 {
        self.cardinality
    }

    pub fn has_unknown_cardinality(&self) -> bool {
        self.cardinality == UNKNOWN_CARDINALITY
    }

    pub fn total_docs(&self) -> i32 {
        self.total_docs
    }

    /// Stored data type
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn bits_per_element(&self) -> i32 {
        self.bits_per_element
    }

    pub fn column_max_length(&self) -> i32 {
        self.column_max_length
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn is_sorted(&self) -> bool {
        self.is_sorted
    }

    pub fn has_nulls(&self) -> bool {
        self.has_nulls
    }

    pub fn has_dictionary(&self) -> bool {
        self.has_dictionary
    }

    pub fn has_inverted_index(&self) -> bool {
        self.has_inverted_index
    }

    pub fn has_fst_index(&self) -> bool {
        self.has_fst_index
    }

    pub fn is_single_value(&self) -> bool {
        self.is_single_value
    }

    pub fn is_auto_generated(&self) -> bool {
        self.is_auto_generated
    }

    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    pub fn max_number_of_multi_values(&self) -> i32 {
        self.max_number_of_multi_values
    }

    pub fn total_number_of_entries(&self) -> i32 {
        self.total_number_of_entries
    }

    pub fn default_null_value_string(&self) -> Option<&str> {
        self.default_null_value_string.as_deref()
    }

    pub fn time_unit(&self) -> TimeUnit {
        self.time_unit
    }

    pub fn padding_character(&self) -> char {
        self.padding_character
    }

    pub fn min_value(&self) -> Option<&ColumnValue> {
        self.min_value.as_ref()
    }

    pub fn max_value(&self) -> Option<&ColumnValue> {
        self.max_value.as_ref()
    }

    pub fn partition_function(&self) -> Option<&Arc<dyn PartitionFunction>> {
        self.partition_function.as_ref()
    }

    pub fn num_partitions(&self) -> i32 {
        self.num_partitions
    }

    pub fn partitions(&self) -> &BTreeSet<i32> {
        &self.partitions
    }

    pub fn date_time_format(&self) -> Option<&str> {
        self.date_time_format.as_deref()
    }

    pub fn date_time_granularity(&self) -> Option<&str> {
        self.date_time_granularity.as_deref()
    }

    pub fn text_index_type(&self) -> TextIndexType {
        self.text_index_type
    }

    pub fn field_spec(&self) -> &FieldSpec {
        &self.field_spec
    }

    /// JSON view, partition function rendered by name
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn required_string<C: MetadataConfig + ?Sized>(config: &C, key: &str) -> Result<String> {
    config.get_string(key).ok_or_else(|| ColumnMetadataError::missing(key))
}

fn padding_character<C: MetadataConfig + ?Sized>(config: &C) -> Result<char> {
    if !config.contains_key(keys::PADDING_CHARACTER) {
        return Ok(LEGACY_STRING_PAD_CHAR);
    }
    let raw = config.get_string(keys::PADDING_CHARACTER).unwrap_or_default();
    unescape(&raw)?
        .chars()
        .next()
        .ok_or(ColumnMetadataError::InvalidPaddingCharacter { raw })
}

impl PartialEq for ColumnMetadata {
    fn eq(&self, other: &Self) -> bool {
        let same_partitioning = match (&self.partition_function, &other.partition_function) {
            (Some(a), Some(b)) => same_partition_function(a.as_ref(), b.as_ref()),
            (None, None) => true,
            _ => false,
        };

        same_partitioning
            && self.column_name == other.column_name
            && self.cardinality == other.cardinality
            && self.total_docs == other.total_docs
            && self.data_type == other.data_type
            && self.bits_per_element == other.bits_per_element
            && self.column_max_length == other.column_max_length
            && self.field_type == other.field_type
            && self.is_sorted == other.is_sorted
            && self.has_nulls == other.has_nulls
            && self.has_dictionary == other.has_dictionary
            && self.has_inverted_index == other.has_inverted_index
            && self.has_fst_index == other.has_fst_index
            && self.is_single_value == other.is_single_value
            && self.is_auto_generated == other.is_auto_generated
            && self.is_virtual == other.is_virtual
            && self.max_number_of_multi_values == other.max_number_of_multi_values
            && self.total_number_of_entries == other.total_number_of_entries
            && self.default_null_value_string == other.default_null_value_string
            && self.time_unit == other.time_unit
            && self.padding_character == other.padding_character
            && self.min_value == other.min_value
            && self.max_value == other.max_value
            && self.num_partitions == other.num_partitions
            && self.partitions == other.partitions
            && self.date_time_format == other.date_time_format
            && self.date_time_granularity == other.date_time_granularity
            && self.text_index_type == other.text_index_type
            && self.field_spec == other.field_spec
    }
}

fn write_optional<T: fmt::Display>(f: &mut fmt::Formatter<'_>, name: &str, value: Option<T>) -> fmt::Result {
    match value {
        Some(v) => writeln!(f, "  {}: {}", name, v),
        None => writeln!(f, "  {}: null", name),
    }
}

impl ColumnMetadata {
    /// Bounds of the wrong type render as `[ERROR]` instead of failing
    fn write_bound(&self, f: &mut fmt::Formatter<'_>, name: &str, bound: Option<&ColumnValue>) -> fmt::Result {
        match bound {
            Some(v) if v.data_type() != self.data_type => {
                log::error!(
                    "Column {} has {} of type {} but stores {}",
                    self.column_name,
                    name,
                    v.data_type(),
                    self.data_type
                );
                writeln!(f, "  {}: [ERROR]", name)
            }
            other => write_optional(f, name, other),
        }
    }
}

impl fmt::Display for ColumnMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ColumnMetadata {{")?;
        writeln!(f, "  columnName: {}", self.column_name)?;
        writeln!(f, "  cardinality: {}", self.cardinality)?;
        writeln!(f, "  totalDocs: {}", self.total_docs)?;
        writeln!(f, "  dataType: {}", self.data_type)?;
        writeln!(f, "  bitsPerElement: {}", self.bits_per_element)?;
        writeln!(f, "  columnMaxLength: {}", self.column_max_length)?;
        writeln!(f, "  fieldType: {}", self.field_type)?;
        writeln!(f, "  isSorted: {}", self.is_sorted)?;
        writeln!(f, "  hasNulls: {}", self.has_nulls)?;
        writeln!(f, "  hasDictionary: {}", self.has_dictionary)?;
        writeln!(f, "  hasInvertedIndex: {}", self.has_inverted_index)?;
        writeln!(f, "  hasFSTIndex: {}", self.has_fst_index)?;
        writeln!(f, "  isSingleValue: {}", self.is_single_value)?;
        writeln!(f, "  isAutoGenerated: {}", self.is_auto_generated)?;
        writeln!(f, "  isVirtual: {}", self.is_virtual)?;
        writeln!(f, "  maxNumberOfMultiValues: {}", self.max_number_of_multi_values)?;
        writeln!(f, "  totalNumberOfEntries: {}", self.total_number_of_entries)?;
        write_optional(f, "defaultNullValueString", self.default_null_value_string.as_deref())?;
        writeln!(f, "  timeUnit: {}", self.time_unit)?;
        writeln!(f, "  paddingCharacter: {:?}", self.padding_character)?;
        self.write_bound(f, "minValue", self.min_value.as_ref())?;
        self.write_bound(f, "maxValue", self.max_value.as_ref())?;
        write_optional(f, "partitionFunction", self.partition_function.as_ref().map(|p| p.name()))?;
        writeln!(f, "  numPartitions: {}", self.num_partitions)?;
        writeln!(f, "  partitions: {:?}", self.partitions)?;
        write_optional(f, "dateTimeFormat", self.date_time_format.as_deref())?;
        write_optional(f, "dateTimeGranularity", self.date_time_granularity.as_deref())?;
        writeln!(f, "  textIndexType: {}", self.text_index_type)?;
        writeln!(f, "  fieldSpec: {:?}", self.field_spec)?;
        write!(f, "}}")
    }
}

/// Single-use staging area for [`ColumnMetadata`]
///
/// Setters store values as given; checking them is the decoder's job.
#[derive(Debug, Clone)]
pub struct ColumnMetadataBuilder {
    column_name: String,
    cardinality: i32,
    total_docs: i32,
    data_type: Option<DataType>,
    bits_per_element: i32,
    column_max_length: i32,
    field_type: Option<FieldType>,
    is_sorted: bool,
    has_nulls: bool,
    has_dictionary: bool,
    has_inverted_index: bool,
    has_fst_index: bool,
    is_single_value: bool,
    is_auto_generated: bool,
    is_virtual: bool,
    max_number_of_multi_values: i32,
    total_number_of_entries: i32,
    default_null_value_string: Option<String>,
    time_unit: TimeUnit,
    padding_character: char,
    min_value: Option<ColumnValue>,
    max_value: Option<ColumnValue>,
    partition_function: Option<Arc<dyn PartitionFunction>>,
    num_partitions: i32,
    partitions: BTreeSet<i32>,
    date_time_format: Option<String>,
    date_time_granularity: Option<String>,
    text_index_type: String,
}

impl Default for ColumnMetadataBuilder {
    fn default() -> Self {
        Self {
            column_name: String::new(),
            cardinality: 0,
            total_docs: 0,
            data_type: None,
            bits_per_element: 0,
            column_max_length: 0,
            field_type: None,
            is_sorted: false,
            has_nulls: false,
            has_dictionary: false,
            has_inverted_index: false,
            has_fst_index: false,
            is_single_value: false,
            is_auto_generated: false,
            is_virtual: false,
            max_number_of_multi_values: 0,
            total_number_of_entries: 0,
            default_null_value_string: None,
            time_unit: TimeUnit::default(),
            padding_character: LEGACY_STRING_PAD_CHAR,
            min_value: None,
            max_value: None,
            partition_function: None,
            num_partitions: 0,
            partitions: BTreeSet::new(),
            date_time_format: None,
            date_time_granularity: None,
            text_index_type: TextIndexType::None.name().to_string(),
        }
    }
}

impl ColumnMetadataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column_name(mut self, column_name: impl Into<String>) -> Self {
        self.column_name = column_name.into();
        self
    }

    pub fn cardinality(mut self, cardinality: i32) -> Self {
        self.cardinality = cardinality;
        self
    }

    pub fn total_docs(mut self, total_docs: i32) -> Self {
        self.total_docs = total_docs;
        self
    }

    /// Stores the physical type of `data_type`
    pub fn data_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type.stored_type());
        self
    }

    pub fn bits_per_element(mut self, bits_per_element: i32) -> Self {
        self.bits_per_element = bits_per_element;
        self
    }

    pub fn column_max_length(mut self, column_max_length: i32) -> Self {
        self.column_max_length = column_max_length;
        self
    }

    pub fn field_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    pub fn sorted(mut self, is_sorted: bool) -> Self {
        self.is_sorted = is_sorted;
        self
    }

    pub fn has_nulls(mut self, has_nulls: bool) -> Self {
        self.has_nulls = has_nulls;
        self
    }

    pub fn has_dictionary(mut self, has_dictionary: bool) -> Self {
        self.has_dictionary = has_dictionary;
        self
    }

    pub fn has_inverted_index(mut self, has_inverted_index: bool) -> Self {
        self.has_inverted_index = has_inverted_index;
        self
    }

    pub fn has_fst_index(mut self, has_fst_index: bool) -> Self {
        self.has_fst_index = has_fst_index;
        self
    }

    pub fn single_value(mut self, is_single_value: bool) -> Self {
        self.is_single_value = is_single_value;
        self
    }

    pub fn auto_generated(mut self, is_auto_generated: bool) -> Self {
        self.is_auto_generated = is_auto_generated;
        self
    }

    pub fn virtual_column(mut self, is_virtual: bool) -> Self {
        self.is_virtual = is_virtual;
        self
    }

    pub fn max_number_of_multi_values(mut self, max_number_of_multi_values: i32) -> Self {
        self.max_number_of_multi_values = max_number_of_multi_values;
        self
    }

    pub fn total_number_of_entries(mut self, total_number_of_entries: i32) -> Self {
        self.total_number_of_entries = total_number_of_entries;
        self
    }

    pub fn default_null_value_string(mut self, default_null_value_string: Option<String>) -> Self {
        self.default_null_value_string = default_null_value_string;
        self
    }

    pub fn time_unit(mut self, time_unit: TimeUnit) -> Self {
        self.time_unit = time_unit;
        self
    }

    pub fn padding_character(mut self, padding_character: char) -> Self {
        self.padding_character = padding_character;
        self
    }

    pub fn min_value(mut self, min_value: ColumnValue) -> Self {
        self.min_value = Some(min_value);
        self
    }

    pub fn max_value(mut self, max_value: ColumnValue) -> Self {
        self.max_value = Some(max_value);
        self
    }

    pub fn partition_function(mut self, partition_function: Arc<dyn PartitionFunction>) -> Self {
        self.partition_function = Some(partition_function);
        self
    }

    pub fn num_partitions(mut self, num_partitions: i32) -> Self {
        self.num_partitions = num_partitions;
        self
    }

    pub fn partitions(mut self, partitions: BTreeSet<i32>) -> Self {
        self.partitions = partitions;
        self
    }

    pub fn date_time_format(mut self, date_time_format: impl Into<String>) -> Self {
        self.date_time_format = Some(date_time_format.into());
        self
    }

    pub fn date_time_granularity(mut self, date_time_granularity: impl Into<String>) -> Self {
        self.date_time_granularity = Some(date_time_granularity.into());
        self
    }

    /// Text index type by name, resolved in [`build`](Self::build)
    pub fn text_index_type(mut self, text_index_type: impl Into<String>) -> Self {
        self.text_index_type = text_index_type.into();
        self
    }

    /// Resolve the text index type and derive the field spec
    pub fn build(self) -> Result<ColumnMetadata> {
        let text_index_type: TextIndexType = self.text_index_type.parse()?;
        let data_type = self
            .data_type
            .ok_or_else(|| ColumnMetadataError::missing(column_key(&self.column_name, keys::DATA_TYPE)))?;

        let field_spec = match self.field_type {
            Some(FieldType::Dimension) => FieldSpec::dimension(&self.column_name, data_type, self.is_single_value),
            Some(FieldType::Metric) => FieldSpec::metric(&self.column_name, data_type),
            Some(FieldType::Time) => FieldSpec::time(TimeGranularitySpec::new(
                data_type,
                self.time_unit,
                &self.column_name,
            )),
            Some(FieldType::DateTime) => FieldSpec::date_time(
                &self.column_name,
                data_type,
                self.date_time_format.clone(),
                self.date_time_granularity.clone(),
            ),
            None => {
                return Err(ColumnMetadataError::UnsupportedFieldType {
                    field_type: "null".to_string(),
                })
            }
        };
        let field_type = field_spec.field_type();

        Ok(ColumnMetadata {
            column_name: self.column_name,
            cardinality: self.cardinality,
            total_docs: self.total_docs,
            data_type,
            bits_per_element: self.bits_per_element,
            column_max_length: self.column_max_length,
            field_type,
            is_sorted: self.is_sorted,
            has_nulls: self.has_nulls,
            has_dictionary: self.has_dictionary,
            has_inverted_index: self.has_inverted_index,
            has_fst_index: self.has_fst_index,
            is_single_value: self.is_single_value,
            is_auto_generated: self.is_auto_generated,
            is_virtual: self.is_virtual,
            max_number_of_multi_values: self.max_number_of_multi_values,
            total_number_of_entries: self.total_number_of_entries,
            default_null_value_string: self.default_null_value_string,
            time_unit: self.time_unit,
            padding_character: self.padding_character,
            min_value: self.min_value,
            max_value: self.max_value,
            partition_function: self.partition_function,
            num_partitions: self.num_partitions,
            partitions: self.partitions,
            date_time_format: self.date_time_format,
            date_time_granularity: self.date_time_granularity,
            text_index_type,
            field_spec,
        })
    }
}
