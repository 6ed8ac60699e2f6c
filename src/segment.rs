//! Segment-wide column index
//!
//! A segment lists its columns by role in segment-scoped keys. Decoding the
//! whole segment walks those lists in order (dimensions, metrics, time,
//! date-time) and decodes each column.

use crate::column_metadata::ColumnMetadata;
use crate::config::{keys, MetadataConfig, SegmentProperties};
use crate::Result;
use std::collections::HashMap;
use std::path::Path;

/// Metadata of every column in a segment, in declaration order
#[derive(Debug, Clone, Default)]
pub struct SegmentColumns {
    columns: Vec<ColumnMetadata>,
    index: HashMap<String, usize>,
}

impl SegmentColumns {
    /// Decode every column listed in the segment-scoped column keys
    pub fn from_config<C: MetadataConfig + ?Sized>(config: &C) -> Result<Self> {
        let mut segment = Self::default();

        for list_key in [
            keys::DIMENSION_COLUMNS,
            keys::METRIC_COLUMNS,
            keys::TIME_COLUMN,
            keys::DATETIME_COLUMNS,
        ] {
            for name in config.get_list(list_key) {
                if name.is_empty() || segment.index.contains_key(&name) {
                    continue;
                }
                let metadata = ColumnMetadata::from_config(&name, config)?;
                segment.index.insert(name, segment.columns.len());
                segment.columns.push(metadata);
            }
        }

        log::debug!("Decoded {} columns", segment.columns.len());
        Ok(segment)
    }

    /// Load `metadata.properties` and decode all of its columns
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_config(&SegmentProperties::load(path)?)
    }

    pub fn get(&self, name: &str) -> Option<&ColumnMetadata> {
        self.index.get(name).map(|&i| &self.columns[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnMetadata> {
        self.columns.iter()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.column_name()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<'a> IntoIterator for &'a SegmentColumns {
    type Item = &'a ColumnMetadata;
    type IntoIter = std::slice::Iter<'a, ColumnMetadata>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldType;
    use crate::ColumnMetadataError;

    const SEGMENT: &str = "\
segment.dimension.column.names = country, member
segment.metric.column.names = clicks
segment.time.column.name = day
segment.time.unit = DAYS

country.cardinality = 3
country.totalDocs = 100
country.dataType = STRING
country.bitsPerElement = 2
country.dictionaryElementSize = 2
country.columnType = DIMENSION
country.isSorted = true
country.hasNullValue = false
country.hasInvertedIndex = true
country.isSingleValued = true
country.maxMultiValueElements = 0
country.totalNumberOfEntries = 100
country.minValue = de
country.maxValue = us

member.cardinality = 40
member.totalDocs = 100
member.dataType = INT
member.bitsPerElement = 6
member.dictionaryElementSize = 4
member.columnType = DIMENSION
member.isSorted = false
member.hasNullValue = false
member.hasInvertedIndex = false
member.isSingleValued = false
member.maxMultiValueElements = 3
member.totalNumberOfEntries = 180
member.partitionFunction = Modulo
member.numPartitions = 4
member.partitionValues = [0 1],3

clicks.cardinality = 57
clicks.totalDocs = 100
clicks.dataType = LONG
clicks.bitsPerElement = 6
clicks.dictionaryElementSize = 8
clicks.columnType = METRIC
clicks.isSorted = false
clicks.hasNullValue = false
clicks.hasInvertedIndex = false
clicks.isSingleValued = true
clicks.maxMultiValueElements = 0
clicks.totalNumberOfEntries = 100
clicks.minValue = 0
clicks.maxValue = 9000000000

day.cardinality = 7
day.totalDocs = 100
day.dataType = INT
day.bitsPerElement = 3
day.dictionaryElementSize = 4
day.columnType = TIME
day.isSorted = true
day.hasNullValue = false
day.hasInvertedIndex = false
day.isSingleValued = true
day.maxMultiValueElements = 0
day.totalNumberOfEntries = 100
day.minValue = 18000
day.maxValue = 18006
";

    #[test]
    fn test_decode_segment() {
        let props: SegmentProperties = SEGMENT.parse().unwrap();
        let segment = SegmentColumns::from_config(&props).unwrap();

        assert_eq!(segment.len(), 4);
        assert_eq!(segment.column_names(), vec!["country", "member", "clicks", "day"]);
        assert_eq!(segment.get("day").unwrap().field_type(), FieldType::Time);
        assert!(segment.get("nope").is_none());

        let member = segment.get("member").unwrap();
        assert!(!member.is_single_value());
        assert_eq!(member.partitions().iter().copied().collect::<Vec<_>>(), vec![0, 1, 3]);
        assert_eq!(
            member.partition_function().unwrap().partition_id("6").unwrap(),
            2
        );

        for column in &segment {
            if let (Some(min), Some(max)) = (column.min_value(), column.max_value()) {
                assert!(min <= max, "{} bounds out of order", column.column_name());
            }
        }
    }

    #[test]
    fn test_decode_segment_fails_fast() {
        let mut props: SegmentProperties = SEGMENT.parse().unwrap();
        props.remove("clicks.totalDocs");
        assert!(matches!(
            SegmentColumns::from_config(&props),
            Err(ColumnMetadataError::MissingRequiredProperty { .. })
        ));
    }

    #[test]
    fn test_empty_segment() {
        let segment = SegmentColumns::from_config(&SegmentProperties::new()).unwrap();
        assert!(segment.is_empty());
    }

    #[test]
    fn test_load_segment_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.properties");
        std::fs::write(&path, SEGMENT).unwrap();

        let segment = SegmentColumns::load(&path).unwrap();
        assert_eq!(segment.len(), 4);
        assert_eq!(segment.iter().filter(|c| c.is_sorted()).count(), 2);
    }
}
