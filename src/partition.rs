//! Partition functions - value → partition id
//!
//! A segment records which partitions of a column it holds so that brokers
//! can prune segments at query time. The function is stored by name in
//! `metadata.properties` and resolved through [`partition_function`].
//!
//! | Name        | Partition id                                   |
//! |-------------|------------------------------------------------|
//! | `Modulo`    | integer value mod N (non-negative)             |
//! | `Murmur`    | murmur2(UTF-8 bytes) & 0x7fffffff mod N        |
//! | `ByteArray` | abs(array hash of UTF-8 bytes) mod N           |
//! | `HashCode`  | abs(string hash) mod N                         |

use crate::{ColumnMetadataError, Result};
use std::collections::BTreeSet;
use std::fmt::Debug;
use std::sync::Arc;

/// Deterministic mapping from a column value to a partition id
pub trait PartitionFunction: Debug + Send + Sync {
    /// Registry name, e.g. `"Murmur"`
    fn name(&self) -> &'static str;

    /// Partition id in `0..num_partitions()` for the textual value
    fn partition_id(&self, value: &str) -> Result<i32>;

    fn num_partitions(&self) -> i32;
}

/// Content equality for partition functions: same strategy, same count
pub fn same_partition_function(a: &dyn PartitionFunction, b: &dyn PartitionFunction) -> bool {
    a.name() == b.name() && a.num_partitions() == b.num_partitions()
}

/// Resolve a partition function by (case-insensitive) name
pub fn partition_function(name: &str, num_partitions: i32) -> Result<Arc<dyn PartitionFunction>> {
    if num_partitions <= 0 {
        return Err(ColumnMetadataError::InvalidNumPartitions { num_partitions });
    }

    let function: Arc<dyn PartitionFunction> = match name.trim().to_lowercase().as_str() {
        "modulo" => Arc::new(ModuloPartitionFunction { num_partitions }),
        "murmur" => Arc::new(MurmurPartitionFunction { num_partitions }),
        "bytearray" => Arc::new(ByteArrayPartitionFunction { num_partitions }),
        "hashcode" => Arc::new(HashCodePartitionFunction { num_partitions }),
        _ => {
            return Err(ColumnMetadataError::UnknownPartitionFunction {
                name: name.to_string(),
            })
        }
    };

    log::debug!("Resolved partition function {} with {} partitions", function.name(), num_partitions);
    Ok(function)
}

/// Parse persisted partition values into a set of ids
///
/// Each entry is either a single id (`"3"`) or a legacy inclusive range
/// (`"[0 5]"`). A range must not be inverted and must end below `i32::MAX`.
pub fn extract_partitions<S: AsRef<str>>(values: &[S]) -> Result<BTreeSet<i32>> {
    let mut partitions = BTreeSet::new();

    for value in values {
        let value = value.as_ref().trim();
        if value.is_empty() {
            continue;
        }

        if let Some(range) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
            let bounds: Vec<&str> = range.split_whitespace().collect();
            let [start, end] = bounds.as_slice() else {
                return Err(ColumnMetadataError::MalformedPartitionValue {
                    value: value.to_string(),
                });
            };
            let start = parse_partition_id(start, value)?;
            let end = parse_partition_id(end, value)?;
            if end < start || end == i32::MAX {
                return Err(ColumnMetadataError::MalformedPartitionValue {
                    value: value.to_string(),
                });
            }
            partitions.extend(start..=end);
        } else {
            partitions.insert(parse_partition_id(value, value)?);
        }
    }

    Ok(partitions)
}

fn parse_partition_id(text: &str, value: &str) -> Result<i32> {
    text.parse().map_err(|_| ColumnMetadataError::MalformedPartitionValue {
        value: value.to_string(),
    })
}

/// Integer value modulo the partition count
#[derive(Debug, Clone)]
pub struct ModuloPartitionFunction {
    num_partitions: i32,
}

impl PartitionFunction for ModuloPartitionFunction {
    fn name(&self) -> &'static str {
        "Modulo"
    }

    fn partition_id(&self, value: &str) -> Result<i32> {
        let v: i64 = value
            .trim()
            .parse()
            .map_err(|_| ColumnMetadataError::malformed_number("partition value", value))?;
        Ok(v.rem_euclid(self.num_partitions as i64) as i32)
    }

    fn num_partitions(&self) -> i32 {
        self.num_partitions
    }
}

/// Kafka-compatible murmur2 partitioning
#[derive(Debug, Clone)]
pub struct MurmurPartitionFunction {
    num_partitions: i32,
}

impl PartitionFunction for MurmurPartitionFunction {
    fn name(&self) -> &'static str {
        "Murmur"
    }

    fn partition_id(&self, value: &str) -> Result<i32> {
        Ok((murmur2(value.as_bytes()) & 0x7fff_ffff) % self.num_partitions)
    }

    fn num_partitions(&self) -> i32 {
        self.num_partitions
    }
}

/// Array hash over the UTF-8 bytes of the value
#[derive(Debug, Clone)]
pub struct ByteArrayPartitionFunction {
    num_partitions: i32,
}

impl PartitionFunction for ByteArrayPartitionFunction {
    fn name(&self) -> &'static str {
        "ByteArray"
    }

    fn partition_id(&self, value: &str) -> Result<i32> {
        let hash = value
            .as_bytes()
            .iter()
            .fold(1i32, |h, &b| h.wrapping_mul(31).wrapping_add(b as i8 as i32));
        Ok((hash.unsigned_abs() % self.num_partitions as u32) as i32)
    }

    fn num_partitions(&self) -> i32 {
        self.num_partitions
    }
}

/// String hash over UTF-16 code units of the value
#[derive(Debug, Clone)]
pub struct HashCodePartitionFunction {
    num_partitions: i32,
}

impl PartitionFunction for HashCodePartitionFunction {
    fn name(&self) -> &'static str {
        "HashCode"
    }

    fn partition_id(&self, value: &str) -> Result<i32> {
        let hash = value
            .encode_utf16()
            .fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(c as i32));
        Ok((hash.unsigned_abs() % self.num_partitions as u32) as i32)
    }

    fn num_partitions(&self) -> i32 {
        self.num_partitions
    }
}

/// murmur2 with the Kafka seed
pub fn murmur2(data: &[u8]) -> i32 {
    const SEED: u32 = 0x9747_b28c;
    const M: u32 = 0x5bd1_e995;
    const R: u32 = 24;

    let length = data.len();
    let mut h = SEED ^ (length as u32);

    let mut chunks = data.chunks_exact(4);
    for chunk in &mut chunks {
        let mut k = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);
        h = h.wrapping_mul(M);
        h ^= k;
    }

    let tail = chunks.remainder();
    if tail.len() >= 3 {
        h ^= (tail[2] as u32) << 16;
    }
    if tail.len() >= 2 {
        h ^= (tail[1] as u32) << 8;
    }
    if !tail.is_empty() {
        h ^= tail[0] as u32;
        h = h.wrapping_mul(M);
    }

    h ^= h >> 13;
    h = h.wrapping_mul(M);
    h ^= h >> 15;

    h as i32
}
