// SPDX-License-Identifier: MIT OR Apache-2.0

//! Requested start offsets per partition
//!
//! Encoded in stream metadata as a JSON object mapping partition index to offset,
//! e.g. `{"0":23,"1":15,"2":88}`.
//!
//! Keys are decoded as signed 64-bit integers; indices outside the topic's partition
//! range, such as `"-1"`, are reported as unexpected partitions.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StartPositionMap {
    offsets: BTreeMap<i64, u64>,
}

/// Partitions a start-position map fails to cover exactly
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CoverageGaps {
    pub missing: Vec<u32>,
    pub unexpected: Vec<i64>,
}

impl CoverageGaps {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty()
    }
}

impl StartPositionMap {
    /// Decode from JSON; keys must be integer strings and offsets non-negative integers
    pub fn decode(json: &str) -> Result<Self, serde_json::Error> {
        let offsets: BTreeMap<i64, u64> = serde_json::from_str(json)?;
        Ok(Self { offsets })
    }

    pub fn offset(&self, partition: u32) -> Option<u64> {
        self.offsets.get(&i64::from(partition)).copied()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Compare the key domain against `{0, .., partition_count - 1}`
    pub fn coverage(&self, partition_count: u32) -> CoverageGaps {
        let missing = (0..partition_count)
            .filter(|p| !self.offsets.contains_key(&i64::from(*p)))
            .collect();
        let unexpected = self
            .offsets
            .keys()
            .copied()
            .filter(|p| *p < 0 || *p >= i64::from(partition_count))
            .collect();
        CoverageGaps {
            missing,
            unexpected,
        }
    }
}

impl FromIterator<(i64, u64)> for StartPositionMap {
    fn from_iter<I: IntoIterator<Item = (i64, u64)>>(iter: I) -> Self {
        Self {
            offsets: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode() {
        let map = StartPositionMap::decode(r#"{"0":23,"1":15,"2":88}"#).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.offset(2), Some(88));
        assert_eq!(map.offset(3), None);
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert!(StartPositionMap::decode("not json").is_err());
        assert!(StartPositionMap::decode(r#"{"zero":1}"#).is_err());
        assert!(StartPositionMap::decode(r#"{"99999999999999999999":1}"#).is_err());
        assert!(StartPositionMap::decode(r#"{"0":-1}"#).is_err());
        assert!(StartPositionMap::decode(r#"[1,2]"#).is_err());
    }

    #[test]
    fn test_complete_coverage() {
        let map = StartPositionMap::decode(r#"{"0":1,"1":2,"2":9}"#).unwrap();
        assert!(map.coverage(3).is_empty());
    }

    #[test]
    fn test_missing_partition() {
        let map = StartPositionMap::decode(r#"{"0":1,"1":2}"#).unwrap();
        let gaps = map.coverage(3);
        assert_eq!(gaps.missing, vec![2]);
        assert!(gaps.unexpected.is_empty());
    }

    #[test]
    fn test_extra_partition() {
        let map: StartPositionMap = [(0, 1), (1, 1), (5, 1)].into_iter().collect();
        let gaps = map.coverage(2);
        assert!(gaps.missing.is_empty());
        assert_eq!(gaps.unexpected, vec![5]);
    }

    #[test]
    fn test_out_of_range_keys_are_unexpected() {
        let map = StartPositionMap::decode(r#"{"0":1,"-1":5,"4294967296":7}"#).unwrap();
        let gaps = map.coverage(2);
        assert_eq!(gaps.missing, vec![1]);
        assert_eq!(gaps.unexpected, vec![-1, 4294967296]);
        assert_eq!(map.offset(0), Some(1));
    }

    #[test]
    fn test_empty_map_against_zero_partitions() {
        let map = StartPositionMap::decode("{}").unwrap();
        assert!(map.is_empty());
        assert!(map.coverage(0).is_empty());
    }
}
