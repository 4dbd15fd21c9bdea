//! FILENAME: pivot-engine/src/cache.rs
//! Grouping buckets and measure accumulators.
//!
//! Each pivot level partitions its record subset into buckets keyed by the
//! dimension value. Buckets keep first-occurrence order; the hash index is
//! only used to find an existing bucket in O(1).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use records::{FieldValue, SalesRecord};

// ============================================================================
// MEASURE ACCUMULATOR
// ============================================================================

/// Accumulates the measures of one group incrementally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasureAccumulator {
    /// Sum of the primary measure.
    pub value: f64,
    /// Sum of the secondary measure.
    pub qty: f64,
    pub count: usize,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

impl MeasureAccumulator {
    pub fn new() -> Self {
        MeasureAccumulator::default()
    }

    /// Adds one record's measures.
    pub fn add(&mut self, record: &SalesRecord) {
        self.count += 1;
        self.value += record.value;
        self.qty += record.qty;
        self.min_value = Some(self.min_value.map_or(record.value, |m| m.min(record.value)));
        self.max_value = Some(self.max_value.map_or(record.value, |m| m.max(record.value)));
    }

}

// ============================================================================
// GROUP BUCKETS
// ============================================================================

/// One group at a pivot level: its key, measures and member records.
#[derive(Debug, Clone)]
pub struct GroupBucket<'r> {
    pub key: FieldValue,
    pub measures: MeasureAccumulator,
    pub members: Vec<&'r SalesRecord>,
}

impl GroupBucket<'_> {
    /// Source rows of the member records.
    pub fn rows(&self) -> Vec<u32> {
        self.members.iter().map(|r| r.source_row).collect()
    }
}

/// Insertion-ordered set of groups for one level.
#[derive(Debug, Default)]
pub struct GroupBuckets<'r> {
    index: FxHashMap<FieldValue, usize>,
    buckets: Vec<GroupBucket<'r>>,
}

impl<'r> GroupBuckets<'r> {
    pub fn new() -> Self {
        GroupBuckets {
            index: FxHashMap::default(),
            buckets: Vec::new(),
        }
    }

    /// Adds a record to the bucket for `key`, creating it on first occurrence.
    pub fn add(&mut self, key: FieldValue, record: &'r SalesRecord) {
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                let idx = self.buckets.len();
                self.index.insert(key.clone(), idx);
                self.buckets.push(GroupBucket {
                    key,
                    measures: MeasureAccumulator::new(),
                    members: Vec::new(),
                });
                idx
            }
        };

        let bucket = &mut self.buckets[idx];
        bucket.measures.add(record);
        bucket.members.push(record);
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Consumes the index, yielding buckets in first-occurrence order.
    pub fn into_buckets(self) -> Vec<GroupBucket<'r>> {
        self.buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulator_tracks_measures() {
        let mut acc = MeasureAccumulator::new();
        acc.add(&SalesRecord::new(10.0, 1.0));
        acc.add(&SalesRecord::new(-4.0, 2.0));
        acc.add(&SalesRecord::new(30.0, 3.0));

        assert_eq!(acc.count, 3);
        assert_eq!(acc.value, 36.0);
        assert_eq!(acc.qty, 6.0);
        assert_eq!(acc.min_value, Some(-4.0));
        assert_eq!(acc.max_value, Some(30.0));
    }

    #[test]
    fn test_buckets_keep_first_occurrence_order() {
        let rows: Vec<SalesRecord> = (0..4)
            .map(|row| {
                let mut r = SalesRecord::new(1.0, 0.0);
                r.source_row = row;
                r
            })
            .collect();
        let mut buckets = GroupBuckets::new();
        for (record, key) in rows.iter().zip(["B", "A", "B", "C"]) {
            buckets.add(FieldValue::text(key), record);
        }

        let out = buckets.into_buckets();
        let keys: Vec<String> = out.iter().map(|b| b.key.label()).collect();
        assert_eq!(keys, vec!["B", "A", "C"]);
        assert_eq!(out[0].rows(), vec![0, 2]);
        assert_eq!(out[0].measures.count, 2);
    }
}
