//! FILENAME: pivot-engine/src/engine.rs
//! Pivot Engine - groups flat records into an aggregated hierarchy.
//!
//! Algorithm:
//! 1. Resolve each active dimension to a field accessor (unknown names resolve
//!    to none and route every record to the "Unknown" group)
//! 2. Partition the current record subset by the level's key, keeping
//!    first-occurrence order
//! 3. Accumulate measures per group
//! 4. Recurse into each group's members with the remaining dimensions
//!
//! Every record lands in exactly one group per level, so the leaves partition
//! the input.

use log::{debug, warn};

use records::{accessor, Accessor, FieldValue, RecordSet, SalesRecord};

use crate::cache::{GroupBucket, GroupBuckets};
use crate::definition::{DimensionSchema, SortOrder};
use crate::view::{node_at, AggregatedNode, DrillDownResult, NodePath};

// ============================================================================
// LEVEL CONFIGURATION
// ============================================================================

/// One grouping level of the hierarchy.
#[derive(Debug, Clone)]
struct Level<'d> {
    dimension: &'d str,
    accessor: Option<Accessor>,
    sort_order: SortOrder,
}

impl<'d> Level<'d> {
    fn new(dimension: &'d str, sort_order: SortOrder) -> Self {
        Level {
            dimension,
            accessor: accessor(dimension),
            sort_order,
        }
    }

    fn key_of(&self, record: &SalesRecord) -> FieldValue {
        match self.accessor {
            Some(get) => get(record),
            None => FieldValue::Empty,
        }
    }
}

// ============================================================================
// PIVOT AGGREGATOR
// ============================================================================

/// Builds the aggregated tree for one record slice and dimension list.
pub struct PivotAggregator<'a> {
    records: &'a [SalesRecord],
    levels: Vec<Level<'a>>,
}

impl<'a> PivotAggregator<'a> {
    /// Groups by `dimensions` in order, keeping first-occurrence group order.
    pub fn new<S: AsRef<str>>(records: &'a [SalesRecord], dimensions: &'a [S]) -> Self {
        PivotAggregator {
            records,
            levels: dimensions
                .iter()
                .map(|d| Level::new(d.as_ref(), SortOrder::DataSourceOrder))
                .collect(),
        }
    }

    /// Groups by the schema's active dimensions, applying each direction.
    pub fn from_schema(records: &'a [SalesRecord], schema: &'a DimensionSchema) -> Self {
        PivotAggregator {
            records,
            levels: schema
                .active_in_order()
                .into_iter()
                .map(|d| Level::new(d.name.as_str(), d.direction))
                .collect(),
        }
    }

    /// Executes the grouping and returns the top-level nodes.
    pub fn aggregate(&self) -> Vec<AggregatedNode> {
        if self.records.is_empty() || self.levels.is_empty() {
            return Vec::new();
        }

        for level in &self.levels {
            if level.accessor.is_none() {
                warn!(
                    target: "PIVOT",
                    "unknown dimension '{}', grouping all records as Unknown",
                    level.dimension
                );
            }
        }

        let subset: Vec<&SalesRecord> = self.records.iter().collect();
        let tree = self.build_level(&subset, 0);

        debug!(
            target: "PIVOT",
            "aggregated records={} levels={} top_groups={}",
            self.records.len(),
            self.levels.len(),
            tree.len()
        );
        tree
    }

    /// Recursively builds one level of the tree.
    fn build_level(&self, subset: &[&'a SalesRecord], depth: usize) -> Vec<AggregatedNode> {
        let level = match self.levels.get(depth) {
            Some(level) => level,
            None => return Vec::new(),
        };

        let mut buckets = GroupBuckets::new();
        for &record in subset {
            buckets.add(level.key_of(record), record);
        }

        let mut groups = buckets.into_buckets();
        sort_groups(&mut groups, level.sort_order);

        groups
            .into_iter()
            .map(|bucket| {
                let children = if depth + 1 < self.levels.len() {
                    self.build_level(&bucket.members, depth + 1)
                } else {
                    Vec::new()
                };

                AggregatedNode {
                    name: bucket.key.label(),
                    dimension: level.dimension.to_string(),
                    depth,
                    value: bucket.measures.value,
                    qty: bucket.measures.qty,
                    record_count: bucket.measures.count,
                    min_value: bucket.measures.min_value,
                    max_value: bucket.measures.max_value,
                    source_rows: bucket.rows(),
                    key: bucket.key,
                    children,
                }
            })
            .collect()
    }
}

/// Sorts one level's groups by key. Stable, so equal keys keep data order.
fn sort_groups(groups: &mut [GroupBucket<'_>], sort_order: SortOrder) {
    match sort_order {
        SortOrder::Ascending => groups.sort_by(|a, b| a.key.compare(&b.key)),
        SortOrder::Descending => groups.sort_by(|a, b| b.key.compare(&a.key)),
        SortOrder::DataSourceOrder => {
            // Keep original order (order of first appearance)
        }
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Groups `records` by `dimensions` (outermost first).
/// Empty records or an empty dimension list produce an empty tree.
pub fn aggregate<S: AsRef<str>>(records: &[SalesRecord], dimensions: &[S]) -> Vec<AggregatedNode> {
    PivotAggregator::new(records, dimensions).aggregate()
}

/// Groups `records` by the schema's active dimensions in order.
pub fn aggregate_schema(records: &RecordSet, schema: &DimensionSchema) -> Vec<AggregatedNode> {
    PivotAggregator::from_schema(records.as_slice(), schema).aggregate()
}

/// Collects the source records behind the node at `path`.
/// Returns `None` when the path does not resolve.
pub fn drill_down(
    nodes: &[AggregatedNode],
    path: &[u32],
    max_records: usize,
) -> Option<DrillDownResult> {
    let target = node_at(nodes, path)?;

    let mut result = DrillDownResult::new(NodePath::from_slice(path));
    result.max_records = max_records;

    let mut level = nodes;
    for &idx in path {
        let node = &level[idx as usize];
        result.dimensions.push(node.dimension.clone());
        result.labels.push(node.name.clone());
        level = &node.children;
    }

    result.total_count = target.source_rows.len();
    result.is_truncated = result.total_count > max_records;
    result.source_rows = target.source_rows.iter().take(max_records).copied().collect();
    Some(result)
}
