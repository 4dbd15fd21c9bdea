//! FILENAME: pivot-engine/src/view.rs
//! Aggregated tree - the output of the pivot engine.
//!
//! The tree is what stat panels and breadcrumbs display and what the treemap
//! lays out. Nodes are addressed by `NodePath` (child indices from the top
//! level down), which stays valid until the tree is rebuilt.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use records::{FieldValue, OrderedFloat, RecordSet, SalesRecord};

use crate::definition::SiblingSort;

/// Child indices from the top level down to a node.
pub type NodePath = SmallVec<[u32; 4]>;

// ============================================================================
// AGGREGATED NODE
// ============================================================================

/// One group in the pivot hierarchy.
/// `value` and `qty` are totals of this node's own record subset; they are
/// never recomputed from the children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedNode {
    /// Display label of the group key ("Unknown" for missing values).
    pub name: String,

    /// The grouping key.
    pub key: FieldValue,

    /// The dimension this node groups by.
    pub dimension: String,

    /// Depth in the tree (0 = top level).
    pub depth: usize,

    /// Sum of the primary measure.
    pub value: f64,

    /// Sum of the secondary measure.
    pub qty: f64,

    /// Number of contributing records.
    pub record_count: usize,

    pub min_value: Option<f64>,
    pub max_value: Option<f64>,

    /// Positions of the contributing records in the record set.
    pub source_rows: Vec<u32>,

    /// Next level of grouping. Empty for leaves.
    pub children: Vec<AggregatedNode>,
}

impl AggregatedNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Average of the primary measure over the contributing records.
    pub fn average_value(&self) -> f64 {
        if self.record_count > 0 {
            self.value / self.record_count as f64
        } else {
            0.0
        }
    }

    /// This node's value as a fraction of `total` (0 when `total` is 0).
    pub fn share_of(&self, total: f64) -> f64 {
        if total != 0.0 {
            self.value / total
        } else {
            0.0
        }
    }

    /// Finds a direct child by label.
    pub fn child(&self, name: &str) -> Option<&AggregatedNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Resolves the contributing records against the record set.
    pub fn records<'r>(&self, records: &'r RecordSet) -> Vec<&'r SalesRecord> {
        self.source_rows
            .iter()
            .filter_map(|&row| records.get(row))
            .collect()
    }
}

// ============================================================================
// TREE HELPERS
// ============================================================================

/// Looks up a node by path.
pub fn node_at<'t>(nodes: &'t [AggregatedNode], path: &[u32]) -> Option<&'t AggregatedNode> {
    let (first, rest) = path.split_first()?;
    let mut node = nodes.get(*first as usize)?;
    for &idx in rest {
        node = node.children.get(idx as usize)?;
    }
    Some(node)
}

/// Visits every node depth-first, parents before children.
pub fn walk<F>(nodes: &[AggregatedNode], visit: &mut F)
where
    F: FnMut(&NodePath, &AggregatedNode),
{
    let mut path = NodePath::new();
    walk_level(nodes, &mut path, visit);
}

fn walk_level<F>(nodes: &[AggregatedNode], path: &mut NodePath, visit: &mut F)
where
    F: FnMut(&NodePath, &AggregatedNode),
{
    for (idx, node) in nodes.iter().enumerate() {
        path.push(idx as u32);
        visit(path, node);
        walk_level(&node.children, path, visit);
        path.pop();
    }
}

/// Number of leaf nodes in the tree.
pub fn leaf_count(nodes: &[AggregatedNode]) -> usize {
    let mut count = 0;
    walk(nodes, &mut |_, node| {
        if node.is_leaf() {
            count += 1;
        }
    });
    count
}

/// Sum of record counts over all leaves. Equals the number of aggregated
/// records for any non-empty tree.
pub fn leaf_record_total(nodes: &[AggregatedNode]) -> usize {
    let mut total = 0;
    walk(nodes, &mut |_, node| {
        if node.is_leaf() {
            total += node.record_count;
        }
    });
    total
}

/// Sum of the top-level values (the grand total).
pub fn total_value(nodes: &[AggregatedNode]) -> f64 {
    nodes.iter().map(|n| n.value).sum()
}

/// Labels from the top level down to the node at `path`.
/// Stops at the first index that does not resolve.
pub fn breadcrumb(nodes: &[AggregatedNode], path: &[u32]) -> Vec<String> {
    let mut labels = Vec::with_capacity(path.len());
    let mut level = nodes;
    for &idx in path {
        match level.get(idx as usize) {
            Some(node) => {
                labels.push(node.name.clone());
                level = &node.children;
            }
            None => break,
        }
    }
    labels
}

/// Sorts siblings at every level. Existing paths are invalidated.
pub fn sort_siblings(nodes: &mut [AggregatedNode], order: SiblingSort) {
    match order {
        SiblingSort::ValueDescending => nodes.sort_by(|a, b| {
            sort_value(b.value)
                .cmp(&sort_value(a.value))
                .then_with(|| a.name.cmp(&b.name))
        }),
        SiblingSort::NameAscending => nodes.sort_by(|a, b| a.key.compare(&b.key)),
    }
    for node in nodes.iter_mut() {
        sort_siblings(&mut node.children, order);
    }
}

/// NaN values sort after every number when ordering by value descending.
fn sort_value(value: f64) -> OrderedFloat {
    OrderedFloat(if value.is_nan() { f64::NEG_INFINITY } else { value })
}

// ============================================================================
// DRILL-DOWN RESULT
// ============================================================================

/// Result of a drill-down operation (the records behind one node).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillDownResult {
    /// The node that was drilled into.
    pub path: NodePath,

    /// Dimension names along the path.
    pub dimensions: Vec<String>,

    /// Group labels along the path.
    pub labels: Vec<String>,

    /// The detail records (source row indices).
    pub source_rows: Vec<u32>,

    /// Total count of matching records.
    pub total_count: usize,

    /// Whether `source_rows` was cut off at `max_records`.
    pub is_truncated: bool,

    /// Maximum records that were fetched.
    pub max_records: usize,
}

impl DrillDownResult {
    pub fn new(path: NodePath) -> Self {
        DrillDownResult {
            path,
            dimensions: Vec::new(),
            labels: Vec::new(),
            source_rows: Vec::new(),
            total_count: 0,
            is_truncated: false,
            max_records: 1000, // Default limit
        }
    }

    /// Materializes the detail records for a drill-down table.
    pub fn records<'r>(&self, records: &'r RecordSet) -> Vec<&'r SalesRecord> {
        self.source_rows
            .iter()
            .filter_map(|&row| records.get(row))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn node(name: &str, value: f64, children: Vec<AggregatedNode>) -> AggregatedNode {
        let record_count = if children.is_empty() { 1 } else { children.len() };
        AggregatedNode {
            name: name.to_string(),
            key: FieldValue::text(name),
            dimension: "company".to_string(),
            depth: 0,
            value,
            qty: 0.0,
            record_count,
            min_value: None,
            max_value: None,
            source_rows: Vec::new(),
            children,
        }
    }

    fn sample() -> Vec<AggregatedNode> {
        vec![
            node("2020", 40.0, vec![node("A", 10.0, vec![]), node("B", 30.0, vec![])]),
            node("2021", 20.0, vec![node("A", 20.0, vec![])]),
        ]
    }

    #[test]
    fn test_node_at_and_breadcrumb() {
        let tree = sample();

        assert_eq!(node_at(&tree, &[0, 1]).map(|n| n.name.as_str()), Some("B"));
        assert_eq!(node_at(&tree, &[1]).map(|n| n.value), Some(20.0));
        assert!(node_at(&tree, &[1, 5]).is_none());
        assert!(node_at(&tree, &[]).is_none());
        assert_eq!(breadcrumb(&tree, &[0, 1]), vec!["2020", "B"]);
        assert_eq!(breadcrumb(&tree, &[1, 9]), vec!["2021"]);
    }

    #[test]
    fn test_walk_visits_parents_first() {
        let tree = sample();
        let mut seen: Vec<(NodePath, String)> = Vec::new();
        walk(&tree, &mut |path, node| seen.push((path.clone(), node.name.clone())));

        let expected: Vec<(NodePath, String)> = vec![
            (smallvec![0], "2020".to_string()),
            (smallvec![0, 0], "A".to_string()),
            (smallvec![0, 1], "B".to_string()),
            (smallvec![1], "2021".to_string()),
            (smallvec![1, 0], "A".to_string()),
        ];
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_leaf_totals() {
        let tree = sample();

        assert_eq!(leaf_count(&tree), 3);
        assert_eq!(leaf_record_total(&tree), 3);
        assert_eq!(total_value(&tree), 60.0);
    }

    #[test]
    fn test_sort_siblings_by_value() {
        let mut tree = sample();
        sort_siblings(&mut tree, SiblingSort::ValueDescending);

        assert_eq!(tree[0].name, "2020");
        assert_eq!(tree[0].children[0].name, "B");

        sort_siblings(&mut tree, SiblingSort::NameAscending);
        assert_eq!(tree[0].children[0].name, "A");
    }

    #[test]
    fn test_sort_siblings_with_nan_values() {
        let children: Vec<AggregatedNode> = (0..200)
            .map(|i| {
                let value = if i % 3 == 0 { f64::NAN } else { (i * 7919 % 263) as f64 };
                node(&format!("c{:03}", i), value, vec![])
            })
            .collect();
        let mut tree: Vec<AggregatedNode> = (0..200)
            .map(|i| {
                let value = if i % 3 == 1 { f64::NAN } else { (i * 31 % 97) as f64 };
                node(&format!("p{:03}", i), value, children.clone())
            })
            .collect();

        sort_siblings(&mut tree, SiblingSort::ValueDescending);

        for level in [&tree[..], &tree[0].children[..]] {
            let values: Vec<f64> = level.iter().map(|n| n.value).collect();
            let first_nan = values.iter().position(|v| v.is_nan()).unwrap();
            assert!(values[first_nan..].iter().all(|v| v.is_nan()));
            assert!(values[..first_nan].windows(2).all(|w| w[0] >= w[1]));
        }
        // NaN ties fall back to name order
        let nan_names: Vec<&str> = tree
            .iter()
            .filter(|n| n.value.is_nan())
            .map(|n| n.name.as_str())
            .collect();
        assert!(nan_names.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_share_and_average() {
        let mut n = node("A", 30.0, vec![]);
        n.record_count = 3;

        assert_eq!(n.average_value(), 10.0);
        assert_eq!(n.share_of(60.0), 0.5);
        assert_eq!(n.share_of(0.0), 0.0);
    }
}
