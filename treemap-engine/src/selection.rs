//! FILENAME: treemap-engine/src/selection.rs
//! Node Selection - maps pointer positions back to aggregated nodes.
//!
//! Rectangles nest, so a point usually lies in several of them. The deepest
//! one wins; for equal depth the later one in layout order wins (it is drawn
//! on top).

use serde::{Deserialize, Serialize};

use pivot_engine::{node_at, AggregatedNode, DrillDownResult, NodePath};
use records::{RecordSet, SalesRecord};

use crate::view::{Bounds, LayoutRect, Point};

// ============================================================================
// HIT TESTING
// ============================================================================

/// The deepest rectangle containing `point`.
pub fn hit_test(point: Point, rects: &[LayoutRect]) -> Option<&LayoutRect> {
    let mut best: Option<&LayoutRect> = None;
    for rect in rects.iter().filter(|r| r.contains(point)) {
        match best {
            Some(b) if rect.depth < b.depth => {}
            _ => best = Some(rect),
        }
    }
    best
}

/// The aggregated node under `point`, if any.
pub fn resolve<'t>(
    point: Point,
    rects: &[LayoutRect],
    nodes: &'t [AggregatedNode],
) -> Option<&'t AggregatedNode> {
    let rect = hit_test(point, rects)?;
    node_at(nodes, &rect.path)
}

/// Rectangles of the deepest depth that lie entirely inside `region`.
/// Zero-area rectangles are never selected.
pub fn resolve_region(region: Bounds, rects: &[LayoutRect]) -> Vec<&LayoutRect> {
    let inside: Vec<&LayoutRect> = rects
        .iter()
        .filter(|r| r.area() > 0.0 && region.encloses(&r.bounds()))
        .collect();

    let deepest = match inside.iter().map(|r| r.depth).max() {
        Some(d) => d,
        None => return Vec::new(),
    };
    inside.into_iter().filter(|r| r.depth == deepest).collect()
}

// ============================================================================
// SELECTION
// ============================================================================

/// A snapshot of the selected node. Stays valid after the tree it came from
/// is replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub path: NodePath,

    /// Group labels from the top level down to the node.
    pub labels: Vec<String>,

    /// Dimension names along the path.
    pub dimensions: Vec<String>,

    pub name: String,
    pub value: f64,
    pub qty: f64,
    pub record_count: usize,
    pub source_rows: Vec<u32>,
}

impl Selection {
    /// Builds a selection for the node at `path`.
    pub fn from_path(nodes: &[AggregatedNode], path: &[u32]) -> Option<Selection> {
        let mut labels = Vec::with_capacity(path.len());
        let mut dimensions = Vec::with_capacity(path.len());
        let mut level = nodes;
        let mut target = None;
        for &idx in path {
            let node = level.get(idx as usize)?;
            labels.push(node.name.clone());
            dimensions.push(node.dimension.clone());
            level = &node.children;
            target = Some(node);
        }
        let node = target?;

        Some(Selection {
            path: NodePath::from_slice(path),
            labels,
            dimensions,
            name: node.name.clone(),
            value: node.value,
            qty: node.qty,
            record_count: node.record_count,
            source_rows: node.source_rows.clone(),
        })
    }

    /// The dimension of the selected level.
    pub fn dimension(&self) -> Option<&str> {
        self.dimensions.last().map(String::as_str)
    }

    /// Labels joined for display, e.g. `2020 > A`.
    pub fn breadcrumb(&self) -> String {
        self.labels.join(" > ")
    }

    /// The records that contributed to the selected node.
    pub fn records<'r>(&self, records: &'r RecordSet) -> Vec<&'r SalesRecord> {
        self.source_rows
            .iter()
            .filter_map(|&row| records.get(row))
            .collect()
    }

    /// Drill-down view of the selection, capped at `max_records` rows.
    pub fn drill_down(&self, max_records: usize) -> DrillDownResult {
        let mut result = DrillDownResult::new(self.path.clone());
        result.max_records = max_records;
        result.dimensions = self.dimensions.clone();
        result.labels = self.labels.clone();
        result.total_count = self.source_rows.len();
        result.is_truncated = result.total_count > max_records;
        result.source_rows = self.source_rows.iter().take(max_records).copied().collect();
        result
    }
}
