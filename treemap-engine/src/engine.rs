//! FILENAME: treemap-engine/src/engine.rs
//! Treemap Engine - partitions a canvas proportionally to node values.
//!
//! Algorithm:
//! 1. A synthetic root covers the canvas; its children are the top-level nodes
//! 2. Siblings are sorted by descending value (stable)
//! 3. The parent's content box is tiled so each sibling's share of the area
//!    is its value over the siblings' total
//! 4. Each node with children is inset by the padding and tiled recursively
//!
//! A node's own value is its weight. Parent values are NOT recomputed as the
//! sum of their children: dimension slices can overlap in meaning, and
//! summing would double count them.

use log::debug;

use pivot_engine::{AggregatedNode, NodePath};

use crate::definition::{TilingMethod, TreemapOptions};
use crate::view::{Bounds, LayoutRect};

/// Golden ratio, the target aspect ratio of squarified rows.
const PHI: f64 = 1.618_033_988_749_895;

// ============================================================================
// TREEMAP CALCULATOR
// ============================================================================

struct TreemapCalculator<'a> {
    options: &'a TreemapOptions,
    padding_outer: f64,
    padding_top: f64,
    /// Half the inner padding, taken off each edge of every child.
    half_inner: f64,
    rects: Vec<LayoutRect>,
}

impl<'a> TreemapCalculator<'a> {
    fn new(options: &'a TreemapOptions) -> Self {
        let (padding_outer, padding_top, padding_inner) = options.clamped_padding();
        TreemapCalculator {
            options,
            padding_outer,
            padding_top,
            half_inner: padding_inner / 2.0,
            rects: Vec::new(),
        }
    }

    fn calculate(mut self, nodes: &[AggregatedNode], width: f64, height: f64) -> Vec<LayoutRect> {
        let canvas = Bounds::new(0.0, 0.0, clamp_extent(width), clamp_extent(height));

        // The synthetic root has no label, so its top edge uses the outer padding
        let edge = self.padding_outer - self.half_inner;
        let content = canvas.inset(edge, edge, edge, edge);

        let mut path = NodePath::new();
        self.layout_level(nodes, content, 0, &mut path);
        self.rects
    }

    /// Tiles one sibling set into `content` and recurses into each child.
    fn layout_level(
        &mut self,
        nodes: &[AggregatedNode],
        content: Bounds,
        depth: usize,
        path: &mut NodePath,
    ) {
        if nodes.is_empty() {
            return;
        }

        let order = sorted_by_weight(nodes);
        let weights: Vec<f64> = order.iter().map(|&i| weight(nodes[i].value)).collect();
        let h = self.half_inner;
        // Zero-weight cells sit at the inner corner of the content box
        let start = content.inset(h, h, h, h);
        let anchor = Bounds::point(start.x0, start.y0);
        let cells = tile(self.options.tiling, depth, &weights, content, anchor);

        for (&idx, cell) in order.iter().zip(cells) {
            let node = &nodes[idx];
            let bounds = cell.inset(h, h, h, h);

            path.push(idx as u32);
            self.rects.push(LayoutRect::new(
                bounds,
                depth,
                path.clone(),
                node.name.clone(),
                node.value,
                !node.children.is_empty(),
                self.options.round,
            ));

            if !node.children.is_empty() {
                let side = self.padding_outer - h;
                let top = self.padding_top - h;
                let child_content = bounds.inset(side, top, side, side);
                self.layout_level(&node.children, child_content, depth + 1, path);
            }
            path.pop();
        }
    }
}

/// Negative and NaN canvas dimensions clamp to zero.
fn clamp_extent(v: f64) -> f64 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

/// Layout weight of a node value. Non-positive or non-finite values weigh 0.
fn weight(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Sibling indices ordered by descending weight; ties keep tree order.
fn sorted_by_weight(nodes: &[AggregatedNode]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..nodes.len()).collect();
    order.sort_by(|&a, &b| {
        weight(nodes[b].value).total_cmp(&weight(nodes[a].value))
    });
    order
}

// ============================================================================
// TILING
// ============================================================================

/// Partitions `content` among `weights`, returning one cell per weight.
/// Zero weights get the zero-area `anchor` cell.
fn tile(
    method: TilingMethod,
    depth: usize,
    weights: &[f64],
    content: Bounds,
    anchor: Bounds,
) -> Vec<Bounds> {
    let mut cells = vec![anchor; weights.len()];

    let positive: Vec<usize> = (0..weights.len()).filter(|&i| weights[i] > 0.0).collect();
    if positive.is_empty() {
        return cells;
    }
    let values: Vec<f64> = positive.iter().map(|&i| weights[i]).collect();

    let tiled = match method {
        TilingMethod::Squarify => squarify(&values, content),
        TilingMethod::Dice => dice(&values, content),
        TilingMethod::Slice => slice(&values, content),
        TilingMethod::SliceDice => {
            if depth % 2 == 0 {
                dice(&values, content)
            } else {
                slice(&values, content)
            }
        }
    };

    for (&i, cell) in positive.iter().zip(tiled) {
        cells[i] = cell;
    }
    cells
}

/// Side by side along x, widths proportional to the values.
fn dice(values: &[f64], b: Bounds) -> Vec<Bounds> {
    let total: f64 = values.iter().sum();
    let k = if total > 0.0 { b.width() / total } else { 0.0 };
    let mut x = b.x0;
    let last = values.len().saturating_sub(1);
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x0 = x;
            x = if i == last { b.x1 } else { x + v * k };
            Bounds::new(x0, b.y0, x, b.y1)
        })
        .collect()
}

/// Stacked along y, heights proportional to the values.
fn slice(values: &[f64], b: Bounds) -> Vec<Bounds> {
    let total: f64 = values.iter().sum();
    let k = if total > 0.0 { b.height() / total } else { 0.0 };
    let mut y = b.y0;
    let last = values.len().saturating_sub(1);
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let y0 = y;
            y = if i == last { b.y1 } else { y + v * k };
            Bounds::new(b.x0, y0, b.x1, y)
        })
        .collect()
}

/// Squarified tiling (Bruls, Huizing, van Wijk) with a golden-ratio target.
/// Values must be positive and sorted descending.
fn squarify(values: &[f64], b: Bounds) -> Vec<Bounds> {
    let n = values.len();
    let mut cells = Vec::with_capacity(n);
    let (mut x0, mut y0, x1, y1) = (b.x0, b.y0, b.x1, b.y1);
    let mut remaining: f64 = values.iter().sum();
    let mut i0 = 0;

    while i0 < n {
        let dx = x1 - x0;
        let dy = y1 - y0;

        // Grow the row while the worst aspect ratio keeps improving
        let mut i1 = i0 + 1;
        let mut sum = values[i0];
        let mut min_value = sum;
        let mut max_value = sum;
        let alpha = (dy / dx).max(dx / dy) / (remaining * PHI);
        let mut beta = sum * sum * alpha;
        let mut min_ratio = (max_value / beta).max(beta / min_value);

        while i1 < n {
            let v = values[i1];
            let next_sum = sum + v;
            let next_min = min_value.min(v);
            let next_max = max_value.max(v);
            beta = next_sum * next_sum * alpha;
            let ratio = (next_max / beta).max(beta / next_min);
            if ratio > min_ratio {
                break;
            }
            sum = next_sum;
            min_value = next_min;
            max_value = next_max;
            min_ratio = ratio;
            i1 += 1;
        }

        let row = &values[i0..i1];
        let is_last = i1 == n;
        if dx < dy {
            // Row spans the full width at the top
            let y2 = if is_last || remaining <= 0.0 {
                y1
            } else {
                y0 + dy * sum / remaining
            };
            cells.extend(dice(row, Bounds::new(x0, y0, x1, y2)));
            y0 = y2;
        } else {
            // Column spans the full height at the left
            let x2 = if is_last || remaining <= 0.0 {
                x1
            } else {
                x0 + dx * sum / remaining
            };
            cells.extend(slice(row, Bounds::new(x0, y0, x2, y1)));
            x0 = x2;
        }

        remaining -= sum;
        i0 = i1;
    }

    cells
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Lays out `nodes` on a `width` x `height` canvas with default options.
pub fn layout(nodes: &[AggregatedNode], width: f64, height: f64) -> Vec<LayoutRect> {
    layout_with(nodes, width, height, &TreemapOptions::default())
}

/// Lays out `nodes` and all their descendants. Rectangles are returned in
/// pre-order (parent before children), siblings in descending value order.
pub fn layout_with(
    nodes: &[AggregatedNode],
    width: f64,
    height: f64,
    options: &TreemapOptions,
) -> Vec<LayoutRect> {
    let rects = TreemapCalculator::new(options).calculate(nodes, width, height);
    debug!(
        target: "TREEMAP",
        "layout {}x{} tiling={:?} rects={}",
        width,
        height,
        options.tiling,
        rects.len()
    );
    rects
}
