//! FILENAME: treemap-engine/src/view.rs
//! Treemap View - Layout rectangles handed to the renderer.
//!
//! Rectangles are recomputed on every tree or canvas change and never
//! mutated in place. Each one points back to its aggregated node by path.

use serde::{Deserialize, Serialize};

use pivot_engine::NodePath;

// ============================================================================
// GEOMETRY
// ============================================================================

/// A point in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// An axis-aligned box with `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Bounds {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Bounds { x0, y0, x1, y1 }
    }

    /// A zero-area box at one point.
    pub fn point(x: f64, y: f64) -> Self {
        Bounds { x0: x, y0: y, x1: x, y1: y }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Shrinks each edge by the given amount (negative amounts grow it).
    /// An edge pair that would cross collapses to its midpoint instead.
    pub fn inset(&self, left: f64, top: f64, right: f64, bottom: f64) -> Bounds {
        let (mut x0, mut y0) = (self.x0 + left, self.y0 + top);
        let (mut x1, mut y1) = (self.x1 - right, self.y1 - bottom);
        if x1 < x0 {
            x0 = (x0 + x1) / 2.0;
            x1 = x0;
        }
        if y1 < y0 {
            y0 = (y0 + y1) / 2.0;
            y1 = y0;
        }
        Bounds { x0, y0, x1, y1 }
    }

    /// Half-open containment: `[x0, x1) x [y0, y1)`. Empty boxes contain nothing.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x0 && p.x < self.x1 && p.y >= self.y0 && p.y < self.y1
    }

    /// Whether `other` lies entirely inside this box.
    pub fn encloses(&self, other: &Bounds) -> bool {
        other.x0 >= self.x0 && other.x1 <= self.x1 && other.y0 >= self.y0 && other.y1 <= self.y1
    }

    fn rounded(&self) -> Bounds {
        Bounds {
            x0: self.x0.round(),
            y0: self.y0.round(),
            x1: self.x1.round(),
            y1: self.y1.round(),
        }
    }
}

// ============================================================================
// LAYOUT RECTANGLE
// ============================================================================

/// Absolute bounds of one aggregated node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,

    /// Depth of the node (0 = top level).
    pub depth: usize,

    /// Path of the node in the aggregated tree.
    pub path: NodePath,

    /// Node label, copied for the renderer.
    pub name: String,

    /// The node's own value.
    pub value: f64,

    /// Whether the node has children (drawn as a section with a header).
    pub has_children: bool,
}

impl LayoutRect {
    pub(crate) fn new(
        bounds: Bounds,
        depth: usize,
        path: NodePath,
        name: String,
        value: f64,
        has_children: bool,
        round: bool,
    ) -> Self {
        let b = if round { bounds.rounded() } else { bounds };
        LayoutRect {
            x0: b.x0,
            y0: b.y0,
            x1: b.x1,
            y1: b.y1,
            depth,
            path,
            name,
            value,
            has_children,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x0, self.y0, self.x1, self.y1)
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Point {
        Point::new((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }

    /// Whether a label of the given minimum size fits inside.
    pub fn fits_label(&self, min_width: f64, min_height: f64) -> bool {
        self.width() >= min_width && self.height() >= min_height
    }
}
