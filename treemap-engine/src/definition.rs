//! FILENAME: treemap-engine/src/definition.rs
//! Treemap Definition - The serializable layout configuration.
//!
//! Padding constants reduce the area available to children; they never make
//! a rectangle invert. Label thresholds are advisory: the engine computes
//! every rectangle and the renderer decides which ones get a label.

use serde::{Deserialize, Serialize};

// ============================================================================
// TILING
// ============================================================================

/// How sibling rectangles partition their parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TilingMethod {
    /// Rows of siblings chosen to keep aspect ratios near the golden ratio.
    Squarify,
    /// Alternate horizontal and vertical splits by depth.
    SliceDice,
    /// Stack siblings vertically.
    Slice,
    /// Place siblings side by side horizontally.
    Dice,
}

impl Default for TilingMethod {
    fn default() -> Self {
        TilingMethod::Squarify
    }
}

// ============================================================================
// OPTIONS
// ============================================================================

/// Layout options for the treemap engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreemapOptions {
    pub tiling: TilingMethod,

    /// Inset of the canvas and of every parent's content area.
    pub padding_outer: f64,

    /// Top inset of parents with children (room for the group label).
    pub padding_top: f64,

    /// Gap between adjacent siblings.
    pub padding_inner: f64,

    /// Round output coordinates to whole layout units.
    pub round: bool,

    /// Smallest rectangle width that can carry a label.
    pub min_label_width: f64,

    /// Smallest rectangle height that can carry a label.
    pub min_label_height: f64,
}

impl Default for TreemapOptions {
    fn default() -> Self {
        TreemapOptions {
            tiling: TilingMethod::Squarify,
            padding_outer: 1.0,
            padding_top: 18.0,
            padding_inner: 1.0,
            round: false,
            min_label_width: 40.0,
            min_label_height: 25.0,
        }
    }
}

impl TreemapOptions {
    /// Options with every padding set to zero.
    pub fn unpadded() -> Self {
        TreemapOptions {
            padding_outer: 0.0,
            padding_top: 0.0,
            padding_inner: 0.0,
            ..TreemapOptions::default()
        }
    }

    pub fn with_tiling(mut self, tiling: TilingMethod) -> Self {
        self.tiling = tiling;
        self
    }

    /// Paddings with negative or NaN values clamped to zero.
    pub(crate) fn clamped_padding(&self) -> (f64, f64, f64) {
        (
            self.padding_outer.max(0.0),
            self.padding_top.max(0.0),
            self.padding_inner.max(0.0),
        )
    }
}
