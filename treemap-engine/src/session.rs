//! FILENAME: treemap-engine/src/session.rs
//! Treemap Session - owns one records -> tree -> rectangles pipeline.
//!
//! Inputs are the record set, the dimension schema, the canvas size and the
//! layout options. The tree and the rectangles are derived and recomputed
//! whenever an input they depend on changes.

use std::sync::Arc;

use log::debug;

use pivot_engine::{
    AggregatedNode, DimensionSchema, PivotController, PivotError, SortOrder,
};
use records::{RecordSet, SalesRecord};

use crate::definition::TreemapOptions;
use crate::engine::layout_with;
use crate::selection::{hit_test, Selection};
use crate::view::{LayoutRect, Point};

pub struct TreemapSession {
    controller: PivotController,
    options: TreemapOptions,
    width: f64,
    height: f64,
    rects: Vec<LayoutRect>,
    selection: Option<Selection>,
}

impl TreemapSession {
    /// Aggregates immediately. The canvas starts at 0x0 until the host
    /// reports its size.
    pub fn new(records: RecordSet, schema: DimensionSchema, options: TreemapOptions) -> Self {
        let mut session = TreemapSession {
            controller: PivotController::new(records, schema),
            options,
            width: 0.0,
            height: 0.0,
            rects: Vec::new(),
            selection: None,
        };
        session.relayout();
        session
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn records(&self) -> &RecordSet {
        self.controller.records()
    }

    pub fn schema(&self) -> &DimensionSchema {
        self.controller.schema()
    }

    pub fn tree(&self) -> &Arc<[AggregatedNode]> {
        self.controller.tree()
    }

    pub fn rects(&self) -> &[LayoutRect] {
        &self.rects
    }

    pub fn options(&self) -> &TreemapOptions {
        &self.options
    }

    pub fn canvas(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Records behind the current selection (empty without one).
    pub fn selected_records(&self) -> Vec<&SalesRecord> {
        match &self.selection {
            Some(sel) => sel.records(self.controller.records()),
            None => Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Layout-only changes (tree unchanged, selection kept)
    // ------------------------------------------------------------------

    pub fn set_canvas(&mut self, width: f64, height: f64) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        self.relayout();
    }

    pub fn set_options(&mut self, options: TreemapOptions) {
        if self.options == options {
            return;
        }
        self.options = options;
        self.relayout();
    }

    // ------------------------------------------------------------------
    // Tree changes (selection cleared)
    // ------------------------------------------------------------------

    pub fn reorder<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), PivotError> {
        self.controller.reorder(names)?;
        self.tree_changed();
        Ok(())
    }

    pub fn toggle(&mut self, name: &str) -> Result<(), PivotError> {
        self.controller.toggle(name)?;
        self.tree_changed();
        Ok(())
    }

    pub fn set_direction(&mut self, name: &str, direction: SortOrder) -> Result<(), PivotError> {
        self.controller.set_direction(name, direction)?;
        self.tree_changed();
        Ok(())
    }

    pub fn set_schema(&mut self, schema: DimensionSchema) {
        self.controller.set_schema(schema);
        self.tree_changed();
    }

    pub fn set_records(&mut self, records: RecordSet) {
        self.controller.set_records(records);
        self.tree_changed();
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Selects the node under `point`. A miss clears the selection.
    pub fn select_at(&mut self, point: Point) -> Option<&Selection> {
        self.selection = hit_test(point, &self.rects)
            .and_then(|rect| Selection::from_path(self.controller.tree(), &rect.path));
        if let Some(sel) = &self.selection {
            debug!(target: "TREEMAP", "selected '{}' ({} records)", sel.breadcrumb(), sel.record_count);
        }
        self.selection.as_ref()
    }

    /// Selects the node at `path` in the current tree.
    pub fn select_path(&mut self, path: &[u32]) -> Option<&Selection> {
        self.selection = Selection::from_path(self.controller.tree(), path);
        self.selection.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    fn tree_changed(&mut self) {
        self.selection = None;
        self.relayout();
    }

    fn relayout(&mut self) {
        self.rects = layout_with(self.controller.tree(), self.width, self.height, &self.options);
        debug!(
            target: "TREEMAP",
            "session relayout revision={} canvas={}x{} rects={}",
            self.controller.revision(),
            self.width,
            self.height,
            self.rects.len()
        );
    }
}
