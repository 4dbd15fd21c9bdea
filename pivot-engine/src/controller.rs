//! FILENAME: pivot-engine/src/controller.rs
//! Reorder Controller - owns the committed dimension schema and the tree
//! aggregated from it.
//!
//! Every accepted change replaces the schema value wholesale and rebuilds the
//! tree. A rejected change leaves both untouched.

use std::sync::Arc;

use log::{debug, warn};

use records::RecordSet;

use crate::definition::{DimensionSchema, SortOrder};
use crate::engine::aggregate_schema;
use crate::error::PivotError;
use crate::view::AggregatedNode;

pub struct PivotController {
    records: RecordSet,
    schema: DimensionSchema,
    tree: Arc<[AggregatedNode]>,

    /// Bumped on every rebuild (for staleness checks by the host).
    revision: u64,
}

impl PivotController {
    /// Creates a controller and aggregates immediately.
    pub fn new(records: RecordSet, schema: DimensionSchema) -> Self {
        let tree = aggregate_schema(&records, &schema).into();
        PivotController {
            records,
            schema,
            tree,
            revision: 0,
        }
    }

    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    pub fn schema(&self) -> &DimensionSchema {
        &self.schema
    }

    /// The current aggregated tree. Cloning the Arc is cheap.
    pub fn tree(&self) -> &Arc<[AggregatedNode]> {
        &self.tree
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Applies a new dimension order. Rejected orders keep the previous
    /// schema and tree.
    pub fn reorder<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), PivotError> {
        let next = self.schema.reorder(names).map_err(|e| {
            warn!(target: "PIVOT", "reorder rejected: {}", e);
            e
        })?;
        self.commit(next);
        Ok(())
    }

    /// Flips one dimension's active flag.
    pub fn toggle(&mut self, name: &str) -> Result<(), PivotError> {
        let next = self.schema.toggle(name).map_err(|e| {
            warn!(target: "PIVOT", "toggle '{}' rejected: {}", name, e);
            e
        })?;
        self.commit(next);
        Ok(())
    }

    /// Changes the group sort order of one dimension.
    pub fn set_direction(&mut self, name: &str, direction: SortOrder) -> Result<(), PivotError> {
        let next = self.schema.set_direction(name, direction).map_err(|e| {
            warn!(target: "PIVOT", "set_direction '{}' rejected: {}", name, e);
            e
        })?;
        self.commit(next);
        Ok(())
    }

    /// Replaces the whole schema (e.g. a loaded configuration).
    pub fn set_schema(&mut self, schema: DimensionSchema) {
        self.commit(schema);
    }

    /// Replaces the record set after a refresh and re-aggregates.
    pub fn set_records(&mut self, records: RecordSet) {
        self.records = records;
        self.rebuild();
    }

    fn commit(&mut self, schema: DimensionSchema) {
        self.schema = schema;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.tree = aggregate_schema(&self.records, &self.schema).into();
        self.revision += 1;
        debug!(
            target: "PIVOT",
            "rebuilt tree revision={} active={:?} top_groups={}",
            self.revision,
            self.schema.active_names(),
            self.tree.len()
        );
    }
}
