//! FILENAME: pivot-engine/src/lib.rs
//! Pivot aggregation subsystem.
//!
//! Turns flat sales records into an N-level grouping hierarchy driven by a
//! reorderable list of dimensions. Depends on `records` for the record model
//! and the dimension accessor table.
//!
//! Layers:
//! - `definition`: Serializable dimension schema (what the hierarchy IS)
//! - `cache`: Group buckets and measure accumulators (HOW we compute)
//! - `view`: The aggregated tree (WHAT we display)
//! - `engine`: Aggregation and drill-down (HOW we calculate)
//! - `controller`: Committed schema + cached tree, rebuilt on reorder/toggle

pub mod cache;
pub mod controller;
pub mod definition;
pub mod engine;
pub mod error;
pub mod view;

pub use cache::{GroupBucket, GroupBuckets, MeasureAccumulator};
pub use controller::PivotController;
pub use definition::*;
pub use engine::{aggregate, aggregate_schema, drill_down, PivotAggregator};
pub use error::PivotError;
pub use view::*;
