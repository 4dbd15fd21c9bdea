//! FILENAME: records/src/lib.rs
//! PURPOSE: Shared record model for the pivot and treemap engines.
//! CONTEXT: Re-exports the raw record, its container and the dimension
//! accessor table.

pub mod error;
pub mod fields;
pub mod record;
pub mod value;

pub use error::RecordError;
pub use fields::{accessor, extract, is_known_dimension, known_dimensions, Accessor};
pub use record::{RecordSet, SalesRecord};
pub use value::{FieldValue, OrderedFloat, UNKNOWN_LABEL};
