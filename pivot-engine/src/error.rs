//! FILENAME: pivot-engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PivotError {
    #[error("Invalid dimension order: {reason}")]
    InvalidDimensionOrder { reason: String },

    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),

    #[error("Duplicate dimension: {0}")]
    DuplicateDimension(String),

    #[error("At least one dimension must remain active")]
    NoActiveDimension,

    #[error("Invalid dimension schema: {0}")]
    InvalidSchema(String),
}
