//! FILENAME: records/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Malformed record feed: {0}")]
    Json(#[from] serde_json::Error),
}
