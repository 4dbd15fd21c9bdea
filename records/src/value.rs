//! FILENAME: records/src/value.rs
//! PURPOSE: Normalized, hashable representation of a categorical field value.
//! CONTEXT: Grouping keys are built from these values, so they must implement
//! Eq and Hash even when the underlying data is a float.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Label used for records whose dimension value is missing or unknown.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// A normalized, hashable representation of a dimension value.
/// Used as the grouping key at each pivot level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldValue {
    Empty,
    Number(OrderedFloat),
    Text(String),
}

impl FieldValue {
    pub fn number(n: f64) -> Self {
        FieldValue::Number(OrderedFloat(n))
    }

    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }

    /// Display label for this value. Empty values map to the "Unknown" group.
    pub fn label(&self) -> String {
        match self {
            FieldValue::Empty => UNKNOWN_LABEL.to_string(),
            FieldValue::Number(n) => format!("{}", n.as_f64()),
            FieldValue::Text(s) => s.clone(),
        }
    }

    /// Total ordering used for sorting group keys.
    /// Empty sorts first, then numbers, then text.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Empty, FieldValue::Empty) => Ordering::Equal,
            (FieldValue::Empty, _) => Ordering::Less,
            (_, FieldValue::Empty) => Ordering::Greater,

            (FieldValue::Number(a), FieldValue::Number(b)) => a.cmp(b),
            (FieldValue::Number(_), _) => Ordering::Less,
            (_, FieldValue::Number(_)) => Ordering::Greater,

            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Empty
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl From<Option<u32>> for FieldValue {
    fn from(value: Option<u32>) -> Self {
        match value {
            Some(n) => FieldValue::number(n as f64),
            None => FieldValue::Empty,
        }
    }
}

impl From<Option<&String>> for FieldValue {
    fn from(value: Option<&String>) -> Self {
        match value {
            // Blank strings carry no grouping information
            Some(s) if !s.trim().is_empty() => FieldValue::Text(s.clone()),
            _ => FieldValue::Empty,
        }
    }
}

/// Wrapper around f64 that implements Eq and Hash for use as HashMap keys.
/// NaN values are treated as equal to each other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            u64::MAX.hash(state);
        } else if self.0 == 0.0 {
            // -0.0 == 0.0, so both must hash alike
            0u64.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

impl PartialOrd for OrderedFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Total order agreeing with `Eq`: -0.0 equals 0.0, NaN sorts after
/// everything else and equals any other NaN.
impl Ord for OrderedFloat {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical().total_cmp(&other.canonical())
    }
}

impl OrderedFloat {
    pub fn as_f64(&self) -> f64 {
        self.0
    }

    fn canonical(&self) -> f64 {
        if self.0.is_nan() {
            f64::NAN
        } else if self.0 == 0.0 {
            0.0
        } else {
            self.0
        }
    }
}
