//! FILENAME: records/src/fields.rs
//! PURPOSE: Lookup table from dimension name to field accessor.
//! CONTEXT: Adding a grouping dimension is a table edit here. Unknown names
//! resolve to no accessor and callers route them to the "Unknown" group.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::record::SalesRecord;
use crate::value::FieldValue;

/// Extracts a dimension's grouping key from a record.
pub type Accessor = fn(&SalesRecord) -> FieldValue;

/// Canonical order of the known dimensions.
const DIMENSIONS: &[(&str, Accessor)] = &[
    ("year", |r| FieldValue::from(r.year)),
    ("company", |r| FieldValue::from(r.company.as_ref())),
    ("country", |r| FieldValue::from(r.country.as_ref())),
    ("person", |r| FieldValue::from(r.person.as_ref())),
    ("month", |r| FieldValue::from(r.month)),
];

static ACCESSORS: Lazy<FxHashMap<&'static str, Accessor>> =
    Lazy::new(|| DIMENSIONS.iter().copied().collect());

/// Returns the accessor for a dimension name, if it is known.
pub fn accessor(name: &str) -> Option<Accessor> {
    ACCESSORS.get(name).copied()
}

/// Names of all known dimensions, in canonical order.
pub fn known_dimensions() -> impl Iterator<Item = &'static str> {
    DIMENSIONS.iter().map(|(name, _)| *name)
}

pub fn is_known_dimension(name: &str) -> bool {
    ACCESSORS.contains_key(name)
}

/// Extracts a dimension value; unknown names yield `FieldValue::Empty`.
pub fn extract(name: &str, record: &SalesRecord) -> FieldValue {
    match accessor(name) {
        Some(get) => get(record),
        None => FieldValue::Empty,
    }
}
