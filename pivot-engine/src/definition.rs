//! FILENAME: pivot-engine/src/definition.rs
//! Dimension Schema - The serializable grouping configuration.
//!
//! This module contains the types needed to DESCRIBE a pivot hierarchy.
//! These structures are designed to be:
//! - Serializable (for saving and for the host bridge)
//! - Immutable snapshots of user intent: every mutation returns a new schema
//!   value, so a committed configuration never aliases in-flight drag state.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::PivotError;

// ============================================================================
// SORTING
// ============================================================================

/// Order of the groups produced by one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Keep order of first appearance in the records.
    DataSourceOrder,
    Ascending,
    Descending,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::DataSourceOrder
    }
}

/// Explicit whole-tree sibling ordering applied after aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiblingSort {
    /// Largest value first, ties broken by name.
    ValueDescending,
    NameAscending,
}

impl Default for SiblingSort {
    fn default() -> Self {
        SiblingSort::ValueDescending
    }
}

// ============================================================================
// DIMENSION DESCRIPTOR
// ============================================================================

/// A grouping dimension (e.g. year, company) and its place in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionDescriptor {
    /// Dimension name, used to look up the field accessor.
    pub name: String,

    /// Sort order for this dimension's groups.
    #[serde(default)]
    pub direction: SortOrder,

    /// 1-based position in the hierarchy (1 = outermost).
    pub order: u32,

    /// Whether this dimension participates in grouping.
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl DimensionDescriptor {
    pub fn new(name: impl Into<String>, order: u32) -> Self {
        DimensionDescriptor {
            name: name.into(),
            direction: SortOrder::DataSourceOrder,
            order,
            active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn with_direction(mut self, direction: SortOrder) -> Self {
        self.direction = direction;
        self
    }
}

// ============================================================================
// DIMENSION SCHEMA
// ============================================================================

/// The ordered set of dimension descriptors.
/// Descriptors are kept sorted by `order`, and orders always form 1..N.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<DimensionDescriptor>",
    into = "Vec<DimensionDescriptor>"
)]
pub struct DimensionSchema {
    descriptors: Arc<[DimensionDescriptor]>,
}

impl DimensionSchema {
    /// Creates a schema, validating names and order indices.
    pub fn new(mut descriptors: Vec<DimensionDescriptor>) -> Result<Self, PivotError> {
        if descriptors.is_empty() {
            return Err(PivotError::InvalidSchema(
                "schema has no dimensions".to_string(),
            ));
        }

        {
            let mut seen = FxHashSet::default();
            for d in &descriptors {
                if !seen.insert(d.name.as_str()) {
                    return Err(PivotError::DuplicateDimension(d.name.clone()));
                }
            }
        }

        descriptors.sort_by_key(|d| d.order);
        for (idx, d) in descriptors.iter().enumerate() {
            if d.order != idx as u32 + 1 {
                return Err(PivotError::InvalidSchema(format!(
                    "order indices must form 1..{}, found {} for '{}'",
                    descriptors.len(),
                    d.order,
                    d.name
                )));
            }
        }

        Ok(DimensionSchema {
            descriptors: descriptors.into(),
        })
    }

    /// Creates a schema from names, all active, in the given order.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, PivotError> {
        let descriptors = names
            .iter()
            .enumerate()
            .map(|(idx, n)| DimensionDescriptor::new(n.as_ref(), idx as u32 + 1))
            .collect();
        DimensionSchema::new(descriptors)
    }

    /// All descriptors, sorted by order.
    pub fn descriptors(&self) -> &[DimensionDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&DimensionDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// All dimension names, in order.
    pub fn names(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.name.as_str()).collect()
    }

    /// Active descriptors, in order.
    pub fn active_in_order(&self) -> Vec<&DimensionDescriptor> {
        self.descriptors.iter().filter(|d| d.active).collect()
    }

    /// Active dimension names, in order.
    pub fn active_names(&self) -> Vec<&str> {
        self.descriptors
            .iter()
            .filter(|d| d.active)
            .map(|d| d.name.as_str())
            .collect()
    }

    /// Returns a new schema with `name`'s active flag flipped.
    /// Order indices are untouched, so toggling off and on again restores the
    /// previous active order. The last active dimension cannot be turned off.
    pub fn toggle(&self, name: &str) -> Result<DimensionSchema, PivotError> {
        let target = self
            .get(name)
            .ok_or_else(|| PivotError::UnknownDimension(name.to_string()))?;

        if target.active && self.descriptors.iter().filter(|d| d.active).count() == 1 {
            return Err(PivotError::NoActiveDimension);
        }

        let descriptors = self
            .descriptors
            .iter()
            .map(|d| {
                let mut d = d.clone();
                if d.name == name {
                    d.active = !d.active;
                }
                d
            })
            .collect::<Vec<_>>();

        Ok(DimensionSchema {
            descriptors: descriptors.into(),
        })
    }

    /// Returns a new schema with order indices reassigned 1..N by position in
    /// `names`. `names` must be a permutation of every known dimension.
    pub fn reorder<S: AsRef<str>>(&self, names: &[S]) -> Result<DimensionSchema, PivotError> {
        if names.len() != self.descriptors.len() {
            return Err(PivotError::InvalidDimensionOrder {
                reason: format!(
                    "expected {} dimensions, got {}",
                    self.descriptors.len(),
                    names.len()
                ),
            });
        }

        let mut seen = FxHashSet::default();
        let mut descriptors = Vec::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            let name = name.as_ref();
            let current = self.get(name).ok_or_else(|| PivotError::InvalidDimensionOrder {
                reason: format!("unknown dimension '{}'", name),
            })?;
            if !seen.insert(name) {
                return Err(PivotError::InvalidDimensionOrder {
                    reason: format!("dimension '{}' listed twice", name),
                });
            }
            let mut d = current.clone();
            d.order = idx as u32 + 1;
            descriptors.push(d);
        }

        Ok(DimensionSchema {
            descriptors: descriptors.into(),
        })
    }

    /// Returns a new schema with `name`'s group sort order replaced.
    pub fn set_direction(
        &self,
        name: &str,
        direction: SortOrder,
    ) -> Result<DimensionSchema, PivotError> {
        if self.get(name).is_none() {
            return Err(PivotError::UnknownDimension(name.to_string()));
        }

        let descriptors = self
            .descriptors
            .iter()
            .map(|d| {
                let mut d = d.clone();
                if d.name == name {
                    d.direction = direction;
                }
                d
            })
            .collect::<Vec<_>>();

        Ok(DimensionSchema {
            descriptors: descriptors.into(),
        })
    }
}

impl Default for DimensionSchema {
    fn default() -> Self {
        let descriptors: Vec<DimensionDescriptor> = vec![
            DimensionDescriptor::new("year", 1),
            DimensionDescriptor::new("company", 2),
            DimensionDescriptor::new("country", 3),
            DimensionDescriptor::new("person", 4),
            DimensionDescriptor::new("month", 5).inactive(),
        ];
        DimensionSchema {
            descriptors: descriptors.into(),
        }
    }
}

impl TryFrom<Vec<DimensionDescriptor>> for DimensionSchema {
    type Error = PivotError;

    fn try_from(descriptors: Vec<DimensionDescriptor>) -> Result<Self, Self::Error> {
        DimensionSchema::new(descriptors)
    }
}

impl From<DimensionSchema> for Vec<DimensionDescriptor> {
    fn from(schema: DimensionSchema) -> Self {
        schema.descriptors.to_vec()
    }
}
