//! FILENAME: records/src/record.rs
//! PURPOSE: The raw sales/visit record and its immutable container.
//! CONTEXT: Records are fetched per query (year/filter change) by the host and
//! handed to the engine as a `RecordSet`. The engine only ever reads them; a
//! refresh replaces the whole set.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RecordError;

// ============================================================================
// RAW RECORD
// ============================================================================

/// A single flat transactional record.
/// Dimension fields are optional; measures default to zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Position in the feed (0-based). Assigned by `RecordSet`.
    #[serde(default)]
    pub source_row: u32,

    #[serde(default, deserialize_with = "lenient_u32")]
    pub year: Option<u32>,

    #[serde(default, deserialize_with = "lenient_u32")]
    pub month: Option<u32>,

    #[serde(default)]
    pub company: Option<String>,

    #[serde(default)]
    pub country: Option<String>,

    #[serde(default)]
    pub person: Option<String>,

    /// Primary measure (e.g. sales amount).
    #[serde(default)]
    pub value: f64,

    /// Secondary measure (e.g. quantity or visit count).
    #[serde(default)]
    pub qty: f64,
}

impl SalesRecord {
    pub fn new(value: f64, qty: f64) -> Self {
        SalesRecord {
            value,
            qty,
            ..SalesRecord::default()
        }
    }

    pub fn with_year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_person(mut self, person: impl Into<String>) -> Self {
        self.person = Some(person.into());
        self
    }
}

/// Feeds send year/month either as numbers or as numeric strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Integer(u32),
    Float(f64),
    Text(String),
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match raw {
        Some(NumberOrText::Integer(n)) => Some(n),
        Some(NumberOrText::Float(f)) if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => {
            Some(f as u32)
        }
        Some(NumberOrText::Float(_)) => None,
        Some(NumberOrText::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

// ============================================================================
// RECORD SET
// ============================================================================

/// Immutable, cheaply clonable container of raw records.
/// Cloning shares the underlying storage.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Arc<[SalesRecord]>,

    /// Bumped by the host on every refresh (used for staleness checks).
    version: u64,
}

impl RecordSet {
    /// Creates a record set. `source_row` is reassigned to each record's position.
    pub fn new(mut records: Vec<SalesRecord>) -> Self {
        for (idx, record) in records.iter_mut().enumerate() {
            record.source_row = idx as u32;
        }
        RecordSet {
            records: records.into(),
            version: 0,
        }
    }

    /// Parses a JSON array of records.
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        let records: Vec<SalesRecord> = serde_json::from_str(json)?;
        Ok(RecordSet::new(records))
    }

    /// Returns the same records tagged with a new version.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, source_row: u32) -> Option<&SalesRecord> {
        self.records.get(source_row as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SalesRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[SalesRecord] {
        &self.records
    }
}

impl From<Vec<SalesRecord>> for RecordSet {
    fn from(records: Vec<SalesRecord>) -> Self {
        RecordSet::new(records)
    }
}

impl Serialize for RecordSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RecordSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<SalesRecord>::deserialize(deserializer).map(RecordSet::new)
    }
}
