//! FILENAME: treemap-engine/tests/common/mod.rs
//! Fixtures for treemap pipeline integration tests.

#![allow(dead_code)]

use pivot_engine::DimensionSchema;
use records::{RecordSet, SalesRecord};
use treemap_engine::LayoutRect;

// ============================================================================
// FIXTURES
// ============================================================================

/// Sales data shaped like the dashboard feed.
pub struct SalesFixture;

impl SalesFixture {
    /// (year, company, country, person, value, qty)
    pub fn data() -> Vec<(u32, &'static str, &'static str, &'static str, f64, f64)> {
        vec![
            (2020, "Acme", "SE", "Anna", 1200.0, 12.0),
            (2020, "Acme", "NO", "Bjorn", 800.0, 8.0),
            (2020, "Globex", "SE", "Anna", 1500.0, 15.0),
            (2020, "Globex", "DK", "Carl", 500.0, 5.0),
            (2021, "Acme", "SE", "Dora", 900.0, 9.0),
            (2021, "Initech", "FI", "Emil", 2100.0, 21.0),
            (2021, "Globex", "NO", "Bjorn", 700.0, 7.0),
            (2022, "Initech", "FI", "Emil", 1800.0, 18.0),
            (2022, "Acme", "DK", "Carl", 300.0, 3.0),
        ]
    }

    pub fn records() -> RecordSet {
        let records = Self::data()
            .into_iter()
            .map(|(year, company, country, person, value, qty)| {
                SalesRecord::new(value, qty)
                    .with_year(year)
                    .with_company(company)
                    .with_country(country)
                    .with_person(person)
            })
            .collect();
        RecordSet::new(records)
    }

    pub fn total_value() -> f64 {
        Self::data().iter().map(|row| row.4).sum()
    }

    pub fn schema(names: &[&str]) -> DimensionSchema {
        DimensionSchema::from_names(names).unwrap()
    }
}

// ============================================================================
// ASSERTION HELPERS
// ============================================================================

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} +/- {} but got {}",
        expected,
        tolerance,
        actual
    );
}

/// Asserts `inner` lies within `outer`.
pub fn assert_nested(inner: &LayoutRect, outer: &LayoutRect) {
    let eps = 1e-9;
    assert!(
        inner.x0 >= outer.x0 - eps
            && inner.y0 >= outer.y0 - eps
            && inner.x1 <= outer.x1 + eps
            && inner.y1 <= outer.y1 + eps,
        "{:?} escapes {:?}",
        inner.path,
        outer.path
    );
}

/// Finds the rectangle of the node at `path`.
pub fn rect_at<'a>(rects: &'a [LayoutRect], path: &[u32]) -> &'a LayoutRect {
    rects
        .iter()
        .find(|r| r.path.as_slice() == path)
        .unwrap_or_else(|| panic!("no rectangle for path {:?}", path))
}
