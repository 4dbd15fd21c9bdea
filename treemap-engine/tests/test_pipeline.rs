//! FILENAME: treemap-engine/tests/test_pipeline.rs
//! Integration tests for the records -> tree -> rectangles pipeline.

mod common;

use common::{assert_close, assert_nested, rect_at, SalesFixture};
use pivot_engine::{aggregate, leaf_record_total, DimensionSchema};
use records::{RecordSet, SalesRecord};
use treemap_engine::{
    layout, layout_with, resolve, resolve_region, Bounds, LayoutRect, Point, TilingMethod,
    TreemapOptions, TreemapSession,
};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn session(dimensions: &[&str], options: TreemapOptions) -> TreemapSession {
    let mut session = TreemapSession::new(
        SalesFixture::records(),
        SalesFixture::schema(dimensions),
        options,
    );
    session.set_canvas(800.0, 600.0);
    session
}

fn parent_of<'a>(rects: &'a [LayoutRect], rect: &LayoutRect) -> &'a LayoutRect {
    rect_at(rects, &rect.path[..rect.path.len() - 1])
}

// ============================================================================
// LAYOUT TESTS
// ============================================================================

#[test]
fn test_two_groups_area_ratio() {
    let records = vec![
        SalesRecord::new(300.0, 1.0).with_company("A"),
        SalesRecord::new(100.0, 1.0).with_company("B"),
    ];
    let tree = aggregate(&records, &["company"]);

    let padded = layout(&tree, 400.0, 100.0);
    assert_close(padded[0].area() / padded[1].area(), 3.0, 0.1);

    let exact = layout_with(&tree, 400.0, 100.0, &TreemapOptions::unpadded());
    assert_close(exact[0].area() / exact[1].area(), 3.0, 1e-9);
    assert_close(exact[0].area() + exact[1].area(), 40_000.0, 1e-6);
}

#[test]
fn test_unpadded_areas_follow_values_at_every_level() {
    let s = session(&["year", "company"], TreemapOptions::unpadded());
    let rects = s.rects();
    let canvas_area = 800.0 * 600.0;
    let total = SalesFixture::total_value();

    for rect in rects.iter().filter(|r| r.depth == 0) {
        assert_close(rect.area() / canvas_area, rect.value / total, 1e-9);
    }

    for rect in rects.iter().filter(|r| r.depth == 1) {
        let parent = parent_of(rects, rect);
        let siblings: f64 = rects
            .iter()
            .filter(|r| r.depth == 1 && r.path[0] == rect.path[0])
            .map(|r| r.value)
            .sum();
        assert_close(rect.area() / parent.area(), rect.value / siblings, 1e-9);
        assert_nested(rect, parent);
    }
}

#[test]
fn test_children_nest_below_group_header() {
    let s = session(&["year", "company", "country"], TreemapOptions::default());
    let rects = s.rects();

    for rect in rects.iter().filter(|r| r.depth > 0) {
        let parent = parent_of(rects, rect);
        assert_nested(rect, parent);
        assert!(
            rect.y0 >= parent.y0 + 18.0 - 1e-9,
            "{:?} overlaps its parent's header",
            rect.path
        );
    }
}

#[test]
fn test_preorder_output() {
    let s = session(&["year", "company", "country"], TreemapOptions::default());
    let rects = s.rects();

    for (idx, rect) in rects.iter().enumerate() {
        assert_eq!(rect.depth, rect.path.len() - 1);
        if rect.depth > 0 {
            let parent_pos = rects
                .iter()
                .position(|r| r.path.as_slice() == &rect.path[..rect.path.len() - 1])
                .unwrap();
            assert!(parent_pos < idx);
        }
    }
}

#[test]
fn test_zero_and_negative_groups_have_no_area() {
    let records = vec![
        SalesRecord::new(10.0, 1.0).with_company("A"),
        SalesRecord::new(0.0, 1.0).with_company("B"),
        SalesRecord::new(-5.0, 1.0).with_company("C"),
    ];
    let tree = aggregate(&records, &["company"]);
    let rects = layout(&tree, 100.0, 100.0);

    assert_eq!(rects.len(), 3);
    assert_eq!(rects[0].name, "A");
    assert!(rects[0].area() > 0.0);
    assert_eq!(rect_at(&rects, &[1]).area(), 0.0);
    assert_eq!(rect_at(&rects, &[2]).area(), 0.0);
}

#[test]
fn test_missing_dimension_values_get_unknown_rect() {
    let records = vec![
        SalesRecord::new(10.0, 1.0).with_company("A"),
        SalesRecord::new(5.0, 1.0),
    ];
    let tree = aggregate(&records, &["company"]);
    let rects = layout(&tree, 100.0, 100.0);

    assert!(rects.iter().any(|r| r.name == "Unknown" && r.area() > 0.0));
}

#[test]
fn test_slice_dice_alternates_by_depth() {
    let options = TreemapOptions::unpadded().with_tiling(TilingMethod::SliceDice);
    let s = session(&["year", "company"], options);
    let rects = s.rects();

    for rect in rects.iter().filter(|r| r.depth == 0) {
        assert_close(rect.y0, 0.0, 1e-9);
        assert_close(rect.y1, 600.0, 1e-9);
    }
    for rect in rects.iter().filter(|r| r.depth == 1) {
        let parent = parent_of(rects, rect);
        assert_close(rect.x0, parent.x0, 1e-9);
        assert_close(rect.x1, parent.x1, 1e-9);
    }
}

// ============================================================================
// SESSION TESTS
// ============================================================================

#[test]
fn test_leaf_counts_cover_all_records() {
    let s = session(&["year", "company", "country", "person"], TreemapOptions::default());

    assert_eq!(leaf_record_total(s.tree()), SalesFixture::records().len());
}

#[test]
fn test_reorder_regroups_layout() {
    let mut s = session(&["year", "company"], TreemapOptions::default());
    s.reorder(&["company", "year"]).unwrap();

    let top: Vec<&str> = s
        .rects()
        .iter()
        .filter(|r| r.depth == 0)
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(top, vec!["Initech", "Acme", "Globex"]);
}

#[test]
fn test_toggle_round_trip_restores_layout() {
    let mut s = session(&["year", "company", "country"], TreemapOptions::default());
    let before = s.rects().to_vec();

    s.toggle("company").unwrap();
    assert!(s.rects().iter().all(|r| r.depth < 2));

    s.toggle("company").unwrap();
    assert_eq!(s.schema().active_names(), vec!["year", "company", "country"]);
    assert_eq!(s.rects(), before.as_slice());
}

#[test]
fn test_select_and_drill_down() {
    let mut s = session(&["year", "company"], TreemapOptions::default());
    let center = rect_at(s.rects(), &[0, 1]).center();

    let node = resolve(center, s.rects(), s.tree()).unwrap();
    assert_eq!(node.name, "Globex");

    let sel = s.select_at(center).unwrap().clone();
    assert_eq!(sel.breadcrumb(), "2020 > Globex");
    assert_eq!(sel.value, 2000.0);
    assert_eq!(sel.record_count, 2);

    let total: f64 = s.selected_records().iter().map(|r| r.value).sum();
    assert_close(total, 2000.0, 1e-9);

    let drill = sel.drill_down(1);
    assert_eq!(drill.total_count, 2);
    assert!(drill.is_truncated);
    assert_eq!(drill.source_rows.len(), 1);
    assert_eq!(drill.dimensions, vec!["year", "company"]);
}

#[test]
fn test_region_selects_deepest_rects() {
    let s = session(&["year", "company"], TreemapOptions::default());

    let picked = resolve_region(Bounds::new(0.0, 0.0, 800.0, 600.0), s.rects());
    assert_eq!(picked.len(), 7);
    assert!(picked.iter().all(|r| r.depth == 1));
}

#[test]
fn test_empty_feed() {
    let mut s = TreemapSession::new(
        RecordSet::default(),
        DimensionSchema::default(),
        TreemapOptions::default(),
    );
    s.set_canvas(800.0, 600.0);

    assert!(s.tree().is_empty());
    assert!(s.rects().is_empty());
    assert!(s.select_at(Point::new(10.0, 10.0)).is_none());
}

// ============================================================================
// CONFIGURATION TESTS
// ============================================================================

#[test]
fn test_json_configuration_drives_session() {
    let feed = r#"[
        {"year": 2020, "company": "A", "value": 30},
        {"year": "2021", "company": "B", "value": 10}
    ]"#;
    let schema = r#"[{"name": "company", "order": 1}]"#;
    let options = r#"{"tiling": "Slice", "padding_outer": 0, "padding_top": 0, "padding_inner": 0}"#;

    let mut s = TreemapSession::new(
        RecordSet::from_json(feed).unwrap(),
        serde_json::from_str(schema).unwrap(),
        serde_json::from_str(options).unwrap(),
    );
    s.set_canvas(100.0, 200.0);

    assert_eq!(s.rects().len(), 2);
    for rect in s.rects() {
        assert_close(rect.x0, 0.0, 1e-9);
        assert_close(rect.x1, 100.0, 1e-9);
    }
    assert_close(s.rects()[0].height(), 150.0, 1e-9);

    let json = serde_json::to_string(s.rects()).unwrap();
    let back: Vec<LayoutRect> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, s.rects());
}
