//! Row, column, header and separator edits.

use mosaic_core::geometry::Geometry;
use mosaic_core::host::{SeparatorTags, StyleTarget};
use mosaic_core::model::{ElementId, ElementKind};
use mosaic_core::{Engine, EngineConfig, GridError, MemorySurface, Surface};

/// `rows x cols` shapes of 80x60, 100pt apart, all selected.
fn grid_surface(rows: usize, cols: usize) -> (MemorySurface, Vec<ElementId>) {
    let mut s = MemorySurface::new();
    let mut ids = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            ids.push(s.add_shape(Geometry::new(c as f64 * 100.0, r as f64 * 100.0, 80.0, 60.0)));
        }
    }
    s.select(&ids);
    (s, ids)
}

fn separator_geometry(s: &MemorySurface) -> Vec<Geometry> {
    SeparatorTags::for_surface(s, &EngineConfig::default())
        .find(s)
        .into_iter()
        .map(|(_, id)| s.geometry(id).unwrap())
        .collect()
}

#[test]
fn test_add_row_to_isolated_element_is_refused() {
    let mut s = MemorySurface::new();
    let only = s.add_shape(Geometry::new(10.0, 10.0, 50.0, 50.0));
    s.select(&[only]);
    let before = s.clone();

    let mut engine = Engine::new(s);
    let err = engine.add_row().unwrap_err();
    assert!(matches!(err, GridError::Precondition(_)));
    assert_eq!(engine.surface().nodes(), before.nodes());
}

#[test]
fn test_add_row_below_grid() {
    let (s, _) = grid_surface(2, 2);
    let mut engine = Engine::new(s);
    let summary = engine.add_row().unwrap();
    assert_eq!(summary.rows, 1);
    assert_eq!(summary.created.len(), 2);

    let s = engine.surface();
    let geoms: Vec<Geometry> = summary.created.iter().map(|id| s.geometry(*id).unwrap()).collect();
    assert_eq!(
        geoms,
        vec![Geometry::new(0.0, 200.0, 80.0, 60.0), Geometry::new(100.0, 200.0, 80.0, 60.0)]
    );
}

#[test]
fn test_add_column_right_of_grid() {
    let (s, _) = grid_surface(2, 2);
    let mut engine = Engine::new(s);
    let summary = engine.add_column().unwrap();
    assert_eq!(summary.columns, 1);

    let s = engine.surface();
    let lefts: Vec<f64> = summary.created.iter().map(|id| s.geometry(*id).unwrap().left).collect();
    assert_eq!(lefts, [200.0, 200.0]);
    let tops: Vec<f64> = summary.created.iter().map(|id| s.geometry(*id).unwrap().top).collect();
    assert_eq!(tops, [0.0, 100.0]);
}

#[test]
fn test_add_row_keeps_going_after_one_failure() {
    let (mut s, _) = grid_surface(2, 3);
    s.faults_mut().create_budget = Some(2);
    let mut engine = Engine::new(s);
    let summary = engine.add_row().unwrap();
    assert_eq!(summary.created.len(), 2);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.to_string(), "Add row: 1 rows, 2 elements created (1 skipped after errors)");
}

#[test]
fn test_add_row_to_table() {
    let mut s = MemorySurface::new();
    let t = s.add_table(0.0, 0.0, &[40.0, 50.0], &[60.0, 70.0]);
    s.select(&[t]);
    let mut engine = Engine::new(s);
    engine.add_row().unwrap();
    let s = engine.surface();
    assert_eq!(s.table_size(t).unwrap(), (3, 2));
    assert_eq!(s.row_height(t, 2).unwrap(), 50.0);
    assert_eq!(s.geometry(t).unwrap().height, 140.0);
}

#[test]
fn test_table_header_row() {
    let mut s = MemorySurface::new();
    let t = s.add_table(0.0, 0.0, &[40.0, 50.0], &[60.0, 70.0]);
    s.set_text(StyleTarget::Cell { table: t, row: 0, col: 0 }, "body").unwrap();
    s.select(&[t]);
    let mut engine = Engine::new(s);
    let summary = engine.add_header_row().unwrap();
    assert!(summary.is_clean());

    let s = engine.surface();
    assert_eq!(s.table_size(t).unwrap(), (3, 2));
    let header: Vec<String> = (0..2)
        .map(|col| s.text(StyleTarget::Cell { table: t, row: 0, col }).unwrap())
        .collect();
    assert_eq!(header, ["Header 1", "Header 2"]);
    assert_eq!(s.text(StyleTarget::Cell { table: t, row: 1, col: 0 }).unwrap(), "body");
}

#[test]
fn test_grid_header_sits_above_first_row() {
    let (s, _) = grid_surface(2, 2);
    let mut engine = Engine::new(s);
    let summary = engine.add_header_row().unwrap();
    assert_eq!(summary.created.len(), 3);

    let s = engine.surface();
    let labels = &summary.created[..2];
    let texts: Vec<&str> = labels.iter().map(|id| s.get(*id).unwrap().text.as_str()).collect();
    assert_eq!(texts, ["Header 1", "Header 2"]);
    for id in labels {
        let g = s.geometry(*id).unwrap();
        assert!(g.bottom() <= -EngineConfig::default().header_gap + 1e-9);
    }

    let line = s.get(summary.created[2]).unwrap();
    assert_eq!(line.kind, ElementKind::Line);
    assert_eq!(line.name.as_str(), "MosaicHeaderSeparator");
    let label = s.geometry(labels[0]).unwrap();
    assert!((line.geometry.top - (label.bottom() / 2.0)).abs() < 1e-9);
}

#[test]
fn test_separators_sit_in_row_gaps() {
    let (s, _) = grid_surface(3, 2);
    let mut engine = Engine::new(s);
    let summary = engine.create_separators().unwrap();
    assert_eq!(summary.created.len(), 2);
    assert_eq!(
        separator_geometry(engine.surface()),
        vec![Geometry::new(0.0, 80.0, 180.0, 0.0), Geometry::new(0.0, 180.0, 180.0, 0.0)]
    );
}

#[test]
fn test_realignment_is_idempotent() {
    let (s, _) = grid_surface(3, 2);
    let mut engine = Engine::new(s);
    engine.create_separators().unwrap();

    engine.realign_separators().unwrap();
    let first = separator_geometry(engine.surface());
    engine.realign_separators().unwrap();
    assert_eq!(separator_geometry(engine.surface()), first);

    // Creating again on the same grid realigns rather than stacking new lines.
    let again = engine.create_separators().unwrap();
    assert!(again.created.is_empty());
    assert_eq!(separator_geometry(engine.surface()), first);
}

#[test]
fn test_each_grid_keeps_its_own_separators() {
    let (mut s, left_grid) = grid_surface(3, 2);
    let mut right_grid = Vec::new();
    for r in 0..3 {
        for c in 0..2 {
            right_grid.push(s.add_shape(Geometry::new(500.0 + c as f64 * 100.0, r as f64 * 100.0, 80.0, 60.0)));
        }
    }
    s.select(&left_grid);
    let mut engine = Engine::new(s);
    let first = engine.create_separators().unwrap();
    assert_eq!(first.created.len(), 2);

    engine.surface_mut().select(&right_grid);
    let second = engine.create_separators().unwrap();
    assert_eq!(second.created.len(), 2);
    assert_eq!(second.modified, 0);
    assert_eq!(second.deleted, 0);

    let mut lines = separator_geometry(engine.surface());
    lines.sort_by(|a, b| a.left.total_cmp(&b.left).then(a.top.total_cmp(&b.top)));
    assert_eq!(
        lines,
        vec![
            Geometry::new(0.0, 80.0, 180.0, 0.0),
            Geometry::new(0.0, 180.0, 180.0, 0.0),
            Geometry::new(500.0, 80.0, 180.0, 0.0),
            Geometry::new(500.0, 180.0, 180.0, 0.0),
        ]
    );

    // Realigning the right grid leaves the left grid's lines where they are.
    let summary = engine.realign_separators().unwrap();
    assert_eq!(summary.modified, 2);
    assert_eq!(summary.deleted, 0);
    assert_eq!(separator_geometry(engine.surface()).len(), 4);
    for id in &first.created {
        assert_eq!(engine.surface().geometry(*id).unwrap().left, 0.0);
    }
}

#[test]
fn test_realign_follows_moved_rows() {
    let (s, ids) = grid_surface(3, 2);
    let mut engine = Engine::new(s);
    engine.create_separators().unwrap();

    for id in &ids[4..] {
        let g = engine.surface().geometry(*id).unwrap();
        engine.surface_mut().set_geometry(*id, g.with_position(g.left, g.top + 40.0)).unwrap();
    }
    let summary = engine.realign_separators().unwrap();
    assert_eq!(summary.modified, 2);
    let tops: Vec<f64> = separator_geometry(engine.surface()).iter().map(|g| g.top).collect();
    assert_eq!(tops, [80.0, 200.0]);
}

#[test]
fn test_missing_separator_triggers_redraw() {
    let (s, _) = grid_surface(3, 2);
    let mut engine = Engine::new(s);
    let created = engine.create_separators().unwrap().created;
    engine.surface_mut().delete(created[1]).unwrap();

    let summary = engine.realign_separators().unwrap();
    assert_eq!(summary.deleted, 1);
    assert_eq!(summary.created.len(), 2);
    assert_eq!(separator_geometry(engine.surface()).len(), 2);
}

#[test]
fn test_metadata_tags_are_used_when_available() {
    let (s, _) = grid_surface(2, 2);
    let mut engine = Engine::new(s.with_metadata(true));
    let created = engine.create_separators().unwrap().created;
    let node = engine.surface().get(created[0]).unwrap();
    assert_eq!(node.metadata.get("mosaic.separator").map(String::as_str), Some("1"));
}

#[test]
fn test_remove_separators_takes_header_line_too() {
    let (s, _) = grid_surface(3, 2);
    let mut engine = Engine::new(s);
    engine.create_separators().unwrap();
    engine.add_header_row().unwrap();
    let lines_before = engine.surface().ids_of_kind(ElementKind::Line).len();
    assert_eq!(lines_before, 3);

    let summary = engine.remove_separators().unwrap();
    assert_eq!(summary.deleted, 3);
    assert!(engine.surface().ids_of_kind(ElementKind::Line).is_empty());
}
