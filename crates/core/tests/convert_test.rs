//! Conversion between native tables and free elements.

use mosaic_core::geometry::Geometry;
use mosaic_core::host::StyleTarget;
use mosaic_core::model::{Color, ElementId, ElementKind, StylePart};
use mosaic_core::{Engine, GridError, MemorySurface, Surface};

fn cell(table: ElementId, row: usize, col: usize) -> StyleTarget {
    StyleTarget::Cell { table, row, col }
}

fn labelled_table(s: &mut MemorySurface) -> ElementId {
    let t = s.add_table(0.0, 0.0, &[40.0, 50.0], &[60.0, 70.0]);
    for (row, col, text) in [(0, 0, "a"), (0, 1, "b"), (1, 0, "c"), (1, 1, "d")] {
        s.set_text(cell(t, row, col), text).unwrap();
    }
    t
}

#[test]
fn test_table_to_elements_follows_cell_geometry() {
    let mut s = MemorySurface::new();
    let t = labelled_table(&mut s);
    s.select(&[t]);

    let mut engine = Engine::new(s);
    let summary = engine.table_to_elements().unwrap();
    assert!(summary.is_clean());
    assert_eq!(summary.deleted, 1);

    let s = engine.surface();
    assert!(s.get(t).is_none());
    let geoms: Vec<Geometry> = summary.created.iter().map(|id| s.geometry(*id).unwrap()).collect();
    assert_eq!(
        geoms,
        vec![
            Geometry::new(0.0, 0.0, 60.0, 40.0),
            Geometry::new(60.0, 0.0, 70.0, 40.0),
            Geometry::new(0.0, 40.0, 60.0, 50.0),
            Geometry::new(60.0, 40.0, 70.0, 50.0),
        ]
    );
    assert_eq!(s.get(summary.created[3]).unwrap().text, "d");
    assert_eq!(s.get(summary.created[0]).unwrap().kind, ElementKind::TextFrame);
}

#[test]
fn test_round_trip_keeps_shape_and_text() {
    let mut s = MemorySurface::new();
    let t = labelled_table(&mut s);
    s.set_style_part(cell(t, 1, 0), StylePart::Font(mosaic_core::model::FontStyle {
        bold: true,
        ..Default::default()
    }))
    .unwrap();
    s.select(&[t]);
    let mut engine = Engine::new(s);
    let elements = engine.table_to_elements().unwrap().created;

    engine.surface_mut().select(&elements);
    let summary = engine.elements_to_table().unwrap();
    assert_eq!((summary.rows, summary.columns), (2, 2));
    assert_eq!(summary.deleted, 4);

    let s = engine.surface();
    let table = summary.created[0];
    assert_eq!(s.table_size(table).unwrap(), (2, 2));
    let texts: Vec<String> = [(0, 0), (0, 1), (1, 0), (1, 1)]
        .iter()
        .map(|&(r, c)| s.text(cell(table, r, c)).unwrap())
        .collect();
    assert_eq!(texts, ["a", "b", "c", "d"]);
    assert!(s.style(cell(table, 1, 0)).unwrap().font.bold);
    assert_eq!(s.len(), 1);
}

#[test]
fn test_failed_conversion_leaves_table_untouched() {
    let mut s = MemorySurface::new();
    let t = labelled_table(&mut s);
    s.faults_mut().create_budget = Some(2);
    s.select(&[t]);

    let mut engine = Engine::new(s);
    let err = engine.table_to_elements().unwrap_err();
    assert!(matches!(err, GridError::Host { .. }));
    let s = engine.surface();
    assert_eq!(s.len(), 1);
    assert!(s.get(t).is_some());
}

#[test]
fn test_batch_rolls_back_only_the_failing_table() {
    let mut s = MemorySurface::new();
    let first = s.add_table(0.0, 0.0, &[20.0, 20.0], &[30.0, 30.0]);
    let second = s.add_table(0.0, 100.0, &[20.0, 20.0], &[30.0, 30.0]);
    s.faults_mut().create_budget = Some(5);
    s.select(&[first, second]);

    let mut engine = Engine::new(s);
    let summary = engine.table_to_elements().unwrap();
    assert_eq!(summary.created.len(), 4);
    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].unit.contains(&second.to_string()));

    let s = engine.surface();
    assert!(s.get(first).is_none());
    assert!(s.get(second).is_some());
    assert_eq!(s.len(), 5);
}

#[test]
fn test_rejected_cell_style_does_not_stop_conversion() {
    let mut s = MemorySurface::new();
    let mut ids = Vec::new();
    for (l, t) in [(0.0, 0.0), (100.0, 0.0), (0.0, 100.0), (100.0, 100.0)] {
        let id = s.add_text(Geometry::new(l, t, 80.0, 60.0), "x");
        s.set_style_part(StyleTarget::Element(id), StylePart::Fill(mosaic_core::model::FillStyle {
            color: Color::rgb(200, 0, 0),
            ..Default::default()
        }))
        .unwrap();
        ids.push(id);
    }
    // The next id the surface hands out belongs to the new table.
    let table = ElementId(5);
    s.faults_mut().style.insert(cell(table, 0, 1));
    s.select(&ids);

    let mut engine = Engine::new(s);
    let summary = engine.elements_to_table().unwrap();
    assert_eq!(summary.created, vec![table]);
    assert!(!summary.is_clean());
    assert!(summary.failures.iter().all(|f| f.unit.starts_with("cell (0, 1)")));

    let s = engine.surface();
    assert_eq!(s.text(cell(table, 0, 1)).unwrap(), "x");
    assert_eq!(s.style(cell(table, 1, 1)).unwrap().fill.color, Color::rgb(200, 0, 0));
    assert_eq!(s.len(), 1);
}

#[test]
fn test_selection_without_table_is_refused() {
    let mut s = MemorySurface::new();
    let a = s.add_shape(Geometry::new(0.0, 0.0, 10.0, 10.0));
    s.select(&[a]);
    let mut engine = Engine::new(s);
    assert!(engine.table_to_elements().unwrap_err().is_precondition());
    assert_eq!(engine.surface().len(), 1);
}
