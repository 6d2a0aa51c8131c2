//! Grid detection over loosely placed elements.

use mosaic_core::geometry::{Axis, Geometry};
use mosaic_core::layout::{cluster_axis, tolerance};
use mosaic_core::model::{ElementId, ElementRef};
use mosaic_core::{EngineConfig, detect_grid};

fn refs(geoms: &[(f64, f64, f64, f64)]) -> Vec<ElementRef> {
    geoms
        .iter()
        .enumerate()
        .map(|(i, &(l, t, w, h))| ElementRef::new(ElementId(i as u64 + 1), Geometry::new(l, t, w, h)))
        .collect()
}

#[test]
fn test_two_by_three_grid() {
    let items = refs(&[
        (250.0, 220.0, 80.0, 60.0),
        (50.0, 100.0, 80.0, 60.0),
        (150.0, 220.0, 80.0, 60.0),
        (250.0, 100.0, 80.0, 60.0),
        (50.0, 220.0, 80.0, 60.0),
        (150.0, 100.0, 80.0, 60.0),
    ]);
    let grid = detect_grid(&items, &EngineConfig::default()).unwrap();
    assert_eq!(grid.row_count(), 2);
    assert_eq!(grid.column_count(), 3);
    assert!(grid.is_rectangular());
    let first = grid.get(0, 0).unwrap();
    assert_eq!((first.geometry.left, first.geometry.top), (50.0, 100.0));
    insta::assert_snapshot!(grid.to_string(), @r"
    row 0: #2@(50, 100) #6@(150, 100) #4@(250, 100)
    row 1: #5@(50, 220) #3@(150, 220) #1@(250, 220)
    ");
}

#[test]
fn test_well_separated_tops_give_one_row_each() {
    let config = EngineConfig::default();
    let tops = [0.0, 70.0, 140.0, 210.0, 280.0];
    let mut geoms = Vec::new();
    for (i, top) in tops.iter().enumerate() {
        // Reverse left order inside each row to check sorting.
        geoms.push((200.0 - i as f64, *top, 40.0, 40.0));
        geoms.push((10.0 + i as f64, *top, 40.0, 40.0));
    }
    let items = refs(&geoms);
    let tol = tolerance(&items.iter().map(|e| e.geometry).collect::<Vec<_>>(), Axis::Rows, &config);
    assert!(70.0 > 2.0 * tol);

    let rows = cluster_axis(&items, Axis::Rows, &config);
    assert_eq!(rows.len(), tops.len());
    for row in &rows {
        assert!(row.windows(2).all(|w| w[0].geometry.left <= w[1].geometry.left));
    }
}

#[test]
fn test_small_vertical_jitter_stays_in_row() {
    let items = refs(&[
        (0.0, 100.0, 80.0, 60.0),
        (100.0, 104.0, 80.0, 60.0),
        (200.0, 97.0, 80.0, 60.0),
    ]);
    let grid = detect_grid(&items, &EngineConfig::default()).unwrap();
    assert_eq!(grid.row_count(), 1);
    assert_eq!(grid.column_count(), 3);
}

#[test]
fn test_jagged_rows_are_kept() {
    let items = refs(&[
        (0.0, 0.0, 50.0, 30.0),
        (60.0, 0.0, 50.0, 30.0),
        (120.0, 0.0, 50.0, 30.0),
        (0.0, 100.0, 50.0, 30.0),
    ]);
    let grid = detect_grid(&items, &EngineConfig::default()).unwrap();
    assert_eq!(grid.row_count(), 2);
    assert_eq!(grid.column_count(), 3);
    assert!(!grid.is_rectangular());
    assert!(grid.get(1, 1).is_none());
}

#[test]
fn test_tolerance_bounds() {
    let config = EngineConfig::default();
    assert_eq!(tolerance(&[], Axis::Rows, &config), 10.0);

    let tiny = [Geometry::new(0.0, 0.0, 1.0, 1.0)];
    assert_eq!(tolerance(&tiny, Axis::Rows, &config), 3.0);

    let huge = [Geometry::new(0.0, 0.0, 1000.0, 1000.0)];
    assert_eq!(tolerance(&huge, Axis::Columns, &config), 25.0);

    let mid = [Geometry::new(0.0, 0.0, 10.0, 40.0), Geometry::new(0.0, 0.0, 10.0, 20.0)];
    assert!((tolerance(&mid, Axis::Rows, &config) - 9.0).abs() < 1e-9);
}

#[test]
fn test_single_element_is_not_a_grid() {
    let items = refs(&[(0.0, 0.0, 10.0, 10.0)]);
    assert!(detect_grid(&items, &EngineConfig::default()).is_none());
}
