//! Building a native table from a detected grid.

use crate::error::{GridError, Result};
use crate::geometry::Geometry;
use crate::host::{Operation, StyleTarget, Surface};
use crate::layout::Grid;
use crate::report::Summary;

use super::style_copy::copy_text_and_style;

/// Rectangle from the top-left member's top-left corner to the bottom-right
/// member's bottom-right corner.
///
/// Jagged grids can put the last member of the last row left of or above
/// the first member; the overall bounds are used then.
pub fn table_frame(grid: &Grid) -> Geometry {
    let first = grid.get(0, 0).map(|e| e.geometry);
    let last = grid.rows().last().and_then(|r| r.last()).map(|e| e.geometry);
    match (first, last) {
        (Some(a), Some(b)) if b.right() > a.left && b.bottom() > a.top => {
            Geometry::from_corners(a.left, a.top, b.right(), b.bottom())
        }
        _ => grid.bounds(),
    }
}

/// Replaces the grid's elements with a Rows x Columns table.
///
/// Cells are filled one by one; a cell that cannot be copied is logged and
/// left empty. Source elements are deleted only after every cell has been
/// attempted.
pub fn elements_to_table<S: Surface + ?Sized>(surface: &mut S, grid: &Grid) -> Result<Summary> {
    let rows = grid.row_count();
    let cols = grid.column_count();
    if rows == 0 || cols == 0 {
        return Err(GridError::precondition("nothing to convert"));
    }
    let frame = table_frame(grid);
    let table = surface.create_table(rows, cols, frame)?;

    let mut summary = Summary::new(Operation::ElementsToTable);
    summary.rows = rows;
    summary.columns = cols;
    summary.created.push(table);

    for (row, col, e) in grid.iter() {
        let dst = StyleTarget::Cell { table, row, col };
        match copy_text_and_style(surface, StyleTarget::Element(e.id), dst) {
            Ok(rejected) => {
                for part in rejected {
                    summary.fail(
                        format!("cell ({row}, {col}) {part}"),
                        &GridError::host("set_style", "attribute rejected"),
                    );
                }
            }
            Err(err) => summary.fail(format!("cell ({row}, {col})"), &err),
        }
    }

    for id in grid.ids() {
        match surface.delete(id) {
            Ok(()) => summary.deleted += 1,
            Err(err) => summary.fail(format!("source element {id}"), &err),
        }
    }
    tracing::debug!(%table, rows, cols, "grid converted to table");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementId, ElementRef};

    fn el(id: u64, left: f64, top: f64) -> ElementRef {
        ElementRef::new(ElementId(id), Geometry::new(left, top, 10.0, 10.0))
    }

    #[test]
    fn frame_spans_corner_elements() {
        let grid = Grid::from_rows(vec![
            vec![el(1, 0.0, 0.0), el(2, 20.0, 0.0)],
            vec![el(3, 0.0, 20.0), el(4, 20.0, 20.0)],
        ])
        .unwrap();
        assert_eq!(table_frame(&grid), Geometry::new(0.0, 0.0, 30.0, 30.0));
    }

    #[test]
    fn missing_sources_are_recorded_not_fatal() {
        use crate::host::MemorySurface;

        let mut surface = MemorySurface::new();
        let grid = Grid::from_rows(vec![vec![el(1, 0.0, 0.0)]]).unwrap();
        let summary = elements_to_table(&mut surface, &grid).unwrap();
        assert_eq!((summary.rows, summary.columns), (1, 1));
        assert_eq!(summary.created.len(), 1);
        assert_eq!(summary.deleted, 0);
        assert!(!summary.failures.is_empty());
    }

    #[test]
    fn degenerate_corner_falls_back_to_bounds() {
        let grid = Grid::from_rows(vec![vec![el(1, 50.0, 0.0)], vec![el(2, 0.0, 20.0)]]).unwrap();
        assert_eq!(table_frame(&grid), Geometry::new(0.0, 0.0, 60.0, 30.0));
    }
}
