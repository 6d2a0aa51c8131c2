//! Row and column insertion for tables and loose grids.

use crate::config::EngineConfig;
use crate::convert::style_copy::{copy_cell_format, copy_style};
use crate::error::{GridError, Result};
use crate::geometry::{Axis, Geometry, mean};
use crate::host::{CreationScope, Operation, StyleTarget, Surface};
use crate::layout::Grid;
use crate::model::{ElementKind, ElementRef};
use crate::report::Summary;

fn operation(axis: Axis) -> Operation {
    match axis {
        Axis::Rows => Operation::AddRow,
        Axis::Columns => Operation::AddColumn,
    }
}

/// Inserts a row (or column) into a native table at `at`, appending when
/// `at` is `None`.
///
/// The new line is sized like its neighbour and every new cell inherits
/// fill, line and font from the neighbouring cell. Formatting failures are
/// recorded per cell; insertion itself failing aborts.
pub fn add_table_line<S: Surface + ?Sized>(
    surface: &mut S,
    table: crate::model::ElementId,
    axis: Axis,
    at: Option<usize>,
    config: &EngineConfig,
) -> Result<Summary> {
    let (rows, cols) = surface.table_size(table)?;
    let (len, cross) = match axis {
        Axis::Rows => (rows, cols),
        Axis::Columns => (cols, rows),
    };
    let at = at.unwrap_or(len).min(len);
    // Index of the neighbour before insertion; after it, row `at` is new.
    let neighbour = if at > 0 { Some(at - 1) } else { (len > 0).then_some(0) };
    let size = match (axis, neighbour) {
        (Axis::Rows, Some(n)) => surface.row_height(table, n)?,
        (Axis::Columns, Some(n)) => surface.column_width(table, n)?,
        (Axis::Rows, None) => config.fallback_row_height,
        (Axis::Columns, None) => config.fallback_column_width,
    };

    match axis {
        Axis::Rows => surface.insert_row(table, at)?,
        Axis::Columns => surface.insert_column(table, at)?,
    }

    let mut summary = Summary::new(operation(axis));
    match axis {
        Axis::Rows => summary.rows = 1,
        Axis::Columns => summary.columns = 1,
    }
    summary.modified = 1;

    let resized = match axis {
        Axis::Rows => surface.set_row_height(table, at, size),
        Axis::Columns => surface.set_column_width(table, at, size),
    };
    if let Err(err) = resized {
        summary.fail(format!("size of new {axis:?} line {at}"), &err);
    }

    let Some(n) = neighbour else {
        return Ok(summary);
    };
    let src_line = if n < at { n } else { n + 1 };
    for k in 0..cross {
        let (src, dst) = match axis {
            Axis::Rows => (
                StyleTarget::Cell { table, row: src_line, col: k },
                StyleTarget::Cell { table, row: at, col: k },
            ),
            Axis::Columns => (
                StyleTarget::Cell { table, row: k, col: src_line },
                StyleTarget::Cell { table, row: k, col: at },
            ),
        };
        match copy_cell_format(surface, src, dst) {
            Ok(rejected) => {
                for part in rejected {
                    summary.fail(format!("{dst} {part}"), &GridError::host("set_style", "attribute rejected"));
                }
            }
            Err(err) => summary.fail(dst.to_string(), &err),
        }
    }
    Ok(summary)
}

/// Kind to create for a copy of `reference`.
fn creatable_kind<S: Surface + ?Sized>(surface: &S, reference: &ElementRef) -> ElementKind {
    match surface.kind(reference.id) {
        Ok(kind @ (ElementKind::Shape | ElementKind::TextFrame)) => kind,
        _ => ElementKind::Shape,
    }
}

/// Creates one empty element styled like `reference`. Rolled back if any
/// step fails.
fn create_styled<S: Surface + ?Sized>(
    surface: &mut S,
    reference: &ElementRef,
    geometry: Geometry,
    summary: &mut Summary,
) -> Result<()> {
    let kind = creatable_kind(surface, reference);
    let mut scope = CreationScope::new(surface);
    let id = scope.create_element(kind, geometry)?;
    let style = scope.style(StyleTarget::Element(reference.id))?;
    let rejected = copy_style(
        &mut *scope,
        &style,
        StyleTarget::Element(reference.id),
        StyleTarget::Element(id),
        true,
    );
    if kind.has_text_frame() {
        scope.set_text(StyleTarget::Element(id), "")?;
    }
    for part in rejected {
        summary.fail(format!("element {id} {part}"), &GridError::host("set_style", "attribute rejected"));
    }
    summary.created.extend(scope.commit());
    Ok(())
}

/// Appends a row of elements below a loose grid.
///
/// One element per column, placed one average row gap below the lowest
/// bottom and sized to its column's average width and height.
pub fn add_grid_row<S: Surface + ?Sized>(surface: &mut S, grid: &Grid, config: &EngineConfig) -> Summary {
    let mut summary = Summary::new(Operation::AddRow);
    let last = grid.row_count() - 1;
    let gap = grid.average_row_gap().unwrap_or(config.default_spacing);
    let top = grid.row_bottom(last) + gap;

    for col in 0..grid.column_count() {
        let column = grid.column(col);
        let Some(reference) = grid.get(last, col).or_else(|| column.last().copied()) else {
            continue;
        };
        let left = mean(column.iter().map(|e| e.geometry.left)).unwrap_or(reference.geometry.left);
        let width = mean(column.iter().map(|e| e.geometry.width)).unwrap_or(config.fallback_column_width);
        let height = mean(column.iter().map(|e| e.geometry.height)).unwrap_or(config.fallback_row_height);
        let geometry = Geometry::new(left, top, width, height);
        if let Err(err) = create_styled(surface, reference, geometry, &mut summary) {
            summary.fail(format!("column {col}"), &err);
        }
    }
    summary.rows = usize::from(!summary.created.is_empty());
    summary
}

/// Appends a column of elements to the right of a loose grid, each sized to
/// its row's average width and height.
pub fn add_grid_column<S: Surface + ?Sized>(surface: &mut S, grid: &Grid, config: &EngineConfig) -> Summary {
    let mut summary = Summary::new(Operation::AddColumn);
    let gap = grid.average_column_gap().unwrap_or(config.default_spacing);
    let right = grid.bounds().right();

    for (r, row) in grid.rows().iter().enumerate() {
        let Some(reference) = row.last() else {
            continue;
        };
        let top = mean(row.iter().map(|e| e.geometry.top)).unwrap_or(reference.geometry.top);
        let width = mean(row.iter().map(|e| e.geometry.width)).unwrap_or(config.fallback_column_width);
        let height = mean(row.iter().map(|e| e.geometry.height)).unwrap_or(config.fallback_row_height);
        let geometry = Geometry::new(right + gap, top, width, height);
        if let Err(err) = create_styled(surface, reference, geometry, &mut summary) {
            summary.fail(format!("row {r}"), &err);
        }
    }
    summary.columns = usize::from(!summary.created.is_empty());
    summary
}
