//! Breaking a native table into free elements.

use crate::config::EngineConfig;
use crate::error::{GridError, Result};
use crate::host::{CreationScope, Operation, StyleTarget, Surface, table_cell_geometry};
use crate::model::{ElementId, ElementKind};
use crate::report::Summary;

use super::style_copy::copy_text_and_style;

/// Replaces `table` with one text element per cell.
///
/// Each element starts at its cell's absolute geometry and receives the
/// cell's text and formatting. Rows are then unified to their tallest
/// member and everything is re-laid out sequentially from the table origin,
/// which removes drift from host autosizing. The table is deleted last. If
/// anything fails before that, every element created for this table is
/// removed again and the table is left untouched.
pub fn table_to_elements<S: Surface + ?Sized>(
    surface: &mut S,
    table: ElementId,
    config: &EngineConfig,
) -> Result<Summary> {
    if !surface.kind(table)?.is_table() {
        return Err(GridError::precondition(format!("element {table} is not a table")));
    }
    let origin = surface.geometry(table)?;
    let cells = table_cell_geometry(surface, table)?;
    let mut summary = Summary::new(Operation::TableToElements);
    summary.rows = cells.len();
    summary.columns = cells.first().map_or(0, Vec::len);

    let mut scope = CreationScope::new(surface);
    let mut grid: Vec<Vec<ElementId>> = Vec::with_capacity(cells.len());
    for (row, geoms) in cells.iter().enumerate() {
        let mut ids = Vec::with_capacity(geoms.len());
        for (col, geometry) in geoms.iter().enumerate() {
            let id = scope.create_element(ElementKind::TextFrame, *geometry)?;
            let src = StyleTarget::Cell { table, row, col };
            let rejected = copy_text_and_style(&mut *scope, src, StyleTarget::Element(id))?;
            for part in rejected {
                summary.fail(
                    format!("cell ({row}, {col}) {part}"),
                    &GridError::host("set_style", "attribute rejected"),
                );
            }
            ids.push(id);
        }
        grid.push(ids);
    }

    relayout_rows(&mut *scope, &grid, origin.left, origin.top, config.table_cell_spacing)?;
    scope.delete(table)?;
    summary.deleted = 1;
    summary.created = scope.commit();
    tracing::debug!(%table, created = summary.created.len(), "table converted to elements");
    Ok(summary)
}

/// Unifies each row's height to its tallest member and packs rows and
/// elements sequentially from (`left`, `top`) with `spacing` gaps.
pub(crate) fn relayout_rows<S: Surface + ?Sized>(
    surface: &mut S,
    rows: &[Vec<ElementId>],
    left: f64,
    top: f64,
    spacing: f64,
) -> Result<()> {
    let mut y = top;
    for row in rows {
        let geoms = row
            .iter()
            .map(|id| surface.geometry(*id))
            .collect::<Result<Vec<_>>>()?;
        let height = geoms.iter().map(|g| g.height).fold(0.0, f64::max);
        let mut x = left;
        for (id, g) in row.iter().zip(&geoms) {
            surface.set_geometry(*id, g.with_position(x, y).with_size(g.width, height))?;
            x += g.width + spacing;
        }
        y += height + spacing;
    }
    Ok(())
}

/// Converts each table independently.
///
/// A table that fails is rolled back on its own and recorded as a partial
/// failure; the others still convert.
pub fn tables_to_elements<S: Surface + ?Sized>(
    surface: &mut S,
    tables: &[ElementId],
    config: &EngineConfig,
) -> Summary {
    let mut summary = Summary::new(Operation::TableToElements);
    for &table in tables {
        match table_to_elements(surface, table, config) {
            Ok(one) => summary.absorb(one),
            Err(err) => summary.fail(format!("table {table}"), &err),
        }
    }
    summary
}
