//! Header row synthesis.

use crate::config::EngineConfig;
use crate::convert::style_copy::{copy_cell_format, copy_style};
use crate::error::{GridError, Result};
use crate::geometry::Geometry;
use crate::host::{CreationScope, Operation, StyleTarget, Surface};
use crate::layout::Grid;
use crate::model::{ElementId, ElementKind, ElementRef};
use crate::report::Summary;

use super::separators::{default_line, draw_line};

fn label(config: &EngineConfig, n: usize) -> String {
    format!("{} {}", config.header_label_prefix, n)
}

/// Inserts a labelled row at the top of a native table.
pub fn add_table_header<S: Surface + ?Sized>(
    surface: &mut S,
    table: ElementId,
    config: &EngineConfig,
) -> Result<Summary> {
    let (rows, cols) = surface.table_size(table)?;
    let height = if rows > 0 {
        surface.row_height(table, 0)?
    } else {
        config.fallback_row_height
    };
    surface.insert_row(table, 0)?;

    let mut summary = Summary::new(Operation::AddHeaderRow);
    summary.rows = 1;
    summary.modified = 1;
    if let Err(err) = surface.set_row_height(table, 0, height) {
        summary.fail("header row height", &err);
    }
    for col in 0..cols {
        let dst = StyleTarget::Cell { table, row: 0, col };
        let result = surface.set_text(dst, &label(config, col + 1)).and_then(|()| {
            if rows > 0 {
                copy_cell_format(&mut *surface, StyleTarget::Cell { table, row: 1, col }, dst)
            } else {
                Ok(Default::default())
            }
        });
        match result {
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

/// Creates an autosized text frame styled like `source`.
fn make_label<S: Surface + ?Sized>(
    scope: &mut CreationScope<'_, S>,
    source: &ElementRef,
    text: &str,
) -> Result<ElementId> {
    let id = scope.create_element(ElementKind::TextFrame, source.geometry)?;
    let style = scope.style(StyleTarget::Element(source.id))?;
    let rejected = copy_style(
        &mut **scope,
        &style,
        StyleTarget::Element(source.id),
        StyleTarget::Element(id),
        true,
    );
    if !rejected.is_empty() {
        tracing::warn!(%id, ?rejected, "header label kept default attributes");
    }
    scope.set_text(StyleTarget::Element(id), text)?;
    scope.autosize(id)?;
    Ok(id)
}

/// Places a label above every element of the grid's first row, then draws a
/// separator between the labels and that row.
///
/// Labels are autosized, then all are clamped to the tallest label so the
/// header reads as one row.
pub fn add_grid_header<S: Surface + ?Sized>(surface: &mut S, grid: &Grid, config: &EngineConfig) -> Summary {
    let mut summary = Summary::new(Operation::AddHeaderRow);
    let first_top = grid.row_top(0);

    let mut labels: Vec<(ElementId, Geometry)> = Vec::new();
    for (i, e) in grid.rows()[0].iter().enumerate() {
        let mut scope = CreationScope::new(&mut *surface);
        let made = make_label(&mut scope, e, &label(config, i + 1));
        match made {
            Ok(id) => {
                summary.created.extend(scope.commit());
                match surface.geometry(id) {
                    Ok(g) => labels.push((id, g)),
                    Err(err) => summary.fail(format!("header {}", i + 1), &err),
                }
            }
            Err(err) => {
                drop(scope);
                summary.fail(format!("header {}", i + 1), &err);
            }
        }
    }
    if labels.is_empty() {
        return summary;
    }

    let height = labels.iter().map(|(_, g)| g.height).fold(0.0, f64::max);
    let top = first_top - config.header_gap - height;
    for (id, g) in &labels {
        if let Err(err) = surface.set_geometry(*id, Geometry::new(g.left, top, g.width, height)) {
            summary.fail(format!("header {id}"), &err);
        }
    }
    summary.rows = 1;

    let bounds = grid.bounds();
    let y = (top + height + first_top) / 2.0;
    let mut scope = CreationScope::new(&mut *surface);
    let line = draw_line(&mut scope, bounds.left, bounds.right(), y, &default_line(config))
        .and_then(|id| scope.set_name(id, &config.header_separator_name));
    match line {
        Ok(()) => summary.created.extend(scope.commit()),
        Err(err) => {
            drop(scope);
            summary.fail("header separator", &err);
        }
    }
    summary
}
