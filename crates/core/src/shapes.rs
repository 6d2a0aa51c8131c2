//! Building, copying and cutting shapes into rows and columns.

use itertools::iproduct;

use crate::config::EngineConfig;
use crate::convert::style_copy::copy_style;
use crate::error::{GridError, Result};
use crate::geometry::Geometry;
use crate::host::{CreationScope, Operation, StyleTarget, Surface};
use crate::model::{
    DuplicateSettings, ElementId, ElementKind, MarginSettings, MatrixSettings, SplitSettings, StylePart,
};
use crate::report::Summary;

/// Top-left corner of cell (`row`, `col`) in a regular arrangement.
fn cell_origin(left: f64, top: f64, width: f64, height: f64, spacing: f64, row: usize, col: usize) -> (f64, f64) {
    (
        left + col as f64 * (width + spacing),
        top + row as f64 * (height + spacing),
    )
}

/// Draws a fresh `rows x columns` matrix of rectangles from `origin`.
///
/// Either every rectangle is created or none is.
pub fn create_matrix<S: Surface + ?Sized>(
    surface: &mut S,
    settings: &MatrixSettings,
    origin: (f64, f64),
) -> Result<Summary> {
    settings.validate()?;
    let mut scope = CreationScope::new(surface);
    for (row, col) in iproduct!(0..settings.rows, 0..settings.columns) {
        let (left, top) = cell_origin(
            origin.0,
            origin.1,
            settings.cell_width,
            settings.cell_height,
            settings.spacing,
            row,
            col,
        );
        let id = scope.create_element(
            ElementKind::Shape,
            Geometry::new(left, top, settings.cell_width, settings.cell_height),
        )?;
        if settings.include_text {
            let ordinal = row * settings.columns + col + 1;
            scope.set_text(StyleTarget::Element(id), &ordinal.to_string())?;
        }
        if let Some(margins) = settings.margins {
            scope.set_style_part(StyleTarget::Element(id), StylePart::Margins(margins))?;
        }
    }

    let mut summary = Summary::new(Operation::CreateMatrix);
    summary.rows = settings.rows;
    summary.columns = settings.columns;
    summary.created = scope.commit();
    tracing::debug!(rows = settings.rows, columns = settings.columns, "matrix created");
    Ok(summary)
}

fn copyable_kind<S: Surface + ?Sized>(surface: &S, id: ElementId) -> Result<ElementKind> {
    let kind = surface.kind(id)?;
    if kind.is_table() {
        return Err(GridError::precondition("tables cannot be copied into a grid, select a shape"));
    }
    Ok(kind)
}

/// Creates one copy of `source` at `geometry` inside `scope`.
fn copy_of<S: Surface + ?Sized>(
    scope: &mut CreationScope<'_, S>,
    source: ElementId,
    kind: ElementKind,
    geometry: Geometry,
    text: Option<&str>,
    summary: &mut Summary,
) -> Result<ElementId> {
    let id = scope.create_element(kind, geometry)?;
    let style = scope.style(StyleTarget::Element(source))?;
    let rejected = copy_style(
        &mut **scope,
        &style,
        StyleTarget::Element(source),
        StyleTarget::Element(id),
        text.is_some(),
    );
    for part in rejected {
        summary.fail(format!("element {id} {part}"), &GridError::host("set_style", "attribute rejected"));
    }
    if let Some(text) = text
        && kind.has_text_frame()
    {
        scope.set_text(StyleTarget::Element(id), text)?;
    }
    Ok(id)
}

/// Fills a `rows x columns` arrangement with copies of `source`.
///
/// The source itself takes the (0, 0) position and is not moved; copies
/// follow at its size plus `spacing`.
pub fn duplicate_to_grid<S: Surface + ?Sized>(
    surface: &mut S,
    source: ElementId,
    settings: &DuplicateSettings,
) -> Result<Summary> {
    settings.validate()?;
    let kind = copyable_kind(surface, source)?;
    let g = surface.geometry(source)?;
    let text = if settings.include_text && kind.has_text_frame() {
        Some(surface.text(StyleTarget::Element(source))?)
    } else {
        None
    };

    let mut summary = Summary::new(Operation::DuplicateToGrid);
    let mut scope = CreationScope::new(surface);
    for (row, col) in iproduct!(0..settings.rows, 0..settings.columns) {
        if (row, col) == (0, 0) {
            continue;
        }
        let (left, top) = cell_origin(g.left, g.top, g.width, g.height, settings.spacing, row, col);
        copy_of(
            &mut scope,
            source,
            kind,
            g.with_position(left, top),
            text.as_deref(),
            &mut summary,
        )?;
    }
    summary.rows = settings.rows;
    summary.columns = settings.columns;
    summary.created = scope.commit();
    Ok(summary)
}

/// Replaces `source` with pieces tiling its rectangle.
///
/// Pieces share the source's style; its text goes to the first piece when
/// requested. The source is deleted only once every piece exists.
pub fn split_element<S: Surface + ?Sized>(
    surface: &mut S,
    source: ElementId,
    settings: &SplitSettings,
    config: &EngineConfig,
) -> Result<Summary> {
    settings.validate()?;
    let kind = copyable_kind(surface, source)?;
    let g = surface.geometry(source)?;
    let width = (g.width - settings.spacing * (settings.columns - 1) as f64) / settings.columns as f64;
    let height = (g.height - settings.spacing * (settings.rows - 1) as f64) / settings.rows as f64;
    if width < config.min_element_size || height < config.min_element_size {
        return Err(GridError::precondition(format!(
            "element {source} is too small for {} x {} pieces with this spacing",
            settings.rows, settings.columns
        )));
    }
    let text = if settings.include_text && kind.has_text_frame() {
        Some(surface.text(StyleTarget::Element(source))?)
    } else {
        None
    };

    let mut summary = Summary::new(Operation::SplitElement);
    let mut scope = CreationScope::new(surface);
    for (row, col) in iproduct!(0..settings.rows, 0..settings.columns) {
        let (left, top) = cell_origin(g.left, g.top, width, height, settings.spacing, row, col);
        let piece_text = if (row, col) == (0, 0) { text.as_deref() } else { None };
        copy_of(
            &mut scope,
            source,
            kind,
            Geometry::new(left, top, width, height),
            piece_text,
            &mut summary,
        )?;
    }
    scope.delete(source)?;
    summary.rows = settings.rows;
    summary.columns = settings.columns;
    summary.deleted = 1;
    summary.created = scope.commit();
    Ok(summary)
}

/// Sets text margins on every element and every table cell in `ids`.
/// Elements without a text frame are skipped.
pub fn apply_margins<S: Surface + ?Sized>(surface: &mut S, ids: &[ElementId], settings: &MarginSettings) -> Result<Summary> {
    settings.validate()?;
    let mut summary = Summary::new(Operation::ApplyMargins);
    let part = StylePart::Margins(settings.margins);
    for &id in ids {
        let kind = match surface.kind(id) {
            Ok(kind) => kind,
            Err(err) => {
                summary.fail(format!("element {id}"), &err);
                continue;
            }
        };
        if kind.is_table() {
            let (rows, cols) = match surface.table_size(id) {
                Ok(size) => size,
                Err(err) => {
                    summary.fail(format!("table {id}"), &err);
                    continue;
                }
            };
            for (row, col) in iproduct!(0..rows, 0..cols) {
                let cell = StyleTarget::Cell { table: id, row, col };
                match surface.set_style_part(cell, part.clone()) {
                    Ok(()) => summary.modified += 1,
                    Err(err) => summary.fail(cell.to_string(), &err),
                }
            }
        } else if kind.has_text_frame() {
            match surface.set_style_part(StyleTarget::Element(id), part.clone()) {
                Ok(()) => summary.modified += 1,
                Err(err) => summary.fail(format!("element {id}"), &err),
            }
        } else {
            tracing::debug!(%id, ?kind, "no text frame, margins skipped");
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemorySurface;
    use crate::model::Margins;

    #[test]
    fn matrix_labels_are_ordinals() {
        let mut s = MemorySurface::new();
        let settings = MatrixSettings {
            rows: 2,
            columns: 3,
            cell_width: 50.0,
            cell_height: 20.0,
            spacing: 5.0,
            include_text: true,
            margins: None,
        };
        let summary = create_matrix(&mut s, &settings, (10.0, 10.0)).unwrap();
        assert_eq!(summary.created.len(), 6);
        let last = s.get(summary.created[5]).unwrap();
        assert_eq!(last.text, "6");
        assert_eq!(last.geometry, Geometry::new(120.0, 35.0, 50.0, 20.0));
    }

    #[test]
    fn matrix_is_all_or_nothing() {
        let mut s = MemorySurface::new();
        s.faults_mut().create_budget = Some(4);
        let settings = MatrixSettings {
            rows: 3,
            columns: 3,
            cell_width: 10.0,
            cell_height: 10.0,
            spacing: 0.0,
            include_text: false,
            margins: None,
        };
        assert!(create_matrix(&mut s, &settings, (0.0, 0.0)).is_err());
        assert!(s.is_empty());
    }

    #[test]
    fn split_tiles_source_rectangle() {
        let mut s = MemorySurface::new();
        let src = s.add_text(Geometry::new(0.0, 0.0, 110.0, 50.0), "hello");
        let settings = SplitSettings {
            rows: 2,
            columns: 2,
            spacing: 10.0,
            include_text: true,
        };
        let summary = split_element(&mut s, src, &settings, &EngineConfig::default()).unwrap();
        assert!(s.get(src).is_none());
        assert_eq!(summary.created.len(), 4);
        let last = s.get(summary.created[3]).unwrap();
        assert_eq!(last.geometry, Geometry::new(60.0, 30.0, 50.0, 20.0));
        assert_eq!(s.get(summary.created[0]).unwrap().text, "hello");
        assert_eq!(last.text, "");
    }

    #[test]
    fn split_refuses_pieces_below_minimum() {
        let mut s = MemorySurface::new();
        let src = s.add_shape(Geometry::new(0.0, 0.0, 20.0, 20.0));
        let settings = SplitSettings {
            rows: 1,
            columns: 3,
            spacing: 10.0,
            include_text: false,
        };
        let err = split_element(&mut s, src, &settings, &EngineConfig::default()).unwrap_err();
        assert!(err.is_precondition());
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn margins_reach_table_cells() {
        let mut s = MemorySurface::new();
        let t = s.add_table(0.0, 0.0, &[10.0, 10.0], &[10.0]);
        let line = s.create_element(ElementKind::Line, Geometry::new(0.0, 0.0, 10.0, 0.0)).unwrap();
        let settings = MarginSettings {
            margins: Margins::uniform(2.0),
        };
        let summary = apply_margins(&mut s, &[t, line], &settings).unwrap();
        assert_eq!(summary.modified, 2);
        let cell = StyleTarget::Cell { table: t, row: 1, col: 0 };
        assert_eq!(s.style(cell).unwrap().margins, Margins::uniform(2.0));
    }
}
