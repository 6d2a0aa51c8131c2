//! Separator lines between grid rows.
//!
//! A separator spans the grid's horizontal extent at the midpoint of an
//! inter-row gap. Its row index is recorded through [`SeparatorTags`]; the
//! grid a separator belongs to is recovered from where the line sits, so
//! several grids on one slide keep their own sets.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::geometry::{Geometry, bounding_box};
use crate::host::{CreationScope, Operation, SeparatorTags, StyleTarget, Surface};
use crate::layout::Grid;
use crate::model::{ElementId, ElementKind, LineStyle, StylePart};
use crate::report::Summary;

/// Line style for new separators when there is no existing one to follow.
pub fn default_line(config: &EngineConfig) -> LineStyle {
    LineStyle {
        visible: true,
        color: config.separator_color,
        weight: config.separator_weight,
        ..LineStyle::default()
    }
}

/// Draws a horizontal line from `left` to `right` at `y`.
pub(crate) fn draw_line<S: Surface + ?Sized>(
    scope: &mut CreationScope<'_, S>,
    left: f64,
    right: f64,
    y: f64,
    style: &LineStyle,
) -> Result<ElementId> {
    let id = scope.create_element(ElementKind::Line, Geometry::new(left, y, right - left, 0.0))?;
    scope.set_style_part(StyleTarget::Element(id), StylePart::Line(style.clone()))?;
    Ok(id)
}

/// Tagged separators whose centre lies inside `area`, ordered by index.
fn separators_within<S: Surface + ?Sized>(surface: &S, tags: &SeparatorTags, area: &Geometry) -> Vec<(usize, ElementId)> {
    tags.find(surface)
        .into_iter()
        .filter(|(_, id)| {
            surface.geometry(*id).is_ok_and(|g| {
                let (x, y) = g.center();
                area.contains_point(x, y)
            })
        })
        .collect()
}

fn draw_all<S: Surface + ?Sized>(
    surface: &mut S,
    tags: &SeparatorTags,
    grid: &Grid,
    style: &LineStyle,
    summary: &mut Summary,
) {
    let bounds = grid.bounds();
    for (i, y) in grid.row_midpoints().into_iter().enumerate() {
        let mut scope = CreationScope::new(&mut *surface);
        let drawn = draw_line(&mut scope, bounds.left, bounds.right(), y, style)
            .and_then(|id| tags.tag(&mut *scope, id, i + 1));
        match drawn {
            Ok(()) => summary.created.extend(scope.commit()),
            Err(err) => {
                drop(scope);
                summary.fail(format!("separator {}", i + 1), &err);
            }
        }
    }
}

/// Draws one separator per inter-row gap.
///
/// When this grid already has tagged separators they are realigned instead,
/// so repeated calls never stack duplicate lines. Separators of other grids
/// are left alone.
pub fn create_separators<S: Surface + ?Sized>(surface: &mut S, grid: &Grid, config: &EngineConfig) -> Result<Summary> {
    let tags = SeparatorTags::for_surface(surface, config);
    if !separators_within(surface, &tags, &grid.bounds()).is_empty() {
        tracing::debug!("separators already present, realigning");
        let mut summary = realign_separators(surface, grid, config)?;
        summary.operation = Operation::CreateSeparators;
        return Ok(summary);
    }
    let mut summary = Summary::new(Operation::CreateSeparators);
    summary.rows = grid.row_count();
    draw_all(surface, &tags, grid, &default_line(config), &mut summary);
    Ok(summary)
}

/// Moves existing separators back onto the current gap midpoints.
///
/// The grid is re-read from the surface first. Only separators lying within
/// the grid, before or after the re-read, are considered. With one separator
/// per gap they are repositioned in index order; otherwise they are deleted
/// and redrawn using the first one's line style.
pub fn realign_separators<S: Surface + ?Sized>(surface: &mut S, grid: &Grid, config: &EngineConfig) -> Result<Summary> {
    let tags = SeparatorTags::for_surface(surface, config);
    let before = grid.bounds();
    let grid = grid.refresh(surface)?;
    let mids = grid.row_midpoints();
    let bounds = grid.bounds();
    let area = bounding_box([&before, &bounds]).unwrap_or(bounds);
    let existing = separators_within(surface, &tags, &area);
    let mut summary = Summary::new(Operation::RealignSeparators);
    summary.rows = grid.row_count();

    if existing.len() == mids.len() {
        for (i, ((_, id), y)) in existing.iter().zip(&mids).enumerate() {
            let placed = surface
                .set_geometry(*id, Geometry::new(bounds.left, *y, bounds.width, 0.0))
                .and_then(|()| tags.tag(&mut *surface, *id, i + 1));
            match placed {
                Ok(()) => summary.modified += 1,
                Err(err) => summary.fail(format!("separator {}", i + 1), &err),
            }
        }
        return Ok(summary);
    }

    let template = existing
        .first()
        .and_then(|(_, id)| surface.style(StyleTarget::Element(*id)).ok())
        .map(|s| s.line)
        .unwrap_or_else(|| default_line(config));
    tracing::debug!(found = existing.len(), needed = mids.len(), "separator count changed, redrawing");
    for (_, id) in &existing {
        match surface.delete(*id) {
            Ok(()) => summary.deleted += 1,
            Err(err) => summary.fail(format!("separator {id}"), &err),
        }
    }
    draw_all(surface, &tags, &grid, &template, &mut summary);
    Ok(summary)
}

/// Deletes every tagged separator and the header separator.
pub fn remove_separators<S: Surface + ?Sized>(surface: &mut S, config: &EngineConfig) -> Summary {
    let tags = SeparatorTags::for_surface(surface, config);
    let mut doomed: Vec<ElementId> = tags.find(surface).into_iter().map(|(_, id)| id).collect();
    doomed.extend(
        surface
            .elements()
            .into_iter()
            .filter(|id| surface.name(*id).is_ok_and(|n| n == config.header_separator_name.as_str())),
    );
    let mut summary = Summary::new(Operation::RemoveSeparators);
    for id in doomed {
        match surface.delete(id) {
            Ok(()) => summary.deleted += 1,
            Err(err) => summary.fail(format!("separator {id}"), &err),
        }
    }
    summary
}
