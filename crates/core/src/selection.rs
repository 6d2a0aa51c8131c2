//! Turning a raw selection into something an operation can work on.

use crate::config::EngineConfig;
use crate::error::{GridError, Result};
use crate::host::Surface;
use crate::layout::{Grid, detect_grid};
use crate::model::{ElementId, ElementRef};

/// What a structure edit applies to.
#[derive(Clone, Debug, PartialEq)]
pub enum Subject {
    Table(ElementId),
    Grid(Grid),
}

fn is_rotated(degrees: f64) -> bool {
    degrees.rem_euclid(360.0).abs() > f64::EPSILON
}

/// Unrotated, rectangular members of `ids` that can take part in a grid,
/// with their current geometry. Tables, lines and rotated elements are
/// skipped.
pub fn grid_members<S: Surface + ?Sized>(surface: &S, ids: &[ElementId]) -> Result<Vec<ElementRef>> {
    let mut out = Vec::with_capacity(ids.len());
    for &id in ids {
        if !surface.kind(id)?.is_grid_member() {
            continue;
        }
        if is_rotated(surface.rotation(id)?) {
            tracing::debug!(%id, "skipping rotated element");
            continue;
        }
        out.push(ElementRef::new(id, surface.geometry(id)?));
    }
    Ok(out)
}

/// Tables among `ids`, in selection order.
pub fn tables_in<S: Surface + ?Sized>(surface: &S, ids: &[ElementId]) -> Result<Vec<ElementId>> {
    let mut out = Vec::new();
    for &id in ids {
        if surface.kind(id)?.is_table() {
            out.push(id);
        }
    }
    Ok(out)
}

/// Detects a grid over the usable members of `ids`.
///
/// Fewer than two usable elements is a precondition failure; two or more
/// that do not cluster is a detection failure.
pub fn resolve_grid<S: Surface + ?Sized>(surface: &S, ids: &[ElementId], config: &EngineConfig) -> Result<Grid> {
    let members = grid_members(surface, ids)?;
    if members.len() < 2 {
        return Err(GridError::precondition(
            "select a table, or at least two shapes arranged in rows and columns",
        ));
    }
    detect_grid(&members, config).ok_or(GridError::GridDetection {
        count: members.len(),
    })
}

/// A single selected table, otherwise a grid over the selection.
pub fn resolve_subject<S: Surface + ?Sized>(
    surface: &S,
    ids: &[ElementId],
    config: &EngineConfig,
) -> Result<Subject> {
    if let [only] = ids
        && surface.kind(*only)?.is_table()
    {
        return Ok(Subject::Table(*only));
    }
    resolve_grid(surface, ids, config).map(Subject::Grid)
}
