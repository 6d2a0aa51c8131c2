//! Placing free elements into the cells of a table or grid.
//!
//! Each target goes to the first cell, in enumeration order, whose rectangle
//! contains the target's centre. Borders count as inside, so a centre on a
//! shared border lands in the earlier cell.

use crate::error::Result;
use crate::host::{Operation, Surface};
use crate::layout::Cell;
use crate::model::{ElementId, ElementRef};
use crate::report::Summary;

/// Targets that landed in one cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub cell: Cell,
    pub targets: Vec<ElementRef>,
}

/// Maps targets onto cells. Cells that receive nothing are omitted, the
/// rest keep the order of `cells`. Targets outside every cell are dropped.
pub fn assign(targets: &[ElementRef], cells: &[Cell]) -> Vec<Assignment> {
    let mut buckets: Vec<Vec<ElementRef>> = vec![Vec::new(); cells.len()];
    for target in targets {
        let (x, y) = target.geometry.center();
        match cells.iter().position(|c| c.geometry.contains_point(x, y)) {
            Some(i) => buckets[i].push(*target),
            None => tracing::debug!(id = %target.id, x, y, "target is outside every cell"),
        }
    }
    cells
        .iter()
        .zip(buckets)
        .filter(|(_, t)| !t.is_empty())
        .map(|(cell, targets)| Assignment {
            cell: *cell,
            targets,
        })
        .collect()
}

/// Centres every assigned target in its cell and raises it to the front.
pub fn place<S: Surface + ?Sized>(surface: &mut S, assignments: &[Assignment]) -> Summary {
    let mut summary = Summary::new(Operation::AssignToCells);
    for a in assignments {
        for t in &a.targets {
            let moved = surface
                .set_geometry(t.id, t.geometry.centered_in(&a.cell.geometry))
                .and_then(|()| surface.bring_to_front(t.id));
            match moved {
                Ok(()) => summary.modified += 1,
                Err(err) => summary.fail(format!("element {}", t.id), &err),
            }
        }
    }
    summary
}

/// Assigns and places `targets` in one step.
pub fn assign_and_place<S: Surface + ?Sized>(
    surface: &mut S,
    targets: &[ElementId],
    cells: &[Cell],
) -> Result<Summary> {
    let refs = targets
        .iter()
        .map(|id| Ok(ElementRef::new(*id, surface.geometry(*id)?)))
        .collect::<Result<Vec<_>>>()?;
    let assignments = assign(&refs, cells);
    let dropped = refs.len() - assignments.iter().map(|a| a.targets.len()).sum::<usize>();
    if dropped > 0 {
        tracing::info!(dropped, "targets outside every cell were left in place");
    }
    Ok(place(surface, &assignments))
}
