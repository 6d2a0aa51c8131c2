//! Tolerance-based clustering of positioned elements.
//!
//! Objects are grouped by a coordinate (their top for rows, their left for
//! columns). Each group keeps a running average of its members' keys and a
//! new object joins the first group whose average lies within tolerance.

use ordered_float::OrderedFloat;

use crate::config::EngineConfig;
use crate::geometry::Axis;
use crate::model::ElementRef;

use super::grid::Grid;
use super::tolerance::tolerance;

/// Cluster objects whose keys lie within `tolerance` of a group's running
/// average.
///
/// Objects are visited in ascending key order; groups come out in the order
/// they were opened, which is ascending by first member.
pub fn cluster_objects<T: Clone, F: Fn(&T) -> f64>(xs: &[T], key_fn: F, tolerance: f64) -> Vec<Vec<T>> {
    let mut sorted: Vec<T> = xs.to_vec();
    sorted.sort_by_key(|x| OrderedFloat(key_fn(x)));

    // (sum, count) per group so the average stays exact.
    let mut stats: Vec<(f64, usize)> = Vec::new();
    let mut groups: Vec<Vec<T>> = Vec::new();
    for item in sorted {
        let key = key_fn(&item);
        let slot = stats
            .iter()
            .position(|(sum, n)| (key - sum / *n as f64).abs() <= tolerance);
        match slot {
            Some(i) => {
                stats[i].0 += key;
                stats[i].1 += 1;
                groups[i].push(item);
            }
            None => {
                stats.push((key, 1));
                groups.push(vec![item]);
            }
        }
    }
    groups
}

/// Groups elements into rows (by top) or columns (by left) using the
/// adaptive tolerance, sorting each group along the other axis.
pub fn cluster_axis(items: &[ElementRef], axis: Axis, config: &EngineConfig) -> Vec<Vec<ElementRef>> {
    let geoms: Vec<_> = items.iter().map(|e| e.geometry).collect();
    let tol = tolerance(&geoms, axis, config);
    let mut groups = cluster_objects(items, |e| axis.start(&e.geometry), tol);
    let cross = axis.other();
    for group in &mut groups {
        group.sort_by_key(|e| OrderedFloat(cross.start(&e.geometry)));
    }
    tracing::debug!(
        ?axis,
        tolerance = tol,
        groups = groups.len(),
        "clustered {} elements",
        items.len()
    );
    groups
}

/// Infers the row/column structure of a set of elements.
///
/// Returns `None` for fewer than two elements. Whether a jagged result is
/// acceptable is left to the caller (see [`Grid::is_rectangular`]).
pub fn detect_grid(items: &[ElementRef], config: &EngineConfig) -> Option<Grid> {
    if items.len() < 2 {
        return None;
    }
    let rows = cluster_axis(items, Axis::Rows, config);
    Grid::from_rows(rows)
}
