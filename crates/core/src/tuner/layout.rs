//! Uniform-spacing layout used by the tuner's previews.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::geometry::{Axis, Geometry};
use crate::model::ElementId;

/// Geometry per element, in grid order.
pub type Snapshot = IndexMap<ElementId, Geometry>;

/// Inputs of one layout pass.
#[derive(Debug, Clone)]
pub struct LayoutParams<'a> {
    pub axis: Axis,
    pub selected: &'a BTreeSet<usize>,
    pub delta: f64,
    pub spacing: f64,
    pub anchor: (f64, f64),
    pub min_size: f64,
}

/// Lays the grid out from `base` sizes.
///
/// The delta grows or shrinks every member of the selected rows (heights)
/// or columns (widths), never below `min_size`. Every member then takes its
/// row's tallest height and its column's widest width, and rows and columns
/// are packed from `anchor` with exactly `spacing` between them.
pub fn solve(rows: &[Vec<ElementId>], base: &Snapshot, params: &LayoutParams<'_>) -> Snapshot {
    let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut row_heights = vec![0.0_f64; rows.len()];
    let mut col_widths = vec![0.0_f64; cols];

    for (r, row) in rows.iter().enumerate() {
        for (c, id) in row.iter().enumerate() {
            let Some(g) = base.get(id) else {
                continue;
            };
            let (mut w, mut h) = (g.width, g.height);
            match params.axis {
                Axis::Rows if params.selected.contains(&r) => h = (h + params.delta).max(params.min_size),
                Axis::Columns if params.selected.contains(&c) => w = (w + params.delta).max(params.min_size),
                _ => {}
            }
            row_heights[r] = row_heights[r].max(h);
            col_widths[c] = col_widths[c].max(w);
        }
    }

    let offsets = |sizes: &[f64], start: f64| -> Vec<f64> {
        let mut out = Vec::with_capacity(sizes.len());
        let mut at = start;
        for s in sizes {
            out.push(at);
            at += s + params.spacing;
        }
        out
    };
    let xs = offsets(&col_widths, params.anchor.0);
    let ys = offsets(&row_heights, params.anchor.1);

    let mut out = Snapshot::with_capacity(base.len());
    for (r, row) in rows.iter().enumerate() {
        for (c, id) in row.iter().enumerate() {
            if base.contains_key(id) {
                out.insert(*id, Geometry::new(xs[c], ys[r], col_widths[c], row_heights[r]));
            }
        }
    }
    out
}
