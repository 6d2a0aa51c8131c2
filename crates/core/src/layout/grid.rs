//! Inferred row/column structure over independently placed elements.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::{Geometry, bounding_box, mean};
use crate::host::{Surface, table_cell_geometry};
use crate::model::{ElementId, ElementRef};

/// Geometry of one (row, column) position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub geometry: Geometry,
}

impl Cell {
    /// Cells of a native table, row-major.
    pub fn from_table<S: Surface + ?Sized>(surface: &S, table: ElementId) -> Result<Vec<Cell>> {
        Ok(table_cell_geometry(surface, table)?
            .into_iter()
            .enumerate()
            .flat_map(|(row, cols)| {
                cols.into_iter()
                    .enumerate()
                    .map(move |(col, geometry)| Cell { row, col, geometry })
            })
            .collect())
    }
}

/// Rows of element references, top to bottom, each sorted left to right.
///
/// Rows may differ in length. A grid always has at least one row and no
/// empty rows. Geometry is a snapshot taken when the grid was built; use
/// [`Grid::refresh`] after moving elements.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<ElementRef>>,
}

impl Grid {
    /// Builds a grid from already ordered rows, dropping empty ones.
    pub fn from_rows(rows: Vec<Vec<ElementRef>>) -> Option<Grid> {
        let rows: Vec<_> = rows.into_iter().filter(|r| !r.is_empty()).collect();
        (!rows.is_empty()).then_some(Grid { rows })
    }

    pub fn rows(&self) -> &[Vec<ElementRef>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_rectangular(&self) -> bool {
        self.column_spread() == 0
    }

    /// Difference between the longest and shortest row.
    pub fn column_spread(&self) -> usize {
        let min = self.rows.iter().map(Vec::len).min().unwrap_or(0);
        self.column_count() - min
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&ElementRef> {
        self.rows.get(row)?.get(col)
    }

    /// Elements with their (row, column) position, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &ElementRef)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, e)| (r, c, e)))
    }

    pub fn ids(&self) -> Vec<ElementId> {
        self.iter().map(|(_, _, e)| e.id).collect()
    }

    /// Members of column `col` across the rows long enough to have one.
    pub fn column(&self, col: usize) -> Vec<&ElementRef> {
        self.rows.iter().filter_map(|r| r.get(col)).collect()
    }

    /// Overall extent of every member.
    pub fn bounds(&self) -> Geometry {
        bounding_box(self.iter().map(|(_, _, e)| &e.geometry)).unwrap_or_default()
    }

    pub fn row_top(&self, row: usize) -> f64 {
        self.rows[row]
            .iter()
            .map(|e| e.geometry.top)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn row_bottom(&self, row: usize) -> f64 {
        self.rows[row]
            .iter()
            .map(|e| e.geometry.bottom())
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn column_left(&self, col: usize) -> f64 {
        self.column(col)
            .iter()
            .map(|e| e.geometry.left)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn column_right(&self, col: usize) -> f64 {
        self.column(col)
            .iter()
            .map(|e| e.geometry.right())
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Vertical gaps between consecutive rows (next top minus previous bottom).
    pub fn row_gaps(&self) -> Vec<f64> {
        (1..self.row_count())
            .map(|r| self.row_top(r) - self.row_bottom(r - 1))
            .collect()
    }

    /// Horizontal gaps between consecutive columns.
    pub fn column_gaps(&self) -> Vec<f64> {
        (1..self.column_count())
            .map(|c| self.column_left(c) - self.column_right(c - 1))
            .collect()
    }

    pub fn average_row_gap(&self) -> Option<f64> {
        mean(self.row_gaps())
    }

    pub fn average_column_gap(&self) -> Option<f64> {
        mean(self.column_gaps())
    }

    /// Y coordinate halfway through each inter-row gap.
    pub fn row_midpoints(&self) -> Vec<f64> {
        (1..self.row_count())
            .map(|r| (self.row_bottom(r - 1) + self.row_top(r)) / 2.0)
            .collect()
    }

    /// Member geometry as cells, row-major.
    pub fn cells(&self) -> Vec<Cell> {
        self.iter()
            .map(|(row, col, e)| Cell {
                row,
                col,
                geometry: e.geometry,
            })
            .collect()
    }

    /// Re-reads every member's geometry, keeping the row/column structure.
    pub fn refresh<S: Surface + ?Sized>(&self, surface: &S) -> Result<Grid> {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|e| Ok(ElementRef::new(e.id, surface.geometry(e.id)?)))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Grid { rows })
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.rows.iter().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            write!(f, "row {r}:")?;
            for e in row {
                write!(f, " {}@({}, {})", e.id, e.geometry.left, e.geometry.top)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el(id: u64, left: f64, top: f64, w: f64, h: f64) -> ElementRef {
        ElementRef::new(ElementId(id), Geometry::new(left, top, w, h))
    }

    fn jagged() -> Grid {
        Grid::from_rows(vec![
            vec![el(1, 0.0, 0.0, 10.0, 10.0), el(2, 20.0, 0.0, 10.0, 10.0)],
            vec![],
            vec![el(3, 0.0, 30.0, 10.0, 20.0)],
        ])
        .unwrap()
    }

    #[test]
    fn empty_rows_are_dropped() {
        assert!(Grid::from_rows(vec![vec![]]).is_none());
        let g = jagged();
        assert_eq!(g.row_count(), 2);
        assert_eq!(g.column_count(), 2);
        assert_eq!(g.column_spread(), 1);
        assert!(!g.is_rectangular());
    }

    #[test]
    fn gaps_and_midpoints() {
        let g = jagged();
        assert_eq!(g.row_gaps(), vec![20.0]);
        assert_eq!(g.row_midpoints(), vec![20.0]);
        assert_eq!(g.column_gaps(), vec![10.0]);
        assert_eq!(g.bounds(), Geometry::new(0.0, 0.0, 30.0, 50.0));
    }

    #[test]
    fn column_skips_short_rows() {
        let g = jagged();
        assert_eq!(g.column(1).len(), 1);
        assert_eq!(g.column_left(1), 20.0);
    }
}
