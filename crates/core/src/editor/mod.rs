//! Structural edits on tables and detected grids.
//!
//! Every unit of work (a row's element, a cell's format, a separator) is
//! attempted on its own; a failing unit is recorded in the [`Summary`] and
//! the rest of the batch carries on.

mod header;
mod rows;
mod separators;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::geometry::Axis;
use crate::host::Surface;
use crate::layout::Grid;
use crate::report::Summary;
use crate::selection::Subject;

pub use header::{add_grid_header, add_table_header};
pub use rows::{add_grid_column, add_grid_row, add_table_line};
pub use separators::{create_separators, default_line, realign_separators, remove_separators};

/// Structure editor bound to one surface.
pub struct MatrixEditor<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
    config: &'a EngineConfig,
}

impl<'a, S: Surface + ?Sized> MatrixEditor<'a, S> {
    pub fn new(surface: &'a mut S, config: &'a EngineConfig) -> Self {
        Self { surface, config }
    }

    /// Appends a row to a table or below a grid.
    pub fn add_row(&mut self, subject: &Subject) -> Result<Summary> {
        match subject {
            Subject::Table(t) => add_table_line(self.surface, *t, Axis::Rows, None, self.config),
            Subject::Grid(g) => Ok(add_grid_row(self.surface, g, self.config)),
        }
    }

    /// Appends a column to a table or right of a grid.
    pub fn add_column(&mut self, subject: &Subject) -> Result<Summary> {
        match subject {
            Subject::Table(t) => add_table_line(self.surface, *t, Axis::Columns, None, self.config),
            Subject::Grid(g) => Ok(add_grid_column(self.surface, g, self.config)),
        }
    }

    pub fn add_header_row(&mut self, subject: &Subject) -> Result<Summary> {
        match subject {
            Subject::Table(t) => add_table_header(self.surface, *t, self.config),
            Subject::Grid(g) => Ok(add_grid_header(self.surface, g, self.config)),
        }
    }

    pub fn create_separators(&mut self, grid: &Grid) -> Result<Summary> {
        create_separators(self.surface, grid, self.config)
    }

    pub fn realign_separators(&mut self, grid: &Grid) -> Result<Summary> {
        realign_separators(self.surface, grid, self.config)
    }

    pub fn remove_separators(&mut self) -> Summary {
        remove_separators(self.surface, self.config)
    }
}
