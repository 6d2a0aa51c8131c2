//! The host document surface.
//!
//! The engine never owns document objects. Everything it reads or writes goes
//! through a [`Surface`] passed in by the caller, and every public operation is
//! gated by a [`FeatureGate`].

mod gate;
pub mod memory;
mod scope;
pub mod tags;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::Geometry;
use crate::model::{ElementId, ElementKind, Style, StylePart};

pub use gate::{AllowAll, DenyList, FeatureGate};
pub use memory::MemorySurface;
pub use scope::CreationScope;
pub use tags::SeparatorTags;

/// Something that carries text and style: a free element or a table cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleTarget {
    Element(ElementId),
    Cell {
        table: ElementId,
        row: usize,
        col: usize,
    },
}

impl fmt::Display for StyleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleTarget::Element(id) => write!(f, "element {id}"),
            StyleTarget::Cell { table, row, col } => {
                write!(f, "cell ({row}, {col}) of table {table}")
            }
        }
    }
}

/// Public operations, as seen by the feature gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    TableToElements,
    ElementsToTable,
    AddRow,
    AddColumn,
    AddHeaderRow,
    CreateSeparators,
    RealignSeparators,
    RemoveSeparators,
    AssignToCells,
    AdjustSpacing,
    CreateMatrix,
    DuplicateToGrid,
    SplitElement,
    ApplyMargins,
}

impl Operation {
    pub fn label(self) -> &'static str {
        match self {
            Operation::TableToElements => "table to elements",
            Operation::ElementsToTable => "elements to table",
            Operation::AddRow => "add row",
            Operation::AddColumn => "add column",
            Operation::AddHeaderRow => "add header row",
            Operation::CreateSeparators => "create separators",
            Operation::RealignSeparators => "realign separators",
            Operation::RemoveSeparators => "remove separators",
            Operation::AssignToCells => "assign to cells",
            Operation::AdjustSpacing => "adjust spacing",
            Operation::CreateMatrix => "create matrix",
            Operation::DuplicateToGrid => "duplicate to grid",
            Operation::SplitElement => "split element",
            Operation::ApplyMargins => "apply margins",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Capabilities the engine consumes from the host application.
///
/// Geometry is in points with a top-left origin. Implementations report
/// failures as [`GridError::Host`](crate::GridError::Host) or
/// [`GridError::ElementNotFound`](crate::GridError::ElementNotFound).
pub trait Surface {
    /// Currently selected elements, in selection order.
    fn selection(&self) -> Vec<ElementId>;

    /// Every element on the current slide, back to front.
    fn elements(&self) -> Vec<ElementId>;

    fn kind(&self, id: ElementId) -> Result<ElementKind>;

    fn geometry(&self, id: ElementId) -> Result<Geometry>;

    fn set_geometry(&mut self, id: ElementId, geometry: Geometry) -> Result<()>;

    /// Rotation in degrees.
    fn rotation(&self, id: ElementId) -> Result<f64>;

    fn name(&self, id: ElementId) -> Result<String>;

    fn set_name(&mut self, id: ElementId, name: &str) -> Result<()>;

    /// Whether elements can carry key/value metadata.
    fn supports_metadata(&self) -> bool {
        false
    }

    fn metadata(&self, _id: ElementId, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set_metadata(&mut self, _id: ElementId, _key: &str, _value: &str) -> Result<()> {
        Err(crate::GridError::host(
            "set_metadata",
            "metadata is not supported by this host",
        ))
    }

    /// Creates a shape, text frame, line or picture frame.
    fn create_element(&mut self, kind: ElementKind, geometry: Geometry) -> Result<ElementId>;

    /// Creates a table whose rows and columns evenly divide `geometry`.
    fn create_table(&mut self, rows: usize, cols: usize, geometry: Geometry) -> Result<ElementId>;

    fn delete(&mut self, id: ElementId) -> Result<()>;

    fn bring_to_front(&mut self, id: ElementId) -> Result<()>;

    /// Fits the element's height to its text.
    fn autosize(&mut self, id: ElementId) -> Result<()>;

    fn text(&self, target: StyleTarget) -> Result<String>;

    fn set_text(&mut self, target: StyleTarget, text: &str) -> Result<()>;

    fn style(&self, target: StyleTarget) -> Result<Style>;

    fn set_style_part(&mut self, target: StyleTarget, part: StylePart) -> Result<()>;

    /// Capability check for copying a whole style in one call.
    fn can_bulk_clone_style(&self, _src: ElementId, _dst: ElementId) -> bool {
        false
    }

    fn clone_style(&mut self, src: ElementId, dst: ElementId) -> Result<()> {
        let style = self.style(StyleTarget::Element(src))?;
        for part in style.parts(true) {
            self.set_style_part(StyleTarget::Element(dst), part)?;
        }
        Ok(())
    }

    /// Row and column counts of a table.
    fn table_size(&self, table: ElementId) -> Result<(usize, usize)>;

    fn row_height(&self, table: ElementId, row: usize) -> Result<f64>;

    fn column_width(&self, table: ElementId, col: usize) -> Result<f64>;

    fn set_row_height(&mut self, table: ElementId, row: usize, height: f64) -> Result<()>;

    fn set_column_width(&mut self, table: ElementId, col: usize, width: f64) -> Result<()>;

    /// Inserts an empty row so that it ends up at index `at`.
    fn insert_row(&mut self, table: ElementId, at: usize) -> Result<()>;

    /// Inserts an empty column so that it ends up at index `at`.
    fn insert_column(&mut self, table: ElementId, at: usize) -> Result<()>;
}

/// Absolute geometry of every cell of a table, row-major.
///
/// Positions are cumulative sums of the preceding row heights and column
/// widths from the table frame's origin.
pub fn table_cell_geometry<S: Surface + ?Sized>(
    surface: &S,
    table: ElementId,
) -> Result<Vec<Vec<Geometry>>> {
    let frame = surface.geometry(table)?;
    let (rows, cols) = surface.table_size(table)?;
    let heights = (0..rows)
        .map(|r| surface.row_height(table, r))
        .collect::<Result<Vec<_>>>()?;
    let widths = (0..cols)
        .map(|c| surface.column_width(table, c))
        .collect::<Result<Vec<_>>>()?;

    let mut out = Vec::with_capacity(rows);
    let mut top = frame.top;
    for height in &heights {
        let mut left = frame.left;
        let mut row = Vec::with_capacity(cols);
        for width in &widths {
            row.push(Geometry::new(left, top, *width, *height));
            left += width;
        }
        out.push(row);
        top += height;
    }
    Ok(out)
}
