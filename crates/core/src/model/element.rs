//! Element handles and the closed set of element kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Geometry;

/// Opaque handle to an element owned by the host document.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderKind {
    Title,
    Body,
    Subtitle,
    Footer,
    SlideNumber,
    Date,
    Picture,
    Object,
}

/// What an element is, resolved once when the element is wrapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "placeholder")]
pub enum ElementKind {
    /// A native table frame.
    Table,
    /// A text box.
    TextFrame,
    /// An auto shape; carries a text frame.
    Shape,
    Line,
    Picture,
    Placeholder(PlaceholderKind),
}

impl ElementKind {
    pub fn is_table(self) -> bool {
        matches!(self, ElementKind::Table)
    }

    pub fn is_line(self) -> bool {
        matches!(self, ElementKind::Line)
    }

    pub fn has_text_frame(self) -> bool {
        match self {
            ElementKind::TextFrame | ElementKind::Shape => true,
            ElementKind::Placeholder(kind) => !matches!(kind, PlaceholderKind::Picture),
            ElementKind::Table | ElementKind::Line | ElementKind::Picture => false,
        }
    }

    /// Elements that can take part in a detected grid.
    pub fn is_grid_member(self) -> bool {
        !matches!(self, ElementKind::Table | ElementKind::Line)
    }
}

/// Transient reference to an element together with the geometry observed
/// when it was read.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementRef {
    pub id: ElementId,
    pub geometry: Geometry,
}

impl ElementRef {
    pub fn new(id: ElementId, geometry: Geometry) -> Self {
        Self { id, geometry }
    }
}
