//! Data model shared by every engine component.

pub mod element;
pub mod settings;
pub mod style;

pub use element::{ElementId, ElementKind, ElementRef, PlaceholderKind};
pub use settings::{DuplicateSettings, MarginSettings, MatrixSettings, SplitSettings};
pub use style::{Alignment, Color, DashStyle, FillStyle, FontStyle, LineStyle, Margins, Style, StylePart};
