//! Conversion between detected grids and native tables.
//!
//! Text and formatting travel with the content in both directions.

mod elements_to_table;
pub mod style_copy;
mod table_to_elements;

pub use elements_to_table::{elements_to_table, table_frame};
pub use table_to_elements::{table_to_elements, tables_to_elements};
