//! Grid inference over positioned elements.
//!
//! This module contains:
//! - The adaptive clustering tolerance
//! - Running-average row/column clustering
//! - The inferred [`Grid`] and its derived [`Cell`] geometry

pub mod clustering;
pub mod grid;
pub mod tolerance;

pub use clustering::{cluster_axis, cluster_objects, detect_grid};
pub use grid::{Cell, Grid};
pub use tolerance::tolerance;
