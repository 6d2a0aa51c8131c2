//! mosaic - grid detection and matrix layout for slide elements.
//!
//! Infers rows and columns from loosely placed shapes, converts between such
//! grids and native tables, edits their structure, and tunes their spacing.
//! All document access goes through a host [`Surface`].
//!
//! ```
//! use mosaic_core::geometry::Geometry;
//! use mosaic_core::{Engine, MemorySurface};
//!
//! let mut surface = MemorySurface::new();
//! let a = surface.add_shape(Geometry::new(50.0, 100.0, 80.0, 60.0));
//! let b = surface.add_shape(Geometry::new(150.0, 100.0, 80.0, 60.0));
//! surface.select(&[a, b]);
//!
//! let mut engine = Engine::new(surface);
//! let summary = engine.add_row().unwrap();
//! assert_eq!(summary.created.len(), 2);
//! ```

pub mod assign;
pub mod config;
pub mod convert;
pub mod editor;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod host;
pub mod layout;
pub mod model;
pub mod report;
pub mod selection;
pub mod shapes;
pub mod tuner;
pub mod units;

pub use config::{EngineConfig, EngineConfigBuilder};
pub use engine::{Command, Engine, Report, SpacingRequest};
pub use error::{GridError, Result};
pub use host::{AllowAll, DenyList, FeatureGate, MemorySurface, Surface};
pub use layout::{Cell, Grid, detect_grid};
pub use report::Summary;
pub use tuner::{BulkSelection, SpacingTuner, TunerState};
