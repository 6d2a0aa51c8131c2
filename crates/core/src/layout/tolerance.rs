//! Adaptive clustering tolerance.
//!
//! A fixed distance either merges rows of small elements or splits rows of
//! large ones, so the tolerance scales with the elements being clustered and
//! is clamped to a floor and ceiling.

use crate::config::EngineConfig;
use crate::geometry::{Axis, Geometry, mean};

/// Distance within which two elements belong to the same row (or column).
///
/// Uses the average height for [`Axis::Rows`] and the average width for
/// [`Axis::Columns`], scaled by `tolerance_ratio` and clamped to
/// `[min_tolerance, max_tolerance]`. An empty input yields
/// `default_tolerance`.
pub fn tolerance(geoms: &[Geometry], axis: Axis, config: &EngineConfig) -> f64 {
    match mean(geoms.iter().map(|g| axis.extent(g))) {
        Some(avg) => (avg * config.tolerance_ratio).clamp(config.min_tolerance, config.max_tolerance),
        None => config.default_tolerance,
    }
}
