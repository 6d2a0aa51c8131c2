//! Engine configuration.
//!
//! Contains [`EngineConfig`] for controlling clustering tolerance, fallback
//! sizes, separator naming and the interactive tuner.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::{GridError, Result};
use crate::model::Color;

/// Parameters shared by every engine component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Clustering tolerance as a fraction of the average element extent
    /// along the clustered axis.
    pub tolerance_ratio: f64,

    /// Lower clamp for the adaptive tolerance, in points.
    pub min_tolerance: f64,

    /// Upper clamp for the adaptive tolerance, in points.
    pub max_tolerance: f64,

    /// Tolerance used when there is nothing to measure.
    pub default_tolerance: f64,

    /// Spacing the tuner normalizes to when a session opens, and the gap
    /// assumed between rows/columns when a grid has only one of them.
    pub default_spacing: f64,

    /// Height used for new rows when no neighbour can be measured.
    pub fallback_row_height: f64,

    /// Width used for new columns when no neighbour can be measured.
    pub fallback_column_width: f64,

    /// Gap inserted between elements produced from a table's cells.
    pub table_cell_spacing: f64,

    /// Label prefix for synthesized header cells ("Header 1", ...).
    pub header_label_prefix: SmolStr,

    /// Vertical gap between header labels and the first grid row.
    pub header_gap: f64,

    /// Name prefix identifying row separator lines.
    pub separator_prefix: SmolStr,

    /// Name of the line drawn under a synthesized header row.
    pub header_separator_name: SmolStr,

    /// Metadata key carrying the separator index on hosts with metadata.
    pub separator_metadata_key: SmolStr,

    pub separator_color: Color,

    pub separator_weight: f64,

    /// Quiet period before a pending preview is recomputed.
    #[serde(with = "duration_millis")]
    pub preview_debounce: Duration,

    /// Smallest width/height a resize may produce.
    pub min_element_size: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tolerance_ratio: 0.3,
            min_tolerance: 3.0,
            max_tolerance: 25.0,
            default_tolerance: 10.0,
            default_spacing: 10.0,
            fallback_row_height: 30.0,
            fallback_column_width: 80.0,
            table_cell_spacing: 0.0,
            header_label_prefix: SmolStr::new_static("Header"),
            header_gap: 8.0,
            separator_prefix: SmolStr::new_static("MosaicSeparator_"),
            header_separator_name: SmolStr::new_static("MosaicHeaderSeparator"),
            separator_metadata_key: SmolStr::new_static("mosaic.separator"),
            separator_color: Color::GRAY,
            separator_weight: 1.0,
            preview_debounce: Duration::from_millis(150),
            min_element_size: 1.0,
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Rejects values the layout code cannot work with: non-finite numbers,
    /// negative tolerances, a tolerance floor above its ceiling and
    /// non-positive fallback sizes.
    pub fn validate(&self) -> Result<()> {
        let lengths = [
            ("tolerance_ratio", self.tolerance_ratio),
            ("min_tolerance", self.min_tolerance),
            ("max_tolerance", self.max_tolerance),
            ("default_tolerance", self.default_tolerance),
            ("default_spacing", self.default_spacing),
            ("fallback_row_height", self.fallback_row_height),
            ("fallback_column_width", self.fallback_column_width),
            ("table_cell_spacing", self.table_cell_spacing),
            ("header_gap", self.header_gap),
            ("separator_weight", self.separator_weight),
            ("min_element_size", self.min_element_size),
        ];
        if let Some((name, _)) = lengths.iter().find(|(_, v)| !v.is_finite()) {
            return Err(GridError::precondition(format!("config value {name} must be a finite number")));
        }
        if self.tolerance_ratio < 0.0 || self.min_tolerance < 0.0 || self.default_tolerance < 0.0 {
            return Err(GridError::precondition("clustering tolerances must not be negative"));
        }
        if self.min_tolerance > self.max_tolerance {
            return Err(GridError::precondition(format!(
                "min_tolerance {} exceeds max_tolerance {}",
                self.min_tolerance, self.max_tolerance
            )));
        }
        if !(self.fallback_row_height > 0.0 && self.fallback_column_width > 0.0 && self.min_element_size > 0.0) {
            return Err(GridError::precondition("fallback and minimum sizes must be positive"));
        }
        Ok(())
    }
}

/// Fluent builder over [`EngineConfig`].
///
/// # Example
/// ```
/// use mosaic_core::EngineConfig;
///
/// let config = EngineConfig::builder()
///     .default_spacing(12.0)
///     .tolerance_clamp(2.0, 30.0)
///     .build();
/// assert_eq!(config.default_spacing, 12.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn tolerance_ratio(mut self, ratio: f64) -> Self {
        self.config.tolerance_ratio = ratio;
        self
    }

    /// Sets the floor and ceiling of the adaptive tolerance.
    ///
    /// # Panics
    /// Panics if `min` is greater than `max`.
    pub fn tolerance_clamp(mut self, min: f64, max: f64) -> Self {
        assert!(min <= max, "tolerance floor must not exceed its ceiling");
        self.config.min_tolerance = min;
        self.config.max_tolerance = max;
        self
    }

    pub fn default_spacing(mut self, spacing: f64) -> Self {
        self.config.default_spacing = spacing;
        self
    }

    pub fn table_cell_spacing(mut self, spacing: f64) -> Self {
        self.config.table_cell_spacing = spacing;
        self
    }

    pub fn separator_prefix(mut self, prefix: &str) -> Self {
        self.config.separator_prefix = SmolStr::new(prefix);
        self
    }

    pub fn header_label_prefix(mut self, prefix: &str) -> Self {
        self.config.header_label_prefix = SmolStr::new(prefix);
        self
    }

    pub fn preview_debounce(mut self, debounce: Duration) -> Self {
        self.config.preview_debounce = debounce;
        self
    }

    pub fn build(self) -> EngineConfig {
        self.config
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"default_spacing": 4.0, "preview_debounce": 50}"#).unwrap();
        assert_eq!(config.default_spacing, 4.0);
        assert_eq!(config.preview_debounce, Duration::from_millis(50));
        assert_eq!(config.max_tolerance, 25.0);
    }

    #[test]
    fn inverted_tolerance_clamp_is_rejected() {
        let config: EngineConfig = serde_json::from_str(r#"{"min_tolerance": 30.0, "max_tolerance": 5.0}"#).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.is_precondition());
        assert_eq!(err.to_string(), "min_tolerance 30 exceeds max_tolerance 5");
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let config = EngineConfig {
            max_tolerance: f64::NAN,
            ..EngineConfig::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("max_tolerance"));

        let config = EngineConfig {
            fallback_row_height: 0.0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
