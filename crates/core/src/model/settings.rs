//! Settings captured from user input for matrix-building operations.
//!
//! These are plain values; once captured they are never mutated. Lengths are
//! in points, `from_cm` constructors convert dialog input.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::model::style::Margins;
use crate::units::cm_to_pt;

fn check_dims(rows: usize, columns: usize) -> Result<()> {
    if rows == 0 || columns == 0 {
        return Err(GridError::precondition(
            "rows and columns must both be at least 1",
        ));
    }
    Ok(())
}

fn check_spacing(spacing: f64) -> Result<()> {
    if !spacing.is_finite() || spacing < 0.0 {
        return Err(GridError::precondition("spacing must be zero or positive"));
    }
    Ok(())
}

/// Parameters for creating a fresh matrix of rectangles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatrixSettings {
    pub rows: usize,
    pub columns: usize,
    pub cell_width: f64,
    pub cell_height: f64,
    pub spacing: f64,
    #[serde(default)]
    pub include_text: bool,
    #[serde(default)]
    pub margins: Option<Margins>,
}

impl MatrixSettings {
    /// Captures settings entered in centimetres.
    pub fn from_cm(
        rows: usize,
        columns: usize,
        cell_width_cm: f64,
        cell_height_cm: f64,
        spacing_cm: f64,
        include_text: bool,
    ) -> Self {
        Self {
            rows,
            columns,
            cell_width: cm_to_pt(cell_width_cm),
            cell_height: cm_to_pt(cell_height_cm),
            spacing: cm_to_pt(spacing_cm),
            include_text,
            margins: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_dims(self.rows, self.columns)?;
        check_spacing(self.spacing)?;
        if !(self.cell_width > 0.0 && self.cell_height > 0.0) {
            return Err(GridError::precondition(
                "cell width and height must be positive",
            ));
        }
        Ok(())
    }
}

/// Parameters for cutting one element into a rows x columns tiling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplitSettings {
    pub rows: usize,
    pub columns: usize,
    pub spacing: f64,
    #[serde(default)]
    pub include_text: bool,
}

impl SplitSettings {
    pub fn from_cm(rows: usize, columns: usize, spacing_cm: f64, include_text: bool) -> Self {
        Self {
            rows,
            columns,
            spacing: cm_to_pt(spacing_cm),
            include_text,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_dims(self.rows, self.columns)?;
        check_spacing(self.spacing)
    }
}

/// Parameters for copying one element into a rows x columns arrangement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DuplicateSettings {
    pub rows: usize,
    pub columns: usize,
    pub spacing: f64,
    #[serde(default = "default_true")]
    pub include_text: bool,
}

fn default_true() -> bool {
    true
}

impl DuplicateSettings {
    pub fn from_cm(rows: usize, columns: usize, spacing_cm: f64, include_text: bool) -> Self {
        Self {
            rows,
            columns,
            spacing: cm_to_pt(spacing_cm),
            include_text,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_dims(self.rows, self.columns)?;
        check_spacing(self.spacing)
    }
}

/// Text-frame margins to apply to a selection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarginSettings {
    pub margins: Margins,
}

impl MarginSettings {
    pub fn from_cm(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            margins: Margins {
                left: cm_to_pt(left),
                top: cm_to_pt(top),
                right: cm_to_pt(right),
                bottom: cm_to_pt(bottom),
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        let m = self.margins;
        if [m.left, m.top, m.right, m.bottom]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(GridError::precondition("margins must be zero or positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rows_is_rejected() {
        let s = SplitSettings {
            rows: 0,
            columns: 2,
            spacing: 0.0,
            include_text: false,
        };
        assert!(matches!(s.validate(), Err(GridError::Precondition(_))));
    }

    #[test]
    fn matrix_from_cm_converts() {
        let s = MatrixSettings::from_cm(2, 3, 2.54, 1.27, 0.0, false);
        assert!((s.cell_width - 72.0).abs() < 1e-9);
        assert!((s.cell_height - 36.0).abs() < 1e-9);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn negative_margin_is_rejected() {
        let s = MarginSettings {
            margins: Margins::uniform(-1.0),
        };
        assert!(s.validate().is_err());
    }
}
