//! Error types for the mosaic layout engine.

use thiserror::Error;

use crate::host::Operation;
use crate::model::ElementId;

/// Primary error type for engine operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// The selection does not satisfy the operation's requirements.
    /// Raised before anything is mutated.
    #[error("{0}")]
    Precondition(String),

    #[error("could not detect a row/column layout in the {count} selected elements")]
    GridDetection { count: usize },

    #[error("host operation `{op}` failed: {reason}")]
    Host { op: &'static str, reason: String },

    #[error("element not found: {0}")]
    ElementNotFound(ElementId),

    #[error("table cell ({row}, {col}) is out of range")]
    CellOutOfRange { row: usize, col: usize },

    #[error("{0} is not available")]
    FeatureDenied(Operation),

    #[error("adjustment session is closed")]
    SessionClosed,
}

impl GridError {
    pub fn precondition(msg: impl Into<String>) -> Self {
        GridError::Precondition(msg.into())
    }

    pub fn host(op: &'static str, reason: impl Into<String>) -> Self {
        GridError::Host {
            op,
            reason: reason.into(),
        }
    }

    /// True for failures that were detected before any mutation took place.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            GridError::Precondition(_) | GridError::GridDetection { .. } | GridError::FeatureDenied(_)
        )
    }
}

/// Convenience Result type alias for GridError.
pub type Result<T> = std::result::Result<T, GridError>;
