//! Error types for thermal analysis

use thiserror::Error;

use crate::grid::GRID_CELLS;

/// Failure raised while turning raw samples into a detection result
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectionError {
    /// Fewer than 64 samples were supplied
    #[error("insufficient data: need {required} thermal points, received {received}")]
    InsufficientData { received: usize, required: usize },

    /// Input was present but malformed
    #[error("invalid thermal data: {0}")]
    Validation(String),
}

impl DetectionError {
    pub fn insufficient(received: usize) -> Self {
        DetectionError::InsufficientData {
            received,
            required: GRID_CELLS,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DetectionError::Validation(message.into())
    }

    /// Short label used for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            DetectionError::InsufficientData { .. } => "insufficient_data",
            DetectionError::Validation(_) => "validation",
        }
    }
}
