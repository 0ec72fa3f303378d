//! Error type shared by the extractor entry points.
//!
//! The algorithm itself has no error-driven control flow: degenerate tiles and
//! degenerate scatter matrices are expected data and handled inline. Errors
//! only arise from invalid configuration or missing/mismatched frame inputs.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaneError {
    /// Rejected at setup, before any frame is processed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A frame input required by the current configuration was not supplied.
    #[error("missing required input: {0}")]
    MissingInput(&'static str),

    /// Normal grid dimensions do not match the point grid.
    #[error("dimension mismatch: expected {expected_w}x{expected_h}, got {got_w}x{got_h}")]
    DimensionMismatch {
        expected_w: usize,
        expected_h: usize,
        got_w: usize,
        got_h: usize,
    },
}
