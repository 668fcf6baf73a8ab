//! Core error types for `azlens`.

use thiserror::Error;

/// Core error type for `azlens` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A date string did not match the expected `YYYY-MM-DD` form.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A date range with `end` before `start`.
    #[error("Invalid date range: {start} > {end}")]
    InvalidRange {
        /// Range start.
        start: String,
        /// Range end.
        end: String,
    },

    /// Invalid data in an API payload.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
