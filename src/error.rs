//! Error types for the charting library.

use thiserror::Error;

/// Errors that can occur while building, laying out, or exporting charts.
#[derive(Error, Debug)]
pub enum ChartError {
    /// A precondition on an argument was violated (negative size, inverted range, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An index was outside the valid range of a collection.
    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A key was not present in a keyed collection.
    #[error("unknown key: {0}")]
    UnknownKey(String),

    /// An edge/position name outside the known set.
    #[error("unrecognised edge: {0}")]
    UnknownEdge(String),

    /// An optional capability (e.g. PDF export) has no registered provider.
    #[error("operation unavailable: {0}")]
    Unavailable(String),

    /// The drawing backend reported a failure.
    #[error("rendering error: {0}")]
    Render(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Raster encoding error
    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChartError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ChartError::InvalidArgument(msg.into())
    }

    /// Map any backend error into [`ChartError::Render`] (plotters errors are only `Debug`).
    pub(crate) fn render<E: std::fmt::Debug>(e: E) -> Self {
        ChartError::Render(format!("{e:?}"))
    }
}

/// Result type for chart operations
pub type ChartResult<T> = Result<T, ChartError>;
