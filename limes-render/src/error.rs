//! Error types for rendering

use thiserror::Error;

/// Rendering errors
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RenderError {
    /// JSON serialization failed
    #[error("cannot serialize report: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV output failed
    #[error("cannot write CSV: {0}")]
    Csv(String),

    /// Writing to the output failed
    #[error("cannot write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for rendering
pub type Result<T> = std::result::Result<T, RenderError>;
