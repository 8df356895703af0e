//! Renderer error types.

use thiserror::Error;
use thumbnail_core::StudioError;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while previewing or exporting.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Export was requested before the canvas surface was mounted.
    #[error("Export unavailable: {0}")]
    ExportUnavailable(String),

    /// Another export is still running.
    #[error("Export already in progress")]
    ExportInProgress,

    /// The capture primitive failed to produce a raster.
    #[error("Export failed: {0}")]
    Rasterization(String),

    /// The raster could not be encoded.
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// Writing the exported file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the document model.
    #[error(transparent)]
    Core(#[from] StudioError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_pass_through() {
        let err: RenderError = StudioError::CapacityExceeded { limit: 5 }.into();
        assert!(err.to_string().starts_with("Text limit reached"));
    }

    #[test]
    fn test_unavailable_names_reason() {
        let err = RenderError::ExportUnavailable("canvas not mounted".to_string());
        assert_eq!(err.to_string(), "Export unavailable: canvas not mounted");
    }
}
