//! Error types for document operations.

use thiserror::Error;

/// Result type for document operations.
pub type StudioResult<T> = Result<T, StudioError>;

/// Errors that can occur while mutating or reading the document.
///
/// The `Display` form of each variant doubles as the notice shown to the user.
#[derive(Debug, Error)]
pub enum StudioError {
    /// Adding another text element would exceed the element cap.
    #[error("Text limit reached: at most {limit} text elements are allowed")]
    CapacityExceeded {
        /// The maximum number of text elements.
        limit: usize,
    },

    /// The mutation would break a document invariant.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// A field value is outside its permitted range.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Text element not found in the document.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Gradient stop not found in the background.
    #[error("Gradient stop not found: {0}")]
    StopNotFound(String),

    /// Mesh point not found in the background.
    #[error("Mesh point not found: {0}")]
    MeshPointNotFound(String),

    /// A color string could not be parsed.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Command or document serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
