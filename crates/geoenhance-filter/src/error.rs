//! Error types for geoenhance-filter

use thiserror::Error;

/// Errors that can occur during filtering operations
#[derive(Debug, Error)]
pub enum FilterError {
    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The input image has no pixels
    #[error("empty image")]
    EmptyImage,
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
