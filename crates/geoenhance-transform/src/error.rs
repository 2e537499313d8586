//! Error types for geoenhance-transform

use thiserror::Error;

/// Errors that can occur during upsampling
#[derive(Debug, Error)]
pub enum TransformError {
    /// Invalid scale factor
    #[error("invalid scale factor: {0}")]
    InvalidScaleFactor(String),

    /// Invalid upsampling parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Channel count does not match what the operation needs
    #[error("channel mismatch: expected {expected}, got {actual}")]
    ChannelMismatch { expected: usize, actual: usize },

    /// Model loading or inference failed
    #[error("model error: {0}")]
    Model(String),
}

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;
