//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur during regression testing
#[derive(Debug, Error)]
pub enum TestError {
    /// Failed to write a fixture or output raster
    #[error("failed to write raster '{path}': {message}")]
    RasterWrite { path: String, message: String },

    /// Failed to read back a raster
    #[error("failed to read raster '{path}': {message}")]
    RasterRead { path: String, message: String },

    /// Failed to build a synthetic raster
    #[error("invalid fixture: {0}")]
    Fixture(#[from] geoenhance_core::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
