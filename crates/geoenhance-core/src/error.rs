//! Error types for geoenhance-core
//!
//! Provides a unified error type for the raster data model. Each variant
//! carries enough context for diagnostics without exposing internal layout.

use thiserror::Error;

/// geoenhance core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid raster dimensions
    #[error("invalid raster dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Band dimension mismatch
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Band has no valid (finite, non-nodata) samples
    #[error("band has no valid samples")]
    EmptyBand,

    /// A raster needs at least one band
    #[error("raster has no bands")]
    NoBands,
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
