//! I/O error types
//!
//! Provides a unified error type for GeoTIFF reading and writing. The codec
//! errors of the `tiff` crate are mapped into `IoError` variants so callers
//! only need to handle one error type.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for raster I/O operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// Standard I/O error (permission denied, disk full, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input path does not exist
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The output file could not be created
    #[error("cannot create {}: {source}", path.display())]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is a TIFF variant this crate does not handle
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The raster data is structurally invalid
    #[error("invalid raster data: {0}")]
    InvalidData(String),

    /// The TIFF decoder returned an error
    #[error("decode error: {0}")]
    DecodeError(String),

    /// The TIFF encoder returned an error
    #[error("encode error: {0}")]
    EncodeError(String),

    /// An error from the core library (e.g. band size mismatch)
    #[error("core error: {0}")]
    Core(#[from] geoenhance_core::Error),
}

/// Convenience alias for I/O results.
pub type IoResult<T> = Result<T, IoError>;
