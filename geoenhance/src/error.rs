//! Error types for the geoenhance pipelines

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can stop a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Raster reading or writing error
    #[error("I/O error: {0}")]
    Io(#[from] geoenhance_io::IoError),

    /// Contrast enhancement error
    #[error("filter error: {0}")]
    Filter(#[from] geoenhance_filter::FilterError),

    /// Upsampling error
    #[error("transform error: {0}")]
    Transform(#[from] geoenhance_transform::TransformError),

    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] geoenhance_core::Error),

    /// Input file or directory does not exist
    #[error("input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Super-resolution only accepts 1 or 3 bands
    #[error("{} has {count} bands; the input must contain either 1 or 3", path.display())]
    UnsupportedBandCount { path: PathBuf, count: usize },

    /// Requested band does not exist (1-based)
    #[error("band {band} out of range (raster has {count} bands)")]
    BandOutOfRange { band: usize, count: usize },

    /// Upsampler output does not match its declared scale
    #[error("upsampler produced {actual:?}, expected {expected:?}")]
    ScaleMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Two batch inputs map to the same output file
    #[error("{} and {} would both write {}", first.display(), second.display(), output.display())]
    OutputCollision {
        first: PathBuf,
        second: PathBuf,
        output: PathBuf,
    },

    /// Directory traversal error
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
