//! geoenhance - Contrast enhancement and super-resolution for GeoTIFF rasters
//!
//! # Overview
//!
//! - Contrast: CLAHE (or global equalization) of one band, written back as
//!   an 8-bit raster with the source georeferencing
//! - Super-resolution: 1- or 3-band rasters upsampled by an [`Upsampler`],
//!   each band restored to its own value range, geotransform rescaled
//! - Batch: super-resolution of every GeoTIFF in a directory
//!
//! # Example
//!
//! ```no_run
//! use geoenhance::pipeline::{SuperResConfig, run_superres};
//! use geoenhance::transform::InterpolatingUpsampler;
//! use std::path::Path;
//!
//! let mut upsampler = InterpolatingUpsampler::default();
//! run_superres(
//!     Path::new("scene.tif"),
//!     Path::new("scene_25cm.tif"),
//!     &mut upsampler,
//!     &SuperResConfig::default(),
//! )
//! .unwrap();
//! ```

mod error;
pub mod pipeline;

// Re-export core types (primary data structures used everywhere)
pub use geoenhance_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use geoenhance_filter as filter;
pub use geoenhance_io as io;
pub use geoenhance_transform as transform;

pub use error::{PipelineError, PipelineResult};
pub use geoenhance_filter::BandEnhancer;
pub use geoenhance_transform::Upsampler;
