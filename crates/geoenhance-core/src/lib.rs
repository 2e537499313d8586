//! geoenhance core - raster data model
//!
//! This crate provides the data structures shared by every geoenhance crate:
//!
//! - [`Band`] - one plane of samples
//! - [`Raster`] / [`RasterMetadata`] - georeferenced band stack and its metadata
//! - [`GeoTransform`] - six-coefficient affine georeferencing
//! - [`SpatialRef`] - coordinate reference system as GeoTIFF GeoKeys
//! - [`SampleType`] - on-disk sample type
//! - [`DynamicRange`] - per-band [min, max] record for 8-bit compression

pub mod band;
pub mod error;
pub mod geotransform;
pub mod range;
pub mod raster;
pub mod sample;
pub mod spatial_ref;

pub use band::Band;
pub use error::{Error, Result};
pub use geotransform::GeoTransform;
pub use range::{BYTE_FACTOR, DynamicRange};
pub use raster::{Raster, RasterFormat, RasterMetadata};
pub use sample::SampleType;
pub use spatial_ref::SpatialRef;
