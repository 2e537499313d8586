//! geoenhance I/O - GeoTIFF reading and writing
//!
//! - [`read_geotiff`] / [`read_geotiff_from`] decode a GeoTIFF into a
//!   [`Raster`](geoenhance_core::Raster) with its geotransform, GeoKeys and
//!   no-data value.
//! - [`read_header`] / [`read_header_from`] probe structure and
//!   georeferencing without decoding pixels.
//! - [`write_geotiff`] / [`write_geotiff_to`] encode a raster back to GeoTIFF.

pub mod error;
pub mod geokeys;
pub mod geotiff;
pub mod header;

pub use error::{IoError, IoResult};
pub use geotiff::{
    GeoTiffOptions, TiffCompression, read_geotiff, read_geotiff_from, write_geotiff,
    write_geotiff_to,
};
pub use header::{GeoTiffHeader, read_header, read_header_from};
