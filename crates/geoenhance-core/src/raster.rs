//! Raster - a georeferenced stack of bands

use crate::band::Band;
use crate::error::{Error, Result};
use crate::geotransform::GeoTransform;
use crate::sample::SampleType;
use crate::spatial_ref::SpatialRef;
use std::fmt;

/// Raster file format (driver)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterFormat {
    /// GeoTIFF
    #[default]
    GTiff,
}

impl RasterFormat {
    /// GDAL driver short name
    pub fn short_name(self) -> &'static str {
        match self {
            RasterFormat::GTiff => "GTiff",
        }
    }

    /// Canonical file extension, without the dot
    pub fn extension(self) -> &'static str {
        match self {
            RasterFormat::GTiff => "tif",
        }
    }

    /// Look up a format by driver short name (case-insensitive)
    pub fn from_short_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("gtiff") {
            Some(RasterFormat::GTiff)
        } else {
            None
        }
    }
}

impl fmt::Display for RasterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Everything about a raster except its samples
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RasterMetadata {
    /// Pixel/line to georeferenced coordinates
    pub geo_transform: GeoTransform,
    /// Coordinate reference system, `None` when the source had no GeoKeys
    pub spatial_ref: Option<SpatialRef>,
    /// File format
    pub format: RasterFormat,
    /// Sample type on disk
    pub sample_type: SampleType,
    /// No-data sentinel shared by all bands
    pub nodata: Option<f64>,
}

impl RasterMetadata {
    /// Same metadata with a different sample type
    pub fn with_sample_type(mut self, sample_type: SampleType) -> Self {
        self.sample_type = sample_type;
        self
    }

    /// Same metadata with a different geotransform
    pub fn with_geo_transform(mut self, geo_transform: GeoTransform) -> Self {
        self.geo_transform = geo_transform;
        self
    }

    /// Same metadata with a different no-data value
    pub fn with_nodata(mut self, nodata: Option<f64>) -> Self {
        self.nodata = nodata;
        self
    }

    /// Printable projection: `EPSG:<code>`, a citation, or empty when unknown
    pub fn projection(&self) -> String {
        self.spatial_ref
            .as_ref()
            .map(SpatialRef::description)
            .unwrap_or_default()
    }
}

/// A georeferenced raster: equally sized bands plus metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    bands: Vec<Band>,
    metadata: RasterMetadata,
}

impl Raster {
    /// Assemble a raster.
    ///
    /// The metadata's no-data value is copied onto every band.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoBands` for an empty band list and
    /// `Error::DimensionMismatch` if the bands differ in size.
    pub fn new(mut bands: Vec<Band>, metadata: RasterMetadata) -> Result<Self> {
        let first = bands.first().ok_or(Error::NoBands)?.dimensions();
        if let Some(other) = bands.iter().find(|b| b.dimensions() != first) {
            return Err(Error::DimensionMismatch {
                expected: first,
                actual: other.dimensions(),
            });
        }
        for band in &mut bands {
            band.set_nodata(metadata.nodata);
        }
        Ok(Self { bands, metadata })
    }

    /// Raster width in pixels
    pub fn width(&self) -> u32 {
        self.bands[0].width()
    }

    /// Raster height in pixels
    pub fn height(&self) -> u32 {
        self.bands[0].height()
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (u32, u32) {
        self.bands[0].dimensions()
    }

    /// Number of bands
    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// Band by zero-based index
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` for a missing band.
    pub fn band(&self, index: usize) -> Result<&Band> {
        self.bands.get(index).ok_or(Error::IndexOutOfBounds {
            index,
            len: self.bands.len(),
        })
    }

    /// All bands in file order
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Consume the raster, returning bands and metadata
    pub fn into_parts(self) -> (Vec<Band>, RasterMetadata) {
        (self.bands, self.metadata)
    }

    pub fn metadata(&self) -> &RasterMetadata {
        &self.metadata
    }

    pub fn geo_transform(&self) -> &GeoTransform {
        &self.metadata.geo_transform
    }

    pub fn spatial_ref(&self) -> Option<&SpatialRef> {
        self.metadata.spatial_ref.as_ref()
    }

    pub fn sample_type(&self) -> SampleType {
        self.metadata.sample_type
    }

    pub fn format(&self) -> RasterFormat {
        self.metadata.format
    }

    pub fn nodata(&self) -> Option<f64> {
        self.metadata.nodata
    }

    /// Printable projection, empty when unknown
    pub fn projection(&self) -> String {
        self.metadata.projection()
    }
}
