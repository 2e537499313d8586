//! Synthetic rasters for tests
//!
//! No binary test data lives in the repository; tests build their inputs
//! here and write them into a temporary directory.

use crate::error::{TestError, TestResult};
use geoenhance_core::{Band, GeoTransform, Raster, RasterMetadata, SampleType, SpatialRef};
use geoenhance_io::{GeoTiffOptions, write_geotiff};
use std::path::{Path, PathBuf};

/// EPSG code used by the synthetic rasters (WGS 84 / UTM zone 18N)
pub const FIXTURE_EPSG: u16 = 32618;

/// 25 cm north-up pixels anchored at (500000, 6000000)
pub fn utm_geotransform() -> GeoTransform {
    GeoTransform::new(500000.0, 6000000.0, 0.25, -0.25)
}

/// Diagonal ramp from `min` at the top-left corner to `max` at the bottom-right
pub fn ramp_band(width: u32, height: u32, min: f64, max: f64) -> TestResult<Band> {
    let steps = ((width + height).saturating_sub(2)).max(1) as f64;
    let data = (0..height)
        .flat_map(|y| (0..width).map(move |x| min + (max - min) * (x + y) as f64 / steps))
        .collect();
    Ok(Band::from_data(width, height, data)?)
}

/// Band holding one value everywhere
pub fn constant_band(width: u32, height: u32, value: f64) -> TestResult<Band> {
    Ok(Band::new_with_value(width, height, value)?)
}

/// Raster of `band_count` ramps over [min, max].
///
/// Band *b* tops out at `max - b * (max - min) / 10`, so every band has
/// its own range.
pub fn synthetic_raster(
    width: u32,
    height: u32,
    band_count: usize,
    sample_type: SampleType,
    min: f64,
    max: f64,
) -> TestResult<Raster> {
    let bands = (0..band_count)
        .map(|b| ramp_band(width, height, min, max - b as f64 * (max - min) / 10.0))
        .collect::<TestResult<Vec<_>>>()?;
    let metadata = RasterMetadata {
        geo_transform: utm_geotransform(),
        spatial_ref: Some(SpatialRef::from_epsg(FIXTURE_EPSG)),
        sample_type,
        ..Default::default()
    };
    Ok(Raster::new(bands, metadata)?)
}

/// Write a raster as `dir/name`, uncompressed
pub fn write_fixture(dir: &Path, name: &str, raster: &Raster) -> TestResult<PathBuf> {
    let path = dir.join(name);
    write_geotiff(&path, raster, &GeoTiffOptions::default()).map_err(|e| {
        TestError::RasterWrite {
            path: path.display().to_string(),
            message: e.to_string(),
        }
    })?;
    Ok(path)
}
