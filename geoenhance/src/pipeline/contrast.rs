//! Single-band contrast enhancement
//!
//! Reads one band, brings it onto the 8-bit scale if needed, runs a
//! [`BandEnhancer`] over it and writes a `Byte` raster that keeps the
//! source geotransform and projection.

use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::config::ContrastConfig;
use geoenhance_core::{BYTE_FACTOR, Band, DynamicRange, Raster, RasterMetadata, SampleType};
use geoenhance_filter::{BandEnhancer, Clahe};
use geoenhance_io::{read_geotiff, write_geotiff};
use image::GrayImage;
use std::path::Path;
use tracing::{debug, info};

/// Convert a band to 8-bit samples.
///
/// `Byte` bands are taken as-is; anything else is stretched linearly from
/// its own [min, max] onto [0, 255].
pub fn band_to_gray8(band: &Band, sample_type: SampleType) -> PipelineResult<GrayImage> {
    if sample_type == SampleType::U8 {
        return Ok(band.to_gray8()?);
    }

    let range = DynamicRange::from_band(band, BYTE_FACTOR)?;
    debug!(
        "Stretching {} band [{}, {}] to 8 bit",
        sample_type,
        range.min(),
        range.max()
    );
    let (width, height) = band.dimensions();
    GrayImage::from_raw(width, height, range.compress_band(band)).ok_or(PipelineError::Core(
        geoenhance_core::Error::InvalidDimension { width, height },
    ))
}

/// Enhance band `band` (1-based) of `raster`.
///
/// The result is a single-band `Byte` raster with the source's dimensions,
/// geotransform and spatial reference.
pub fn enhance_raster(
    raster: &Raster,
    band: usize,
    enhancer: &dyn BandEnhancer,
) -> PipelineResult<Raster> {
    let count = raster.band_count();
    if band == 0 || band > count {
        return Err(PipelineError::BandOutOfRange { band, count });
    }

    let gray = band_to_gray8(raster.band(band - 1)?, raster.sample_type())?;
    let enhanced = enhancer.enhance(&gray)?;
    debug!(
        "Applied {} to band {} ({}x{})",
        enhancer.name(),
        band,
        enhanced.width(),
        enhanced.height()
    );

    let metadata = RasterMetadata {
        geo_transform: *raster.geo_transform(),
        spatial_ref: raster.spatial_ref().cloned(),
        format: raster.format(),
        sample_type: SampleType::U8,
        nodata: None,
    };
    Ok(Raster::new(vec![Band::from_gray8(&enhanced)?], metadata)?)
}

/// Run the contrast pipeline with CLAHE configured from `config`
pub fn run_contrast(input: &Path, output: &Path, config: &ContrastConfig) -> PipelineResult<()> {
    run_contrast_with(input, output, config, &Clahe::new(config.clahe))
}

/// Run the contrast pipeline with any enhancer
pub fn run_contrast_with(
    input: &Path,
    output: &Path,
    config: &ContrastConfig,
    enhancer: &dyn BandEnhancer,
) -> PipelineResult<()> {
    if !input.exists() {
        return Err(PipelineError::InputNotFound(input.to_path_buf()));
    }

    let raster = read_geotiff(input)?;
    info!(
        "Enhancing {} ({}x{}, band {} of {}) with {}",
        input.display(),
        raster.width(),
        raster.height(),
        config.band,
        raster.band_count(),
        enhancer.name()
    );

    let enhanced = enhance_raster(&raster, config.band, enhancer)?;
    write_geotiff(output, &enhanced, &config.write_options())?;
    info!("Enhanced image saved to {}", output.display());
    Ok(())
}
