//! Super-resolution of 1- or 3-band rasters
//!
//! Each band is compressed onto [0, factor] with its own range, the bands
//! are stacked into an RGB image, upsampled, split back and expanded to
//! their source ranges. The output geotransform is scaled so the larger
//! raster covers the same ground.
//!
//! Samples that were no-data or NaN in the source are written as the
//! output no-data value over their whole upsampled block.

use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::config::SuperResConfig;
use geoenhance_core::{Band, DynamicRange, Raster, RasterMetadata};
use geoenhance_io::{read_geotiff, read_header, write_geotiff};
use geoenhance_transform::{Upsampler, split_channels, stack_channels};
use std::path::Path;
use tracing::{debug, info};

/// Check a band count is accepted by the super-resolution pipeline
pub fn is_supported_band_count(count: usize) -> bool {
    count == 1 || count == 3
}

/// Overwrite every output sample whose nearest source sample is invalid
fn mask_invalid(source: &Band, data: &mut [f64], scale: u32, nodata: f64) {
    if source.valid_count() == source.len() {
        return;
    }
    let out_width = (source.width() * scale) as usize;
    let scale = scale as usize;
    for (i, value) in data.iter_mut().enumerate() {
        let (x, y) = (i % out_width / scale, i / out_width / scale);
        if !source.is_valid(source.get_pixel_unchecked(x as u32, y as u32)) {
            *value = nodata;
        }
    }
}

/// Upsample `raster` and return the georeferenced result
pub fn super_resolve(
    raster: &Raster,
    upsampler: &mut dyn Upsampler,
    config: &SuperResConfig,
) -> PipelineResult<Raster> {
    let (width, height) = raster.dimensions();

    // One record per band, in band order
    let ranges = raster
        .bands()
        .iter()
        .map(|band| DynamicRange::from_band(band, config.factor))
        .collect::<Result<Vec<_>, _>>()?;
    for (i, range) in ranges.iter().enumerate() {
        debug!("Band {}: range [{}, {}]", i + 1, range.min(), range.max());
    }

    let planes: Vec<Vec<u8>> = raster
        .bands()
        .iter()
        .zip(&ranges)
        .map(|(band, range)| range.compress_band(band))
        .collect();
    let stacked = stack_channels(&planes, width, height)?;

    let scale = upsampler.scale();
    let upsampled = upsampler.upsample(&stacked)?;
    let expected = (width * scale, height * scale);
    if upsampled.dimensions() != expected {
        return Err(PipelineError::ScaleMismatch {
            expected,
            actual: upsampled.dimensions(),
        });
    }
    debug!(
        "{} upsampled {}x{} to {}x{}",
        upsampler.name(),
        width,
        height,
        expected.0,
        expected.1
    );

    let split = split_channels(&upsampled, raster.band_count(), config.merge)?;
    let bands = split
        .iter()
        .zip(&ranges)
        .zip(raster.bands())
        .map(|((plane, range), source)| {
            let mut data = range.decompress_plane(plane);
            mask_invalid(source, &mut data, scale, config.nodata);
            Band::from_data(expected.0, expected.1, data)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let metadata = RasterMetadata {
        geo_transform: raster.geo_transform().scaled(scale as f64),
        spatial_ref: raster.spatial_ref().cloned(),
        format: raster.format(),
        sample_type: config.output_type,
        nodata: Some(config.nodata),
    };
    Ok(Raster::new(bands, metadata)?)
}

/// Run the super-resolution pipeline on one file.
///
/// The input must exist and hold 1 or 3 bands; both are checked before any
/// pixel is decoded or any output is created.
pub fn run_superres(
    input: &Path,
    output: &Path,
    upsampler: &mut dyn Upsampler,
    config: &SuperResConfig,
) -> PipelineResult<()> {
    if !input.is_file() {
        return Err(PipelineError::InputNotFound(input.to_path_buf()));
    }

    let header = read_header(input)?;
    if !is_supported_band_count(header.band_count) {
        return Err(PipelineError::UnsupportedBandCount {
            path: input.to_path_buf(),
            count: header.band_count,
        });
    }

    let raster = read_geotiff(input)?;
    info!(
        "Super-resolving {} ({}x{}, {} band(s), {}) by {}",
        input.display(),
        raster.width(),
        raster.height(),
        raster.band_count(),
        raster.sample_type(),
        upsampler.scale()
    );

    let result = super_resolve(&raster, upsampler, config)?;
    write_geotiff(output, &result, &config.write_options())?;
    info!(
        "Wrote {} ({}x{})",
        output.display(),
        result.width(),
        result.height()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoenhance_core::{GeoTransform, SampleType};
    use geoenhance_transform::{InterpolatingUpsampler, ScaleFilter};
    use image::{Rgb32FImage, RgbImage};

    struct Shrinking;

    impl Upsampler for Shrinking {
        fn name(&self) -> &str {
            "shrinking"
        }

        fn scale(&self) -> u32 {
            4
        }

        fn upsample(
            &mut self,
            input: &RgbImage,
        ) -> geoenhance_transform::TransformResult<Rgb32FImage> {
            Ok(Rgb32FImage::new(input.width(), input.height()))
        }
    }

    fn raster(bands: Vec<Band>) -> Raster {
        let meta = RasterMetadata::default()
            .with_sample_type(SampleType::U16)
            .with_geo_transform(GeoTransform::new(500000.0, 6000000.0, 0.25, -0.25));
        Raster::new(bands, meta).unwrap()
    }

    #[test]
    fn test_output_geometry_and_metadata() {
        let band = Band::from_data(3, 2, vec![0.0, 100.0, 200.0, 300.0, 400.0, 500.0]).unwrap();
        let src = raster(vec![band]);
        let mut up = InterpolatingUpsampler::new(4, ScaleFilter::Nearest).unwrap();
        let out = super_resolve(&src, &mut up, &SuperResConfig::default()).unwrap();

        assert_eq!(out.dimensions(), (12, 8));
        assert_eq!(out.sample_type(), SampleType::F32);
        assert_eq!(out.nodata(), Some(-99.0));
        assert_eq!(
            out.geo_transform().to_gdal(),
            [500000.0, 0.0625, 0.0, 6000000.0, 0.0, -0.0625]
        );
        let (min, max) = out.band(0).unwrap().min_max().unwrap();
        assert!(min >= -2.0 && max <= 502.0, "[{}, {}]", min, max);
    }

    #[test]
    fn test_bands_keep_their_own_ranges() {
        let low = Band::from_data(2, 2, vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        let high = low.map(|v| 1000.0 + v * 1000.0);
        let mid = low.map(|v| -v);
        let src = raster(vec![low, high, mid]);
        let mut up = InterpolatingUpsampler::new(2, ScaleFilter::Nearest).unwrap();
        let out = super_resolve(&src, &mut up, &SuperResConfig::default()).unwrap();

        let ranges: Vec<(f64, f64)> = out
            .bands()
            .iter()
            .map(|b| b.min_max().unwrap())
            .collect();
        assert!(ranges[0].1 <= 3.1);
        assert!(ranges[1].0 >= 990.0);
        assert!(ranges[2].1 <= 0.1);
    }

    #[test]
    fn test_invalid_samples_become_nodata() {
        let band = Band::from_data(2, 2, vec![-99.0, 10.0, f64::NAN, 30.0]).unwrap();
        let meta = RasterMetadata::default()
            .with_sample_type(SampleType::F32)
            .with_nodata(Some(-99.0));
        let src = Raster::new(vec![band], meta).unwrap();
        let mut up = InterpolatingUpsampler::new(4, ScaleFilter::Nearest).unwrap();
        let out = super_resolve(&src, &mut up, &SuperResConfig::default()).unwrap();

        let band = out.band(0).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                let v = band.get_pixel(x, y).unwrap();
                // Left column of the source is -99 and NaN
                if x >= 4 {
                    assert!(band.is_valid(v), "({}, {}) = {}", x, y, v);
                } else {
                    assert_eq!(v, -99.0, "({}, {})", x, y);
                }
            }
        }
        assert_eq!(band.valid_count(), 32);
        let (min, max) = band.min_max().unwrap();
        assert!((min - 10.0).abs() < 0.2 && (max - 30.0).abs() < 0.2, "[{}, {}]", min, max);
    }

    #[test]
    fn test_scale_mismatch() {
        let src = raster(vec![Band::new_with_value(2, 2, 1.0).unwrap()]);
        assert!(matches!(
            super_resolve(&src, &mut Shrinking, &SuperResConfig::default()),
            Err(PipelineError::ScaleMismatch { .. })
        ));
    }

    #[test]
    fn test_supported_band_counts() {
        assert!(is_supported_band_count(1));
        assert!(is_supported_band_count(3));
        assert!(!is_supported_band_count(2));
        assert!(!is_supported_band_count(4));
    }
}
