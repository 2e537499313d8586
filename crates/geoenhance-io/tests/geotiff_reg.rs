//! GeoTIFF regression test
//!
//! Writes synthetic rasters of every supported sample type and band layout,
//! reads them back and checks samples and georeferencing survive.

use geoenhance_core::{Band, GeoTransform, Raster, RasterMetadata, SampleType, SpatialRef};
use geoenhance_io::{
    GeoTiffOptions, IoError, TiffCompression, read_geotiff, read_header, write_geotiff,
};
use geoenhance_test::RegParams;
use geoenhance_test::fixtures::{synthetic_raster, utm_geotransform};

// ==========================================================================
// Test 1: every sample type, 1 and 3 bands
// ==========================================================================

#[test]
fn geotiff_reg_sample_types() {
    let mut rp = RegParams::new("geotiff_types");

    let types = [
        (SampleType::U8, 0.0, 255.0),
        (SampleType::U16, 0.0, 10000.0),
        (SampleType::U32, 0.0, 100000.0),
        (SampleType::I16, -500.0, 500.0),
        (SampleType::I32, -70000.0, 70000.0),
        (SampleType::F32, -12.5, 8848.75),
        (SampleType::F64, -1.0e6, 1.0e6),
    ];

    for (sample_type, min, max) in types {
        for band_count in [1, 3] {
            let raster = synthetic_raster(17, 9, band_count, sample_type, min, max).unwrap();
            rp.write_raster_and_check(&raster, &GeoTiffOptions::default())
                .unwrap();
        }
    }

    assert!(rp.cleanup(), "geotiff sample type tests failed");
}

// ==========================================================================
// Test 2: compression methods and odd band counts
// ==========================================================================

#[test]
fn geotiff_reg_compression() {
    let mut rp = RegParams::new("geotiff_compression");

    for compression in [
        TiffCompression::None,
        TiffCompression::PackBits,
        TiffCompression::Lzw,
        TiffCompression::Zip,
    ] {
        let raster = synthetic_raster(32, 20, 3, SampleType::U16, 0.0, 4000.0).unwrap();
        let path = rp
            .write_raster_and_check(&raster, &GeoTiffOptions::with_compression(compression))
            .unwrap();
        let header = read_header(&path).unwrap();
        rp.compare_flag(true, header.compression() == Some(compression));
    }

    // 2 and 4 bands go through the raw strip path
    for band_count in [2, 4] {
        let raster = synthetic_raster(10, 10, band_count, SampleType::F32, 0.0, 1.0).unwrap();
        rp.write_raster_and_check(&raster, &GeoTiffOptions::with_compression(TiffCompression::Lzw))
            .unwrap();
    }

    assert!(rp.cleanup(), "geotiff compression tests failed");
}

// ==========================================================================
// Test 3: georeferencing and no-data
// ==========================================================================

#[test]
fn geotiff_reg_georeferencing() {
    let mut rp = RegParams::new("geotiff_georef");

    // North-up with no-data
    let raster = synthetic_raster(12, 12, 1, SampleType::F32, 0.0, 100.0).unwrap();
    let (bands, meta) = raster.into_parts();
    let raster = Raster::new(bands, meta.with_nodata(Some(-99.0))).unwrap();
    let path = rp
        .write_raster_and_check(&raster, &GeoTiffOptions::default())
        .unwrap();
    let back = read_geotiff(&path).unwrap();
    rp.compare_values(-99.0, back.nodata().unwrap_or(f64::NAN), 0.0);
    rp.compare_values(
        -99.0,
        back.band(0).unwrap().nodata().unwrap_or(f64::NAN),
        0.0,
    );
    rp.compare_values(32618.0, back.spatial_ref().and_then(|s| s.epsg()).unwrap_or(0) as f64, 0.0);

    // Rotated transform goes through ModelTransformation
    let rotated = GeoTransform::from_gdal([500000.0, 0.25, 0.05, 6000000.0, 0.05, -0.25]);
    let raster = synthetic_raster(12, 12, 1, SampleType::U8, 0.0, 255.0).unwrap();
    let (bands, meta) = raster.into_parts();
    let raster = Raster::new(bands, meta.with_geo_transform(rotated)).unwrap();
    let path = rp
        .write_raster_and_check(&raster, &GeoTiffOptions::default())
        .unwrap();
    let header = read_header(&path).unwrap();
    rp.compare_geotransform(&rotated, &header.geo_transform, 1e-9);

    // Geographic CRS
    let raster = synthetic_raster(6, 6, 1, SampleType::U8, 0.0, 255.0).unwrap();
    let (bands, mut meta) = raster.into_parts();
    meta.spatial_ref = Some(SpatialRef::from_epsg(4326));
    meta.geo_transform = GeoTransform::new(-70.0, -33.0, 0.001, -0.001);
    let raster = Raster::new(bands, meta).unwrap();
    let path = rp
        .write_raster_and_check(&raster, &GeoTiffOptions::default())
        .unwrap();
    let back = read_geotiff(&path).unwrap();
    rp.compare_flag(true, back.spatial_ref().is_some_and(|s| s.is_geographic()));

    assert!(rp.cleanup(), "geotiff georeferencing tests failed");
}

// ==========================================================================
// Test 4: header probe
// ==========================================================================

#[test]
fn geotiff_reg_header() {
    let mut rp = RegParams::new("geotiff_header");

    let raster = synthetic_raster(40, 25, 3, SampleType::U16, 0.0, 10000.0).unwrap();
    let path = rp.output_path("header.tif");
    write_geotiff(&path, &raster, &GeoTiffOptions::default()).unwrap();

    let header = read_header(&path).unwrap();
    rp.compare_values(40.0, header.width as f64, 0.0);
    rp.compare_values(25.0, header.height as f64, 0.0);
    rp.compare_values(3.0, header.band_count as f64, 0.0);
    rp.compare_values(16.0, header.bits_per_sample as f64, 0.0);
    rp.compare_flag(true, header.sample_type() == Some(SampleType::U16));
    rp.compare_flag(false, header.planar_separate);
    rp.compare_geotransform(&utm_geotransform(), &header.geo_transform, 0.0);
    rp.compare_flag(true, header.nodata.is_none());

    assert!(rp.cleanup(), "geotiff header tests failed");
}

// ==========================================================================
// Test 5: error paths
// ==========================================================================

#[test]
fn geotiff_reg_errors() {
    let mut rp = RegParams::new("geotiff_errors");

    let missing = rp.output_path("does_not_exist.tif");
    rp.compare_flag(true, matches!(read_geotiff(&missing), Err(IoError::NotFound(_))));
    rp.compare_flag(true, matches!(read_header(&missing), Err(IoError::NotFound(_))));

    let garbage = rp.output_path("garbage.tif");
    std::fs::write(&garbage, b"this is not a tiff").unwrap();
    rp.compare_flag(true, matches!(read_geotiff(&garbage), Err(IoError::DecodeError(_))));

    let raster = synthetic_raster(4, 4, 1, SampleType::U8, 0.0, 255.0).unwrap();
    let unwritable = rp.output_path("no_such_dir").join("out.tif");
    rp.compare_flag(
        true,
        matches!(
            write_geotiff(&unwritable, &raster, &GeoTiffOptions::default()),
            Err(IoError::CreateFailed { .. })
        ),
    );
    rp.compare_flag(false, unwritable.exists());

    // More bands than SamplesPerPixel can hold: fails after the file is created
    let bands = (0..=u16::MAX as usize)
        .map(|_| Band::new_with_value(1, 1, 0.0).unwrap())
        .collect();
    let metadata = RasterMetadata::default().with_sample_type(SampleType::U8);
    let too_many = Raster::new(bands, metadata).unwrap();
    let partial = rp.output_path("too_many_bands.tif");
    std::fs::write(&partial, b"stale").unwrap();
    rp.compare_flag(
        true,
        matches!(
            write_geotiff(&partial, &too_many, &GeoTiffOptions::default()),
            Err(IoError::InvalidData(_))
        ),
    );
    rp.compare_flag(false, partial.exists());

    assert!(rp.cleanup(), "geotiff error tests failed");
}

// ==========================================================================
// Test 6: rasters above 256 MiB of decoded samples
// ==========================================================================

#[test]
fn geotiff_reg_large() {
    let mut rp = RegParams::new("geotiff_large");

    // 5800 x 5800 Float64 is 269,120,000 bytes
    let (width, height) = (5800u32, 5800u32);
    let data = (0..width as usize * height as usize)
        .map(|i| (i % 4093) as f64 * 0.5)
        .collect();
    let band = Band::from_data(width, height, data).unwrap();
    let metadata = RasterMetadata::default()
        .with_sample_type(SampleType::F64)
        .with_geo_transform(utm_geotransform());
    let raster = Raster::new(vec![band], metadata).unwrap();

    let path = rp.output_path("large.tif");
    write_geotiff(&path, &raster, &GeoTiffOptions::default()).unwrap();
    let len = std::fs::metadata(&path).unwrap().len();
    rp.compare_flag(true, len > 256 * 1024 * 1024);

    let header = read_header(&path).unwrap();
    rp.compare_values(width as f64, header.width as f64, 0.0);

    match read_geotiff(&path) {
        Ok(back) => {
            rp.compare_values(width as f64, back.width() as f64, 0.0);
            rp.compare_values(height as f64, back.height() as f64, 0.0);
            rp.compare_flag(true, back.sample_type() == SampleType::F64);
            let band = back.band(0).unwrap();
            for (x, y) in [(0, 0), (4092, 0), (5799, 5799), (1234, 4321)] {
                let i = y as usize * width as usize + x as usize;
                rp.compare_values((i % 4093) as f64 * 0.5, band.get_pixel(x, y).unwrap(), 0.0);
            }
        }
        Err(e) => {
            eprintln!("read_geotiff failed: {}", e);
            rp.compare_flag(true, false);
        }
    }

    assert!(rp.cleanup(), "geotiff large raster tests failed");
}
