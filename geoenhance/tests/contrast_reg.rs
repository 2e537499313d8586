//! Contrast regression test
//!
//! Runs the contrast pipeline over synthetic GeoTIFFs and checks the output
//! keeps dimensions and georeferencing while changing the sample type to
//! Byte.

use geoenhance::filter::{ClaheParams, Equalize};
use geoenhance::io::read_geotiff;
use geoenhance::pipeline::{ContrastConfig, run_contrast, run_contrast_with};
use geoenhance::{PipelineError, SampleType};
use geoenhance_test::RegParams;
use geoenhance_test::fixtures::{synthetic_raster, write_fixture};

// ==========================================================================
// Test 1: CLAHE keeps geometry and georeferencing
// ==========================================================================

#[test]
fn contrast_reg_clahe() {
    let mut rp = RegParams::new("contrast_clahe");

    for (sample_type, max) in [(SampleType::U8, 255.0), (SampleType::U16, 10000.0), (SampleType::F32, 1.5)] {
        let raster = synthetic_raster(130, 90, 1, sample_type, 0.0, max).unwrap();
        let name = format!("clahe_{}.tif", sample_type.gdal_name());
        let input = write_fixture(&rp.output_path(""), &name, &raster).unwrap();
        let output = rp.output_path(&format!("out_{}", name));

        let config = ContrastConfig {
            clahe: ClaheParams::new(2.0, 8, 8),
            ..ContrastConfig::default()
        };
        run_contrast(&input, &output, &config).unwrap();

        let out = read_geotiff(&output).unwrap();
        rp.compare_values(130.0, out.width() as f64, 0.0);
        rp.compare_values(90.0, out.height() as f64, 0.0);
        rp.compare_values(1.0, out.band_count() as f64, 0.0);
        rp.compare_flag(true, out.sample_type() == SampleType::U8);
        rp.compare_geotransform(raster.geo_transform(), out.geo_transform(), 0.0);
        rp.compare_flag(true, out.projection() == raster.projection());
        let (min, max) = out.band(0).unwrap().min_max().unwrap();
        rp.compare_flag(true, min >= 0.0 && max <= 255.0);
    }

    assert!(rp.cleanup(), "contrast clahe tests failed");
}

// ==========================================================================
// Test 2: band selection and alternate enhancer
// ==========================================================================

#[test]
fn contrast_reg_band_selection() {
    let mut rp = RegParams::new("contrast_band");

    let raster = synthetic_raster(40, 40, 3, SampleType::U16, 0.0, 4000.0).unwrap();
    let input = write_fixture(&rp.output_path(""), "three.tif", &raster).unwrap();

    let output = rp.output_path("three_b3.tif");
    let config = ContrastConfig {
        band: 3,
        ..ContrastConfig::default()
    };
    run_contrast_with(&input, &output, &config, &Equalize::default()).unwrap();
    let out = read_geotiff(&output).unwrap();
    rp.compare_values(1.0, out.band_count() as f64, 0.0);
    rp.compare_values(255.0, out.band(0).unwrap().min_max().unwrap().1, 0.0);

    let output = rp.output_path("three_b4.tif");
    let config = ContrastConfig {
        band: 4,
        ..ContrastConfig::default()
    };
    let result = run_contrast(&input, &output, &config);
    rp.compare_flag(
        true,
        matches!(result, Err(PipelineError::BandOutOfRange { band: 4, count: 3 })),
    );
    rp.compare_flag(false, output.exists());

    let missing = rp.output_path("missing.tif");
    let result = run_contrast(&missing, &output, &ContrastConfig::default());
    rp.compare_flag(true, matches!(result, Err(PipelineError::InputNotFound(_))));

    assert!(rp.cleanup(), "contrast band selection tests failed");
}
