//! Upsample regression test
//!
//! Runs compressed bands through stacking, interpolating upsampling and
//! splitting, and checks geometry and value ranges of the recovered planes.

use geoenhance_core::{BYTE_FACTOR, DynamicRange};
use geoenhance_test::RegParams;
use geoenhance_test::fixtures::ramp_band;
use geoenhance_transform::{
    ChannelMerge, InterpolatingUpsampler, ModelSpec, ScaleFilter, Upsampler, split_channels,
    stack_channels,
};

// ==========================================================================
// Test 1: geometry for every filter and scale
// ==========================================================================

#[test]
fn upsample_reg_geometry() {
    let mut rp = RegParams::new("upsample_geometry");

    let band = ramp_band(23, 11, 0.0, 255.0).unwrap();
    let range = DynamicRange::from_band(&band, BYTE_FACTOR).unwrap();
    let image = stack_channels(&[range.compress_band(&band)], 23, 11).unwrap();

    for filter in [
        ScaleFilter::Nearest,
        ScaleFilter::Triangle,
        ScaleFilter::CatmullRom,
        ScaleFilter::Lanczos3,
    ] {
        for scale in [1, 2, 4] {
            let mut up = InterpolatingUpsampler::new(scale, filter).unwrap();
            let out = up.upsample(&image).unwrap();
            rp.compare_values((23 * scale) as f64, out.width() as f64, 0.0);
            rp.compare_values((11 * scale) as f64, out.height() as f64, 0.0);
            let in_range = out.as_raw().iter().all(|&v| (0.0..=255.0).contains(&v));
            rp.compare_flag(true, in_range);
        }
    }

    assert!(rp.cleanup(), "upsample geometry tests failed");
}

// ==========================================================================
// Test 2: per-band range recovery through the full channel path
// ==========================================================================

#[test]
fn upsample_reg_range_recovery() {
    let mut rp = RegParams::new("upsample_range");

    let (w, h) = (20, 16);
    let bands = [
        ramp_band(w, h, 0.0, 10000.0).unwrap(),
        ramp_band(w, h, -50.0, 50.0).unwrap(),
        ramp_band(w, h, 1000.0, 1255.0).unwrap(),
    ];
    let ranges: Vec<DynamicRange> = bands
        .iter()
        .map(|b| DynamicRange::from_band(b, BYTE_FACTOR).unwrap())
        .collect();
    let planes: Vec<Vec<u8>> = bands
        .iter()
        .zip(&ranges)
        .map(|(b, r)| r.compress_band(b))
        .collect();

    let image = stack_channels(&planes, w, h).unwrap();
    let mut up = InterpolatingUpsampler::new(4, ScaleFilter::Triangle).unwrap();
    let out = up.upsample(&image).unwrap();
    let split = split_channels(&out, 3, ChannelMerge::Mean).unwrap();

    rp.compare_values(3.0, split.len() as f64, 0.0);
    for (plane, range) in split.iter().zip(&ranges) {
        let values = range.decompress_plane(plane);
        rp.compare_values((w * h * 16) as f64, values.len() as f64, 0.0);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        // Each band comes back inside its own range, within one quantization step
        let step = range.span() / range.factor();
        rp.compare_flag(true, min >= range.min() - step);
        rp.compare_flag(true, max <= range.max() + step);
        rp.compare_values(range.max(), max, 2.0 * step);
    }

    assert!(rp.cleanup(), "upsample range tests failed");
}

// ==========================================================================
// Test 3: single band merge and model names
// ==========================================================================

#[test]
fn upsample_reg_single_band() {
    let mut rp = RegParams::new("upsample_single");

    let band = ramp_band(8, 8, 0.0, 100.0).unwrap();
    let range = DynamicRange::from_band(&band, BYTE_FACTOR).unwrap();
    let image = stack_channels(&[range.compress_band(&band)], 8, 8).unwrap();
    let mut up = InterpolatingUpsampler::default();
    let out = up.upsample(&image).unwrap();

    let mean = split_channels(&out, 1, ChannelMerge::Mean).unwrap();
    let first = split_channels(&out, 1, ChannelMerge::First).unwrap();
    rp.compare_values(1.0, mean.len() as f64, 0.0);
    // Replicated channels upsample identically, so both merges agree
    let max_diff = mean[0]
        .iter()
        .zip(&first[0])
        .map(|(a, b)| (a - b).abs())
        .fold(0.0f32, f32::max);
    rp.compare_values(0.0, max_diff as f64, 1e-3);

    let spec = ModelSpec::parse("EDSR_x4").unwrap();
    rp.compare_values(4.0, spec.scale as f64, 0.0);
    rp.compare_flag(true, spec.algorithm == "edsr");
    rp.compare_values(spec.scale as f64, up.scale() as f64, 0.0);

    assert!(rp.cleanup(), "upsample single band tests failed");
}
