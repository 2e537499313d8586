//! CLAHE regression test
//!
//! Checks output geometry across grid sizes, constant-image invariance,
//! local contrast gain and the equalization fallback.

use geoenhance_core::{BYTE_FACTOR, DynamicRange};
use geoenhance_filter::{BandEnhancer, Clahe, ClaheParams, Equalize, clahe, equalize};
use geoenhance_test::RegParams;
use geoenhance_test::fixtures::ramp_band;
use image::{GrayImage, Luma};

fn spread(image: &GrayImage) -> f64 {
    let min = image.as_raw().iter().min().copied().unwrap_or(0);
    let max = image.as_raw().iter().max().copied().unwrap_or(0);
    (max - min) as f64
}

// ==========================================================================
// Test 1: output geometry for divisible and non-divisible grids
// ==========================================================================

#[test]
fn clahe_reg_geometry() {
    let mut rp = RegParams::new("clahe_geometry");

    let sizes = [(64, 64), (100, 100), (101, 37), (7, 250)];
    let grids = [(1, 1), (8, 8), (64, 64), (3, 5)];

    for (w, h) in sizes {
        let band = ramp_band(w, h, 0.0, 10000.0).unwrap();
        let range = DynamicRange::from_band(&band, BYTE_FACTOR).unwrap();
        let image = GrayImage::from_raw(w, h, range.compress_band(&band)).unwrap();
        for (tx, ty) in grids {
            let out = clahe(&image, &ClaheParams::new(2.0, tx, ty)).unwrap();
            rp.compare_values(w as f64, out.width() as f64, 0.0);
            rp.compare_values(h as f64, out.height() as f64, 0.0);
        }
    }

    assert!(rp.cleanup(), "clahe geometry tests failed");
}

// ==========================================================================
// Test 2: constant input gives constant output
// ==========================================================================

#[test]
fn clahe_reg_constant() {
    let mut rp = RegParams::new("clahe_constant");

    for value in [0u8, 1, 128, 254, 255] {
        let image = GrayImage::from_pixel(90, 70, Luma([value]));
        let out = clahe(&image, &ClaheParams::new(2.0, 8, 8)).unwrap();
        rp.compare_values(0.0, spread(&out), 0.0);
    }

    assert!(rp.cleanup(), "clahe constant tests failed");
}

// ==========================================================================
// Test 3: local contrast gain and clip limit
// ==========================================================================

#[test]
fn clahe_reg_contrast() {
    let mut rp = RegParams::new("clahe_contrast");

    // Narrow band of values: 100..=120 across the image
    let image = GrayImage::from_fn(128, 128, |x, _| Luma([100 + (x * 20 / 127) as u8]));
    let input_spread = spread(&image);

    let unclipped = clahe(&image, &ClaheParams::new(0.0, 4, 4)).unwrap();
    let clipped = clahe(&image, &ClaheParams::new(1.0, 4, 4)).unwrap();

    rp.compare_values(20.0, input_spread, 0.0);
    rp.compare_flag(true, spread(&unclipped) > 100.0);
    // A tighter clip limit gives less contrast gain
    rp.compare_flag(true, spread(&clipped) <= spread(&unclipped));

    assert!(rp.cleanup(), "clahe contrast tests failed");
}

// ==========================================================================
// Test 4: enhancer trait objects
// ==========================================================================

#[test]
fn clahe_reg_enhancers() {
    let mut rp = RegParams::new("clahe_enhancers");

    let image = GrayImage::from_fn(50, 40, |x, y| Luma([(60 + (x + y) / 3) as u8]));
    let by_fn = clahe(&image, &ClaheParams::new(2.0, 5, 4)).unwrap();
    let by_trait = Clahe::new(ClaheParams::new(2.0, 5, 4)).enhance(&image).unwrap();
    rp.compare_flag(true, by_fn == by_trait);

    let eq = Equalize::default();
    rp.compare_flag(true, eq.name() == "equalize");
    let by_trait = eq.enhance(&image).unwrap();
    rp.compare_flag(true, by_trait == equalize(&image, 1.0).unwrap());
    rp.compare_values(255.0, *by_trait.as_raw().iter().max().unwrap() as f64, 0.0);

    assert!(rp.cleanup(), "clahe enhancer tests failed");
}
