//! Global histogram equalization
//!
//! Tone reproduction curve (TRC) construction from the histogram of the
//! whole image, and in-place mapping of an image through a TRC.

use crate::{FilterError, FilterResult};
use image::GrayImage;

/// A 256-entry lookup table for tone reproduction curve mapping.
///
/// Maps input pixel values [0..255] to output pixel values [0..255].
pub type TrcLut = [u8; 256];

/// Identity curve
pub fn identity_trc() -> TrcLut {
    let mut lut = [0u8; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        *entry = i as u8;
    }
    lut
}

/// Generate a histogram equalization TRC lookup table.
///
/// # Arguments
///
/// * `image` - Input 8-bit image
/// * `fract` - Fraction of equalization movement. 0.0 = no change, 1.0 = full equalization.
/// * `factor` - Subsampling factor for histogram computation; >= 1.
pub fn equalize_trc(image: &GrayImage, fract: f32, factor: u32) -> FilterResult<TrcLut> {
    if !(0.0..=1.0).contains(&fract) {
        return Err(FilterError::InvalidParameters(
            "fract must be in [0.0, 1.0]".into(),
        ));
    }
    if factor < 1 {
        return Err(FilterError::InvalidParameters("factor must be >= 1".into()));
    }

    let mut hist = [0u64; 256];
    for y in (0..image.height()).step_by(factor as usize) {
        for x in (0..image.width()).step_by(factor as usize) {
            hist[image.get_pixel(x, y)[0] as usize] += 1;
        }
    }
    let sum: u64 = hist.iter().sum();

    // Empty histogram maps to identity
    if sum == 0 {
        return Ok(identity_trc());
    }

    let mut lut = [0u8; 256];
    let mut cumul = 0u64;
    for (iin, entry) in lut.iter_mut().enumerate() {
        cumul += hist[iin];
        let itarg = (255.0 * cumul as f32 / sum as f32 + 0.5) as i32;
        let iout = iin as i32 + (fract * (itarg - iin as i32) as f32) as i32;
        *entry = iout.clamp(0, 255) as u8;
    }

    Ok(lut)
}

/// Apply a TRC lookup table to an image in-place.
pub fn trc_map(image: &mut GrayImage, lut: &TrcLut) {
    for pixel in image.pixels_mut() {
        pixel[0] = lut[pixel[0] as usize];
    }
}

/// Histogram-equalize an 8-bit image.
///
/// `fract` blends between the input (0.0) and full equalization (1.0).
pub fn equalize(image: &GrayImage, fract: f32) -> FilterResult<GrayImage> {
    if image.width() == 0 || image.height() == 0 {
        return Err(FilterError::EmptyImage);
    }
    let lut = equalize_trc(image, fract, 1)?;
    let mut out = image.clone();
    trc_map(&mut out, &lut);
    Ok(out)
}
