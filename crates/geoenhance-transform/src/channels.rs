//! Band to channel stacking
//!
//! Upsamplers work on 3-channel images. A single band is replicated into
//! all three channels on the way in; three bands are interleaved in order.
//! On the way out each source band gets one plane back.

use crate::{TransformError, TransformResult};
use image::{Rgb32FImage, RgbImage};
use std::fmt;
use std::str::FromStr;

/// How a single-band raster is recovered from three output channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelMerge {
    /// Average of the three channels
    #[default]
    Mean,
    /// Channel 0 only
    First,
}

impl ChannelMerge {
    pub fn name(self) -> &'static str {
        match self {
            ChannelMerge::Mean => "mean",
            ChannelMerge::First => "first",
        }
    }
}

impl fmt::Display for ChannelMerge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChannelMerge {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mean" => Ok(ChannelMerge::Mean),
            "first" => Ok(ChannelMerge::First),
            other => Err(TransformError::InvalidParameters(format!(
                "unknown channel merge '{}'",
                other
            ))),
        }
    }
}

fn check_band_count(count: usize) -> TransformResult<()> {
    match count {
        1 | 3 => Ok(()),
        other => Err(TransformError::ChannelMismatch {
            expected: 3,
            actual: other,
        }),
    }
}

/// Stack 1 or 3 compressed band planes into an RGB image.
///
/// # Errors
///
/// Returns `TransformError::ChannelMismatch` for any other band count and
/// `TransformError::InvalidParameters` if a plane is not `width * height`
/// samples long.
pub fn stack_channels(planes: &[Vec<u8>], width: u32, height: u32) -> TransformResult<RgbImage> {
    check_band_count(planes.len())?;
    let len = width as usize * height as usize;
    if let Some(bad) = planes.iter().position(|p| p.len() != len) {
        return Err(TransformError::InvalidParameters(format!(
            "plane {} has {} samples, expected {}",
            bad,
            planes[bad].len(),
            len
        )));
    }

    let raw: Vec<u8> = match planes {
        [gray] => gray.iter().flat_map(|&v| [v; 3]).collect(),
        [r, g, b] => (0..len).flat_map(|i| [r[i], g[i], b[i]]).collect(),
        _ => Vec::new(),
    };

    RgbImage::from_raw(width, height, raw)
        .ok_or_else(|| TransformError::InvalidParameters("channel buffer too small".into()))
}

/// Split an upsampled image back into one plane per source band.
///
/// Three bands map to the three channels in order. A single band is merged
/// from the channels according to `merge`.
pub fn split_channels(
    image: &Rgb32FImage,
    band_count: usize,
    merge: ChannelMerge,
) -> TransformResult<Vec<Vec<f32>>> {
    check_band_count(band_count)?;
    let len = image.width() as usize * image.height() as usize;

    if band_count == 3 {
        let mut planes = vec![Vec::with_capacity(len); 3];
        for p in image.pixels() {
            for (plane, &v) in planes.iter_mut().zip(p.0.iter()) {
                plane.push(v);
            }
        }
        return Ok(planes);
    }

    let plane = image
        .pixels()
        .map(|p| match merge {
            ChannelMerge::Mean => (p[0] + p[1] + p[2]) / 3.0,
            ChannelMerge::First => p[0],
        })
        .collect();
    Ok(vec![plane])
}

/// Planar `3 x H x W` copy of an RGB image, the layout networks take
pub fn to_planar(image: &RgbImage) -> Vec<f32> {
    let plane = image.width() as usize * image.height() as usize;
    let mut out = vec![0f32; 3 * plane];
    for (i, p) in image.pixels().enumerate() {
        for c in 0..3 {
            out[c * plane + i] = p[c] as f32;
        }
    }
    out
}

/// Interleave a planar `3 x H x W` buffer into an image.
///
/// Samples are clamped to [0, 255].
///
/// # Errors
///
/// Returns `TransformError::InvalidParameters` if `data` is not
/// `3 * width * height` samples long.
pub fn from_planar(data: &[f32], width: u32, height: u32) -> TransformResult<Rgb32FImage> {
    let plane = width as usize * height as usize;
    if data.len() != 3 * plane {
        return Err(TransformError::InvalidParameters(format!(
            "planar buffer has {} samples, expected {}",
            data.len(),
            3 * plane
        )));
    }
    let mut hwc = Vec::with_capacity(3 * plane);
    for i in 0..plane {
        for c in 0..3 {
            hwc.push(data[c * plane + i].clamp(0.0, 255.0));
        }
    }
    Rgb32FImage::from_raw(width, height, hwc)
        .ok_or_else(|| TransformError::InvalidParameters("planar buffer too small".into()))
}
