//! Super-resolution upsampling
//!
//! An [`Upsampler`] turns an 8-bit RGB image into a larger image whose
//! samples stay on the 8-bit scale but are carried as `f32`, so the caller
//! can expand them back to the source range without a second rounding.
//!
//! [`InterpolatingUpsampler`] is the pure Rust implementation built on
//! `image::imageops::resize`. The network-backed upsampler lives in
//! [`crate::onnx`] behind the `onnx` feature.

use crate::{TransformError, TransformResult};
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgb32FImage, RgbImage};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Upscales an 8-bit RGB image by an integer factor
pub trait Upsampler {
    /// Short name used in log lines
    fn name(&self) -> &str;

    /// Integer scale factor applied to both axes
    fn scale(&self) -> u32;

    /// Upsample `input`.
    ///
    /// The output is `scale` times larger on both axes with samples on the
    /// [0, 255] scale.
    fn upsample(&mut self, input: &RgbImage) -> TransformResult<Rgb32FImage>;
}

/// Interpolation kernel for [`InterpolatingUpsampler`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleFilter {
    /// Nearest neighbour
    Nearest,
    /// Linear
    Triangle,
    /// Cubic (Catmull-Rom)
    #[default]
    CatmullRom,
    /// Lanczos with window 3
    Lanczos3,
}

impl ScaleFilter {
    /// Name as accepted by [`FromStr`]
    pub fn name(self) -> &'static str {
        match self {
            ScaleFilter::Nearest => "nearest",
            ScaleFilter::Triangle => "triangle",
            ScaleFilter::CatmullRom => "catmull-rom",
            ScaleFilter::Lanczos3 => "lanczos3",
        }
    }

    fn filter_type(self) -> FilterType {
        match self {
            ScaleFilter::Nearest => FilterType::Nearest,
            ScaleFilter::Triangle => FilterType::Triangle,
            ScaleFilter::CatmullRom => FilterType::CatmullRom,
            ScaleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for ScaleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScaleFilter {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(ScaleFilter::Nearest),
            "triangle" | "linear" | "bilinear" => Ok(ScaleFilter::Triangle),
            "catmull-rom" | "catmullrom" | "cubic" | "bicubic" => Ok(ScaleFilter::CatmullRom),
            "lanczos3" | "lanczos" => Ok(ScaleFilter::Lanczos3),
            other => Err(TransformError::InvalidParameters(format!(
                "unknown scale filter '{}'",
                other
            ))),
        }
    }
}

/// Upsampler based on separable interpolation kernels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolatingUpsampler {
    scale: u32,
    filter: ScaleFilter,
}

impl InterpolatingUpsampler {
    /// Create an upsampler with the given integer scale
    ///
    /// # Errors
    ///
    /// Returns `TransformError::InvalidScaleFactor` if `scale` is 0.
    pub fn new(scale: u32, filter: ScaleFilter) -> TransformResult<Self> {
        if scale == 0 {
            return Err(TransformError::InvalidScaleFactor(
                "scale must be >= 1".into(),
            ));
        }
        Ok(Self { scale, filter })
    }

    pub fn filter(&self) -> ScaleFilter {
        self.filter
    }
}

impl Default for InterpolatingUpsampler {
    fn default() -> Self {
        Self {
            scale: 4,
            filter: ScaleFilter::default(),
        }
    }
}

impl Upsampler for InterpolatingUpsampler {
    fn name(&self) -> &str {
        self.filter.name()
    }

    fn scale(&self) -> u32 {
        self.scale
    }

    fn upsample(&mut self, input: &RgbImage) -> TransformResult<Rgb32FImage> {
        let (width, height) = input.dimensions();
        if width == 0 || height == 0 {
            return Err(TransformError::InvalidParameters(
                "cannot upsample an empty image".into(),
            ));
        }
        let out_width = width.checked_mul(self.scale);
        let out_height = height.checked_mul(self.scale);
        let (Some(out_width), Some(out_height)) = (out_width, out_height) else {
            return Err(TransformError::InvalidScaleFactor(format!(
                "{}x{} scaled by {} overflows",
                width, height, self.scale
            )));
        };

        // f32 resampling clamps to [0, 1]
        let unit: Rgb32FImage = ImageBuffer::from_raw(
            width,
            height,
            input.as_raw().iter().map(|&v| v as f32 / 255.0).collect(),
        )
        .ok_or_else(|| TransformError::InvalidParameters("input buffer too small".into()))?;

        debug!(
            "Resizing {}x{} to {}x{} ({})",
            width, height, out_width, out_height, self.filter
        );
        let mut out = imageops::resize(&unit, out_width, out_height, self.filter.filter_type());
        for v in out.iter_mut() {
            *v *= 255.0;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_output_dimensions() {
        let input = RgbImage::from_pixel(7, 5, Rgb([10, 20, 30]));
        let mut up = InterpolatingUpsampler::new(4, ScaleFilter::Triangle).unwrap();
        let out = up.upsample(&input).unwrap();
        assert_eq!(out.dimensions(), (28, 20));
        assert_eq!(up.scale(), 4);
    }

    #[test]
    fn test_constant_image_stays_constant() {
        let input = RgbImage::from_pixel(6, 6, Rgb([0, 128, 255]));
        for filter in [
            ScaleFilter::Nearest,
            ScaleFilter::Triangle,
            ScaleFilter::CatmullRom,
            ScaleFilter::Lanczos3,
        ] {
            let mut up = InterpolatingUpsampler::new(2, filter).unwrap();
            let out = up.upsample(&input).unwrap();
            for p in out.pixels() {
                assert!((p[0] - 0.0).abs() < 1e-2, "{}: {:?}", filter, p);
                assert!((p[1] - 128.0).abs() < 1e-2, "{}: {:?}", filter, p);
                assert!((p[2] - 255.0).abs() < 1e-2, "{}: {:?}", filter, p);
            }
        }
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(InterpolatingUpsampler::new(0, ScaleFilter::Nearest).is_err());
        let mut up = InterpolatingUpsampler::default();
        assert!(up.upsample(&RgbImage::new(0, 4)).is_err());
    }

    #[test]
    fn test_filter_names() {
        for filter in [
            ScaleFilter::Nearest,
            ScaleFilter::Triangle,
            ScaleFilter::CatmullRom,
            ScaleFilter::Lanczos3,
        ] {
            assert_eq!(filter.name().parse::<ScaleFilter>().unwrap(), filter);
        }
        assert_eq!("Bicubic".parse::<ScaleFilter>().unwrap(), ScaleFilter::CatmullRom);
        assert!("sinc".parse::<ScaleFilter>().is_err());
    }
}
