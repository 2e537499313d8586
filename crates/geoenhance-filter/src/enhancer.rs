//! Band enhancers
//!
//! `BandEnhancer` is the seam the contrast pipeline is written against: any
//! 8-bit gray-to-gray operation that keeps the image size.

use crate::clahe::{ClaheParams, clahe};
use crate::enhance::equalize;
use crate::FilterResult;
use image::GrayImage;

/// An 8-bit contrast operation on one band
pub trait BandEnhancer {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Enhance one band; the output has the input's dimensions
    fn enhance(&self, image: &GrayImage) -> FilterResult<GrayImage>;
}

/// Contrast-limited adaptive histogram equalization
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Clahe {
    pub params: ClaheParams,
}

impl Clahe {
    pub fn new(params: ClaheParams) -> Self {
        Self { params }
    }
}

impl BandEnhancer for Clahe {
    fn name(&self) -> &str {
        "clahe"
    }

    fn enhance(&self, image: &GrayImage) -> FilterResult<GrayImage> {
        clahe(image, &self.params)
    }
}

/// Global histogram equalization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equalize {
    /// Blend between input (0.0) and full equalization (1.0)
    pub fract: f32,
}

impl Default for Equalize {
    fn default() -> Self {
        Self { fract: 1.0 }
    }
}

impl BandEnhancer for Equalize {
    fn name(&self) -> &str {
        "equalize"
    }

    fn enhance(&self, image: &GrayImage) -> FilterResult<GrayImage> {
        equalize(image, self.fract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_enhancers_keep_dimensions() {
        let image = GrayImage::from_fn(33, 17, |x, y| Luma([((x + y) * 3) as u8]));
        let enhancers: Vec<Box<dyn BandEnhancer>> = vec![
            Box::new(Clahe::new(ClaheParams::new(2.0, 4, 4))),
            Box::new(Equalize::default()),
        ];
        for enhancer in &enhancers {
            let out = enhancer.enhance(&image).unwrap();
            assert_eq!(out.dimensions(), (33, 17), "{}", enhancer.name());
        }
    }
}
