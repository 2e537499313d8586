//! Band - one plane of raster samples
//!
//! `Band` is a 2D array of `f64` values. Every TIFF sample type the reader
//! supports (8/16/32-bit integers, half/single/double floats) fits into an
//! `f64` without loss, so pipelines work on a single representation and the
//! writer quantizes back to the requested output type.
//!
//! # Examples
//!
//! ```
//! use geoenhance_core::Band;
//!
//! let mut band = Band::new(100, 100).unwrap();
//! band.set_pixel(10, 20, 42.0).unwrap();
//! assert_eq!(band.get_pixel(10, 20).unwrap(), 42.0);
//! assert_eq!(band.min_max(), Some((0.0, 42.0)));
//! ```

use crate::error::{Error, Result};
use image::GrayImage;

/// One band of raster samples
///
/// # Memory Layout
///
/// Row-major with no padding. The sample at (x, y) is at index
/// `y * width + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    width: u32,
    height: u32,
    data: Vec<f64>,
    nodata: Option<f64>,
}

impl Band {
    /// Create a band with all samples set to zero
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::new_with_value(width, height, 0.0)
    }

    /// Create a band with all samples set to `value`
    pub fn new_with_value(width: u32, height: u32, value: f64) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let size = (width as usize) * (height as usize);
        Ok(Band {
            width,
            height,
            data: vec![value; size],
            nodata: None,
        })
    }

    /// Create a band from row-major samples
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions are zero or the data length doesn't match.
    pub fn from_data(width: u32, height: u32, data: Vec<f64>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let expected_size = (width as usize) * (height as usize);
        if data.len() != expected_size {
            return Err(Error::InvalidParameter(format!(
                "data length {} doesn't match {}x{} = {}",
                data.len(),
                width,
                height,
                expected_size
            )));
        }

        Ok(Band {
            width,
            height,
            data,
            nodata: None,
        })
    }

    /// Create a band from an 8-bit gray image
    pub fn from_gray8(image: &GrayImage) -> Result<Self> {
        let data = image.as_raw().iter().map(|&v| v as f64).collect();
        Self::from_data(image.width(), image.height(), data)
    }

    /// Band width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Band height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of samples
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false for a constructed band; present for API symmetry with `len`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// No-data sentinel, if any
    #[inline]
    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    /// Set or clear the no-data sentinel
    #[inline]
    pub fn set_nodata(&mut self, nodata: Option<f64>) {
        self.nodata = nodata;
    }

    /// Builder form of [`Band::set_nodata`]
    pub fn with_nodata(mut self, nodata: Option<f64>) -> Self {
        self.nodata = nodata;
        self
    }

    /// Get the sample at (x, y)
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if coordinates are out of range.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<f64> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: (y as usize) * (self.width as usize) + (x as usize),
                len: self.data.len(),
            });
        }
        Ok(self.get_pixel_unchecked(x, y))
    }

    /// Set the sample at (x, y)
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if coordinates are out of range.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, value: f64) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: (y as usize) * (self.width as usize) + (x as usize),
                len: self.data.len(),
            });
        }
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        self.data[idx] = value;
        Ok(())
    }

    /// Get the sample at (x, y) without bounds checking
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of range.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> f64 {
        self.data[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// All samples, row-major
    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Mutable access to all samples
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consume the band and return its samples
    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    /// One row of samples
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: u32) -> &[f64] {
        let start = (y as usize) * (self.width as usize);
        &self.data[start..start + self.width as usize]
    }

    /// Whether `value` is a real sample (finite and not the no-data sentinel)
    #[inline]
    pub fn is_valid(&self, value: f64) -> bool {
        value.is_finite() && self.nodata != Some(value)
    }

    /// Number of valid samples
    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|&&v| self.is_valid(v)).count()
    }

    /// Minimum and maximum over valid samples, `None` if there are none
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|&v| self.is_valid(v))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Mean over valid samples
    pub fn mean(&self) -> Option<f64> {
        let (sum, n) = self
            .data
            .iter()
            .filter(|&&v| self.is_valid(v))
            .fold((0.0, 0usize), |(s, n), &v| (s + v, n + 1));
        (n > 0).then(|| sum / n as f64)
    }

    /// New band of the same size with `f` applied to every sample
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Band {
        Band {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
            nodata: self.nodata,
        }
    }

    /// Convert to an 8-bit gray image, rounding and clamping to [0, 255].
    ///
    /// Non-finite samples become 0. Use
    /// [`DynamicRange::compress_band`](crate::DynamicRange::compress_band)
    /// when the band's range is not already 8-bit.
    pub fn to_gray8(&self) -> Result<GrayImage> {
        let raw: Vec<u8> = self
            .data
            .iter()
            .map(|&v| {
                if v.is_finite() {
                    v.round().clamp(0.0, 255.0) as u8
                } else {
                    0
                }
            })
            .collect();
        GrayImage::from_raw(self.width, self.height, raw).ok_or(Error::InvalidDimension {
            width: self.width,
            height: self.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_creation() {
        let band = Band::new(100, 200).unwrap();
        assert_eq!(band.dimensions(), (100, 200));
        assert_eq!(band.len(), 20000);
        assert!(band.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_band_invalid_dimensions() {
        assert!(Band::new(0, 100).is_err());
        assert!(Band::new(100, 0).is_err());
        assert!(Band::from_data(2, 2, vec![1.0; 3]).is_err());
    }

    #[test]
    fn test_band_from_data_layout() {
        let band = Band::from_data(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(band.get_pixel(2, 0).unwrap(), 3.0);
        assert_eq!(band.get_pixel(0, 1).unwrap(), 4.0);
        assert_eq!(band.row(1), &[4.0, 5.0, 6.0]);
        assert!(band.get_pixel(3, 0).is_err());
    }

    #[test]
    fn test_min_max_skips_nodata_and_nan() {
        let band = Band::from_data(4, 1, vec![-99.0, 3.0, f64::NAN, 7.0])
            .unwrap()
            .with_nodata(Some(-99.0));
        assert_eq!(band.min_max(), Some((3.0, 7.0)));
        assert_eq!(band.valid_count(), 2);
        assert_eq!(band.mean(), Some(5.0));
    }

    #[test]
    fn test_min_max_all_invalid() {
        let band = Band::new_with_value(2, 2, -99.0)
            .unwrap()
            .with_nodata(Some(-99.0));
        assert_eq!(band.min_max(), None);
        assert_eq!(band.mean(), None);
    }

    #[test]
    fn test_gray8_roundtrip() {
        let band = Band::from_data(2, 2, vec![0.0, 127.6, 300.0, -5.0]).unwrap();
        let img = band.to_gray8().unwrap();
        assert_eq!(img.as_raw(), &vec![0u8, 128, 255, 0]);

        let back = Band::from_gray8(&img).unwrap();
        assert_eq!(back.data(), &[0.0, 128.0, 255.0, 0.0]);
    }
}
