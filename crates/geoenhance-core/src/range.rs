//! Per-band dynamic range compression
//!
//! Networks and 8-bit image filters only accept samples in [0, 255]. A
//! `DynamicRange` records a band's observed [min, max] so its samples can be
//! mapped linearly onto [0, factor] and mapped back afterwards:
//!
//! ```text
//! compress(x)   = (x - min) / (max - min) * factor
//! decompress(y) = y / factor * (max - min) + min
//! ```
//!
//! Each band gets its own record; applying band *i*'s record to band *j*'s
//! output silently shifts values, so callers keep the records in band order.

use crate::band::Band;
use crate::error::{Error, Result};

/// Compression factor for 8-bit targets
pub const BYTE_FACTOR: f64 = 255.0;

/// Observed value range of one band plus the compression factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicRange {
    min: f64,
    max: f64,
    factor: f64,
}

impl DynamicRange {
    /// Create a range record
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if a bound is not finite, `min > max`
    /// or `factor <= 0`.
    pub fn new(min: f64, max: f64, factor: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "range bounds must be finite, got [{}, {}]",
                min, max
            )));
        }
        if min > max {
            return Err(Error::InvalidParameter(format!(
                "range min {} is greater than max {}",
                min, max
            )));
        }
        if !(factor > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "factor must be > 0, got {}",
                factor
            )));
        }
        Ok(Self { min, max, factor })
    }

    /// Record the range of a band's valid samples
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyBand` if the band has no finite, non-nodata sample.
    pub fn from_band(band: &Band, factor: f64) -> Result<Self> {
        let (min, max) = band.min_max().ok_or(Error::EmptyBand)?;
        Self::new(min, max, factor)
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[inline]
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// `max - min`
    #[inline]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// A flat band has a single value; it compresses to 0 and decompresses to `min`.
    #[inline]
    pub fn is_flat(&self) -> bool {
        self.span() == 0.0
    }

    /// Map a sample from [min, max] onto [0, factor]
    #[inline]
    pub fn compress(&self, x: f64) -> f64 {
        if self.is_flat() {
            return 0.0;
        }
        (x - self.min) / self.span() * self.factor
    }

    /// Map a value from [0, factor] back onto [min, max]
    #[inline]
    pub fn decompress(&self, y: f64) -> f64 {
        if self.is_flat() {
            return self.min;
        }
        y / self.factor * self.span() + self.min
    }

    /// Compress a whole band to 8-bit samples.
    ///
    /// Compressed values are truncated toward zero and clamped to [0, 255];
    /// invalid samples (NaN, no-data) become 0.
    pub fn compress_band(&self, band: &Band) -> Vec<u8> {
        band.data()
            .iter()
            .map(|&v| {
                if band.is_valid(v) {
                    self.compress(v).trunc().clamp(0.0, 255.0) as u8
                } else {
                    0
                }
            })
            .collect()
    }

    /// Decompress a plane of values on the [0, factor] scale
    pub fn decompress_plane(&self, plane: &[f32]) -> Vec<f64> {
        plane.iter().map(|&y| self.decompress(y as f64)).collect()
    }
}
