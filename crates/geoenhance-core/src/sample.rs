//! Per-pixel sample types
//!
//! Names follow the GDAL data type vocabulary (`Byte`, `UInt16`, ...) so that
//! output from `geoenhance info` lines up with what `gdalinfo` prints.

use std::fmt;

/// TIFF `SampleFormat` tag value for unsigned integers
pub const SAMPLE_FORMAT_UINT: u16 = 1;
/// TIFF `SampleFormat` tag value for signed integers
pub const SAMPLE_FORMAT_INT: u16 = 2;
/// TIFF `SampleFormat` tag value for IEEE floating point
pub const SAMPLE_FORMAT_IEEEFP: u16 = 3;

/// Storage type of a single raster sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SampleType {
    /// Unsigned 8-bit integer (`Byte`)
    #[default]
    U8,
    /// Unsigned 16-bit integer
    U16,
    /// Unsigned 32-bit integer
    U32,
    /// Signed 8-bit integer
    I8,
    /// Signed 16-bit integer
    I16,
    /// Signed 32-bit integer
    I32,
    /// 32-bit IEEE float
    F32,
    /// 64-bit IEEE float
    F64,
}

impl SampleType {
    /// Bits per sample
    pub fn bits(self) -> u16 {
        match self {
            SampleType::U8 | SampleType::I8 => 8,
            SampleType::U16 | SampleType::I16 => 16,
            SampleType::U32 | SampleType::I32 | SampleType::F32 => 32,
            SampleType::F64 => 64,
        }
    }

    /// Bytes per sample
    pub fn bytes(self) -> usize {
        self.bits() as usize / 8
    }

    /// TIFF `SampleFormat` value (1 = uint, 2 = int, 3 = float)
    pub fn sample_format(self) -> u16 {
        match self {
            SampleType::U8 | SampleType::U16 | SampleType::U32 => SAMPLE_FORMAT_UINT,
            SampleType::I8 | SampleType::I16 | SampleType::I32 => SAMPLE_FORMAT_INT,
            SampleType::F32 | SampleType::F64 => SAMPLE_FORMAT_IEEEFP,
        }
    }

    /// Resolve a sample type from TIFF `SampleFormat` and `BitsPerSample`.
    ///
    /// Half floats decode to `F32`.
    pub fn from_tiff(sample_format: u16, bits: u16) -> Option<Self> {
        match (sample_format, bits) {
            (SAMPLE_FORMAT_UINT, 8) => Some(SampleType::U8),
            (SAMPLE_FORMAT_UINT, 16) => Some(SampleType::U16),
            (SAMPLE_FORMAT_UINT, 32) => Some(SampleType::U32),
            (SAMPLE_FORMAT_INT, 8) => Some(SampleType::I8),
            (SAMPLE_FORMAT_INT, 16) => Some(SampleType::I16),
            (SAMPLE_FORMAT_INT, 32) => Some(SampleType::I32),
            (SAMPLE_FORMAT_IEEEFP, 16) | (SAMPLE_FORMAT_IEEEFP, 32) => Some(SampleType::F32),
            (SAMPLE_FORMAT_IEEEFP, 64) => Some(SampleType::F64),
            _ => None,
        }
    }

    /// Whether the type stores floating-point samples
    pub fn is_float(self) -> bool {
        matches!(self, SampleType::F32 | SampleType::F64)
    }

    /// Smallest representable value
    pub fn min_value(self) -> f64 {
        match self {
            SampleType::U8 | SampleType::U16 | SampleType::U32 => 0.0,
            SampleType::I8 => i8::MIN as f64,
            SampleType::I16 => i16::MIN as f64,
            SampleType::I32 => i32::MIN as f64,
            SampleType::F32 => f32::MIN as f64,
            SampleType::F64 => f64::MIN,
        }
    }

    /// Largest representable value
    pub fn max_value(self) -> f64 {
        match self {
            SampleType::U8 => u8::MAX as f64,
            SampleType::U16 => u16::MAX as f64,
            SampleType::U32 => u32::MAX as f64,
            SampleType::I8 => i8::MAX as f64,
            SampleType::I16 => i16::MAX as f64,
            SampleType::I32 => i32::MAX as f64,
            SampleType::F32 => f32::MAX as f64,
            SampleType::F64 => f64::MAX,
        }
    }

    /// Convert a working value to this type's range.
    ///
    /// Integer types round to nearest and saturate; float types pass through
    /// (`F32` loses precision as usual).
    pub fn quantize(self, value: f64) -> f64 {
        if self.is_float() {
            return if self == SampleType::F32 {
                value as f32 as f64
            } else {
                value
            };
        }
        if value.is_nan() {
            return 0.0;
        }
        value.round().clamp(self.min_value(), self.max_value())
    }

    /// GDAL-style type name
    pub fn gdal_name(self) -> &'static str {
        match self {
            SampleType::U8 => "Byte",
            SampleType::U16 => "UInt16",
            SampleType::U32 => "UInt32",
            SampleType::I8 => "Int8",
            SampleType::I16 => "Int16",
            SampleType::I32 => "Int32",
            SampleType::F32 => "Float32",
            SampleType::F64 => "Float64",
        }
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.gdal_name())
    }
}
