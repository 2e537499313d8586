//! Pipeline configuration
//!
//! Every pipeline takes one of these values explicitly. Defaults reproduce
//! the constants of the production runs: 64x64 tiles at clip limit 2.0 for
//! contrast, 255 compression factor and -99 no-data for super-resolution,
//! `_25cm` suffix over `*.tif` for batches.

use geoenhance_core::{BYTE_FACTOR, SampleType};
use geoenhance_filter::ClaheParams;
use geoenhance_io::{GeoTiffOptions, TiffCompression};
use geoenhance_transform::ChannelMerge;
use std::path::PathBuf;

/// Contrast enhancement settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastConfig {
    /// 1-based band index
    pub band: usize,
    /// CLAHE clip limit and tile grid
    pub clahe: ClaheParams,
    /// Output compression
    pub compression: TiffCompression,
}

impl Default for ContrastConfig {
    fn default() -> Self {
        Self {
            band: 1,
            clahe: ClaheParams::default(),
            compression: TiffCompression::None,
        }
    }
}

impl ContrastConfig {
    pub fn write_options(&self) -> GeoTiffOptions {
        GeoTiffOptions::with_compression(self.compression)
    }
}

/// Super-resolution settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuperResConfig {
    /// Compression factor onto the 8-bit scale
    pub factor: f64,
    /// No-data value written on every output band
    pub nodata: f64,
    /// How a single band is recovered from three output channels
    pub merge: ChannelMerge,
    /// Output compression
    pub compression: TiffCompression,
    /// Output sample type
    pub output_type: SampleType,
}

impl Default for SuperResConfig {
    fn default() -> Self {
        Self {
            factor: BYTE_FACTOR,
            nodata: -99.0,
            merge: ChannelMerge::default(),
            compression: TiffCompression::None,
            output_type: SampleType::F32,
        }
    }
}

impl SuperResConfig {
    pub fn write_options(&self) -> GeoTiffOptions {
        GeoTiffOptions::with_compression(self.compression)
    }
}

/// Directory batch settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Appended to each input file stem
    pub suffix: String,
    /// Accepted extensions, compared case-insensitively and without the dot
    pub extensions: Vec<String>,
    /// Descend into subdirectories
    pub recursive: bool,
    /// Record failures and continue instead of stopping at the first one
    pub keep_going: bool,
}

impl BatchConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("output"),
            suffix: "_25cm".to_string(),
            extensions: vec!["tif".to_string()],
            recursive: false,
            keep_going: false,
        }
    }
}
