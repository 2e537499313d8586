//! GeoTIFF header probe
//!
//! Reads structure and georeferencing without decoding pixel data, so a
//! caller can reject a raster (wrong band count, unsupported layout) before
//! paying for the decode.

use crate::geokeys;
use crate::geotiff::TiffCompression;
use crate::{IoError, IoResult};
use geoenhance_core::{GeoTransform, SampleType, SpatialRef};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tiff::decoder::{Decoder, Limits};
use tiff::tags::Tag;

/// Raster metadata read without decoding pixel data
#[derive(Debug, Clone, PartialEq)]
pub struct GeoTiffHeader {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Samples per pixel
    pub band_count: usize,
    /// Bits per sample of the first band
    pub bits_per_sample: u16,
    /// TIFF `SampleFormat` of the first band (1 when absent)
    pub sample_format: u16,
    /// TIFF `Compression` tag value
    pub compression_tag: u16,
    /// `PlanarConfiguration == 2`
    pub planar_separate: bool,
    /// Tile layout instead of strips
    pub tiled: bool,
    /// Georeferencing, identity when the file has none
    pub geo_transform: GeoTransform,
    /// GeoKeys, if any
    pub spatial_ref: Option<SpatialRef>,
    /// GDAL_NODATA value, if any
    pub nodata: Option<f64>,
}

impl GeoTiffHeader {
    /// Sample type, `None` for layouts this crate cannot hold (1-bit, 64-bit ints, ...)
    pub fn sample_type(&self) -> Option<SampleType> {
        SampleType::from_tiff(self.sample_format, self.bits_per_sample)
    }

    /// Compression method, `None` for codes outside [`TiffCompression`]
    pub fn compression(&self) -> Option<TiffCompression> {
        TiffCompression::from_tag(self.compression_tag)
    }
}

/// Read the header of a GeoTIFF file
pub fn read_header<P: AsRef<Path>>(path: P) -> IoResult<GeoTiffHeader> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    read_header_from(BufReader::new(file))
}

/// Read the header of a GeoTIFF from any seekable reader
pub fn read_header_from<R: Read + Seek>(reader: R) -> IoResult<GeoTiffHeader> {
    let mut decoder = open_decoder(reader)?;
    header_from_decoder(&mut decoder)
}

/// Open a decoder without the `tiff` crate's default buffer limits.
///
/// The defaults cap a decoded image at 256 MiB, below the size of many
/// single-band Float32 scenes.
pub(crate) fn open_decoder<R: Read + Seek>(reader: R) -> IoResult<Decoder<R>> {
    let decoder = Decoder::new(reader)
        .map_err(|e| IoError::DecodeError(format!("TIFF decode error: {}", e)))?;
    Ok(decoder.with_limits(Limits::unlimited()))
}

/// Read the header from an open decoder positioned at the first image
pub(crate) fn header_from_decoder<R: Read + Seek>(
    decoder: &mut Decoder<R>,
) -> IoResult<GeoTiffHeader> {
    let (width, height) = decoder
        .dimensions()
        .map_err(|e| IoError::DecodeError(format!("TIFF dimensions: {}", e)))?;

    let band_count = decoder.get_tag_u32(Tag::SamplesPerPixel).unwrap_or(1) as usize;
    let bits_per_sample = first_u16(decoder, Tag::BitsPerSample).unwrap_or(1);
    let sample_format = first_u16(decoder, Tag::SampleFormat).unwrap_or(1);
    let compression_tag = decoder
        .get_tag_u32(Tag::Compression)
        .map(|v| v as u16)
        .unwrap_or(1);
    let planar_separate = decoder.get_tag_u32(Tag::PlanarConfiguration).unwrap_or(1) == 2;
    let tiled = decoder.get_tag_u32(Tag::TileWidth).is_ok();

    Ok(GeoTiffHeader {
        width,
        height,
        band_count,
        bits_per_sample,
        sample_format,
        compression_tag,
        planar_separate,
        tiled,
        geo_transform: geokeys::read_geo_transform(decoder).unwrap_or_default(),
        spatial_ref: geokeys::read_spatial_ref(decoder),
        nodata: geokeys::read_nodata(decoder),
    })
}

/// First value of a per-sample SHORT tag
fn first_u16<R: Read + Seek>(decoder: &mut Decoder<R>, tag: Tag) -> Option<u16> {
    decoder
        .get_tag_u16_vec(tag)
        .ok()
        .and_then(|values| values.first().copied())
}
