//! GeoTIFF reading and writing
//!
//! Pixel data goes through the `tiff` crate; the georeferencing tags are
//! handled in [`crate::geokeys`]. Rasters are read into `f64` bands and
//! quantized back to their sample type on write.
//!
//! 1- and 3-band unsigned and float rasters are written through the
//! `tiff` color types and honor [`GeoTiffOptions::compression`]. Other band
//! counts and signed types are written as one uncompressed chunky strip.

use crate::geokeys::{self, encode_err};
use crate::header::{GeoTiffHeader, header_from_decoder, open_decoder};
use crate::{IoError, IoResult};
use geoenhance_core::{Band, Raster, RasterFormat, RasterMetadata, SampleType};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;
use std::str::FromStr;
use tiff::decoder::DecodingResult;
use tiff::encoder::colortype::{
    self, Gray8, Gray16, Gray32, Gray32Float, Gray64Float, RGB8, RGB16, RGB32, RGB32Float,
    RGB64Float,
};
use tiff::encoder::{Compression, TiffEncoder, TiffValue};
use tiff::tags::Tag;

/// TIFF compression method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiffCompression {
    /// No compression
    #[default]
    None,
    /// PackBits compression
    PackBits,
    /// LZW compression
    Lzw,
    /// ZIP/Deflate compression
    Zip,
}

impl TiffCompression {
    /// Resolve a TIFF `Compression` tag value
    pub fn from_tag(value: u16) -> Option<Self> {
        match value {
            1 => Some(TiffCompression::None),
            5 => Some(TiffCompression::Lzw),
            8 | 0x80B2 => Some(TiffCompression::Zip), // Deflate or OldDeflate
            0x8005 => Some(TiffCompression::PackBits),
            _ => None,
        }
    }

    /// TIFF `Compression` tag value
    pub fn tag(self) -> u16 {
        match self {
            TiffCompression::None => 1,
            TiffCompression::Lzw => 5,
            TiffCompression::Zip => 8,
            TiffCompression::PackBits => 0x8005,
        }
    }

    /// Lowercase name as accepted by `FromStr`
    pub fn name(self) -> &'static str {
        match self {
            TiffCompression::None => "none",
            TiffCompression::PackBits => "packbits",
            TiffCompression::Lzw => "lzw",
            TiffCompression::Zip => "zip",
        }
    }

    /// Convert to tiff crate's Compression enum
    fn to_tiff_compression(self) -> Compression {
        match self {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::PackBits => Compression::Packbits,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::Zip => Compression::Deflate(tiff::encoder::DeflateLevel::default()),
        }
    }
}

impl FromStr for TiffCompression {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(TiffCompression::None),
            "packbits" => Ok(TiffCompression::PackBits),
            "lzw" => Ok(TiffCompression::Lzw),
            "zip" | "deflate" => Ok(TiffCompression::Zip),
            other => Err(IoError::UnsupportedFormat(format!(
                "unknown TIFF compression: {}",
                other
            ))),
        }
    }
}

/// Options for [`write_geotiff`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeoTiffOptions {
    /// Compression for 1- and 3-band unsigned/float output
    pub compression: TiffCompression,
}

impl GeoTiffOptions {
    pub fn with_compression(compression: TiffCompression) -> Self {
        Self { compression }
    }
}

/// Read a GeoTIFF file into a [`Raster`]
///
/// # Errors
///
/// Returns `IoError::NotFound` if `path` does not exist and a decode or
/// format error if the file is not a readable GeoTIFF.
pub fn read_geotiff<P: AsRef<Path>>(path: P) -> IoResult<Raster> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    let raster = read_geotiff_from(BufReader::new(file))?;
    tracing::debug!(
        "read {} ({}x{}, {} band(s), {})",
        path.display(),
        raster.width(),
        raster.height(),
        raster.band_count(),
        raster.sample_type()
    );
    Ok(raster)
}

/// Read a GeoTIFF from any seekable reader
pub fn read_geotiff_from<R: Read + Seek>(reader: R) -> IoResult<Raster> {
    let mut decoder = open_decoder(reader)?;

    let header = header_from_decoder(&mut decoder)?;
    check_layout(&header)?;

    let image_data = decoder
        .read_image()
        .map_err(|e| IoError::DecodeError(format!("Failed to read TIFF image data: {}", e)))?;
    let (sample_type, samples) = decoded_samples(image_data)?;

    let bands = deinterleave(&samples, header.width, header.height)?;
    let metadata = RasterMetadata {
        geo_transform: header.geo_transform,
        spatial_ref: header.spatial_ref,
        format: RasterFormat::GTiff,
        sample_type,
        nodata: header.nodata,
    };
    Ok(Raster::new(bands, metadata)?)
}

/// Reject layouts the decoder path does not handle
fn check_layout(header: &GeoTiffHeader) -> IoResult<()> {
    if header.planar_separate {
        return Err(IoError::UnsupportedFormat(
            "planar-separate TIFF (PlanarConfiguration = 2)".to_string(),
        ));
    }
    if header.sample_type().is_none() {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported sample layout: SampleFormat {} with {} bits",
            header.sample_format, header.bits_per_sample
        )));
    }
    if header.band_count == 0 {
        return Err(IoError::InvalidData("SamplesPerPixel is 0".to_string()));
    }
    Ok(())
}

/// Widen decoded samples to `f64`, keeping track of the on-disk type
fn decoded_samples(data: DecodingResult) -> IoResult<(SampleType, Vec<f64>)> {
    let widened = match data {
        DecodingResult::U8(v) => (SampleType::U8, v.into_iter().map(f64::from).collect()),
        DecodingResult::U16(v) => (SampleType::U16, v.into_iter().map(f64::from).collect()),
        DecodingResult::U32(v) => (SampleType::U32, v.into_iter().map(f64::from).collect()),
        DecodingResult::I8(v) => (SampleType::I8, v.into_iter().map(f64::from).collect()),
        DecodingResult::I16(v) => (SampleType::I16, v.into_iter().map(f64::from).collect()),
        DecodingResult::I32(v) => (SampleType::I32, v.into_iter().map(f64::from).collect()),
        DecodingResult::F16(v) => (SampleType::F32, v.into_iter().map(half::f16::to_f64).collect()),
        DecodingResult::F32(v) => (SampleType::F32, v.into_iter().map(f64::from).collect()),
        DecodingResult::F64(v) => (SampleType::F64, v),
        DecodingResult::U64(_) | DecodingResult::I64(_) => {
            return Err(IoError::UnsupportedFormat(
                "64-bit integer samples".to_string(),
            ));
        }
    };
    Ok(widened)
}

/// Split chunky (interleaved) samples into bands
fn deinterleave(samples: &[f64], width: u32, height: u32) -> IoResult<Vec<Band>> {
    let pixels = (width as usize) * (height as usize);
    if pixels == 0 || samples.is_empty() || samples.len() % pixels != 0 {
        return Err(IoError::InvalidData(format!(
            "{} samples do not fill a {}x{} image",
            samples.len(),
            width,
            height
        )));
    }
    let band_count = samples.len() / pixels;
    let mut planes = vec![Vec::with_capacity(pixels); band_count];
    for pixel in samples.chunks_exact(band_count) {
        for (plane, &value) in planes.iter_mut().zip(pixel) {
            plane.push(value);
        }
    }
    planes
        .into_iter()
        .map(|data| Band::from_data(width, height, data).map_err(IoError::from))
        .collect()
}

/// Write a [`Raster`] to a GeoTIFF file
///
/// The file is removed again if encoding fails part-way.
///
/// # Errors
///
/// Returns `IoError::CreateFailed` if the file cannot be created and an
/// encode error if the raster cannot be written.
pub fn write_geotiff<P: AsRef<Path>>(
    path: P,
    raster: &Raster,
    options: &GeoTiffOptions,
) -> IoResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| IoError::CreateFailed {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = BufWriter::new(file);
    let result = write_geotiff_to(&mut writer, raster, options)
        .and_then(|()| writer.flush().map_err(IoError::from));
    drop(writer);

    if let Err(e) = result {
        if let Err(remove) = std::fs::remove_file(path) {
            tracing::warn!("cannot remove partial output {}: {}", path.display(), remove);
        }
        return Err(e);
    }

    tracing::debug!(
        "wrote {} ({}x{}, {} band(s), {}, {})",
        path.display(),
        raster.width(),
        raster.height(),
        raster.band_count(),
        raster.sample_type(),
        options.compression.name()
    );
    Ok(())
}

/// Write a [`Raster`] as GeoTIFF to any seekable writer
pub fn write_geotiff_to<W: Write + Seek>(
    writer: W,
    raster: &Raster,
    options: &GeoTiffOptions,
) -> IoResult<()> {
    let mut encoder = TiffEncoder::new(writer)
        .map_err(|e| IoError::EncodeError(format!("TIFF encoder error: {}", e)))?
        .with_compression(options.compression.to_tiff_compression());

    let sample_type = raster.sample_type();
    match (raster.band_count(), sample_type) {
        (1, SampleType::U8) => write_image::<_, Gray8>(&mut encoder, raster, interleave(raster, |v| v as u8)),
        (1, SampleType::U16) => write_image::<_, Gray16>(&mut encoder, raster, interleave(raster, |v| v as u16)),
        (1, SampleType::U32) => write_image::<_, Gray32>(&mut encoder, raster, interleave(raster, |v| v as u32)),
        (1, SampleType::F32) => write_image::<_, Gray32Float>(&mut encoder, raster, interleave(raster, |v| v as f32)),
        (1, SampleType::F64) => write_image::<_, Gray64Float>(&mut encoder, raster, interleave(raster, |v| v)),
        (3, SampleType::U8) => write_image::<_, RGB8>(&mut encoder, raster, interleave(raster, |v| v as u8)),
        (3, SampleType::U16) => write_image::<_, RGB16>(&mut encoder, raster, interleave(raster, |v| v as u16)),
        (3, SampleType::U32) => write_image::<_, RGB32>(&mut encoder, raster, interleave(raster, |v| v as u32)),
        (3, SampleType::F32) => write_image::<_, RGB32Float>(&mut encoder, raster, interleave(raster, |v| v as f32)),
        (3, SampleType::F64) => write_image::<_, RGB64Float>(&mut encoder, raster, interleave(raster, |v| v)),
        _ => {
            if options.compression != TiffCompression::None {
                tracing::debug!(
                    "{} band(s) of {}: writing uncompressed",
                    raster.band_count(),
                    sample_type
                );
            }
            write_raw_strip(&mut encoder, raster)
        }
    }
}

/// Interleave all bands, quantized to the raster's sample type
fn interleave<T>(raster: &Raster, convert: impl Fn(f64) -> T) -> Vec<T> {
    let sample_type = raster.sample_type();
    let bands = raster.bands();
    let pixels = bands[0].len();
    let mut out = Vec::with_capacity(pixels * bands.len());
    for i in 0..pixels {
        for band in bands {
            out.push(convert(sample_type.quantize(band.data()[i])));
        }
    }
    out
}

/// Write one image through a `tiff` color type
fn write_image<W, C>(
    encoder: &mut TiffEncoder<W>,
    raster: &Raster,
    data: Vec<C::Inner>,
) -> IoResult<()>
where
    W: Write + Seek,
    C: colortype::ColorType,
    [C::Inner]: TiffValue,
{
    let mut image = encoder
        .new_image::<C>(raster.width(), raster.height())
        .map_err(encode_err)?;
    geokeys::write_geo_tags(image.encoder(), raster.metadata())?;
    image.write_data(&data).map_err(encode_err)?;
    Ok(())
}

/// Write any band count and sample type as a single uncompressed chunky strip
fn write_raw_strip<W: Write + Seek>(encoder: &mut TiffEncoder<W>, raster: &Raster) -> IoResult<()> {
    let sample_type = raster.sample_type();
    let band_count = raster.band_count();
    let samples_per_pixel = u16::try_from(band_count).map_err(|_| {
        IoError::InvalidData(format!("{} bands exceed the TIFF limit", band_count))
    })?;

    let mut dir = encoder.image_directory().map_err(encode_err)?;

    dir.write_tag(Tag::ImageWidth, raster.width()).map_err(encode_err)?;
    dir.write_tag(Tag::ImageLength, raster.height()).map_err(encode_err)?;
    let bits_per_sample = vec![sample_type.bits(); band_count];
    dir.write_tag(Tag::BitsPerSample, bits_per_sample.as_slice())
        .map_err(encode_err)?;
    dir.write_tag(Tag::Compression, TiffCompression::None.tag())
        .map_err(encode_err)?;
    // BlackIsZero
    dir.write_tag(Tag::PhotometricInterpretation, 1u16)
        .map_err(encode_err)?;
    dir.write_tag(Tag::SamplesPerPixel, samples_per_pixel)
        .map_err(encode_err)?;
    let sample_format = vec![sample_type.sample_format(); band_count];
    dir.write_tag(Tag::SampleFormat, sample_format.as_slice())
        .map_err(encode_err)?;
    // Chunky
    dir.write_tag(Tag::PlanarConfiguration, 1u16)
        .map_err(encode_err)?;
    dir.write_tag(Tag::RowsPerStrip, raster.height())
        .map_err(encode_err)?;
    if band_count > 1 {
        // Unspecified
        let extra_samples = vec![0u16; band_count - 1];
        dir.write_tag(Tag::ExtraSamples, extra_samples.as_slice())
            .map_err(encode_err)?;
    }

    geokeys::write_geo_tags(&mut dir, raster.metadata())?;

    let bytes = strip_bytes(raster);
    let strip_offset = dir.write_data(bytes.as_slice()).map_err(encode_err)?;
    let strip_offset = u32::try_from(strip_offset)
        .map_err(|_| IoError::EncodeError("strip offset exceeds 4 GiB".to_string()))?;
    dir.write_tag(Tag::StripOffsets, strip_offset)
        .map_err(encode_err)?;
    let strip_byte_count = u32::try_from(bytes.len())
        .map_err(|_| IoError::EncodeError("strip exceeds 4 GiB".to_string()))?;
    dir.write_tag(Tag::StripByteCounts, strip_byte_count)
        .map_err(encode_err)?;

    dir.finish().map_err(encode_err)?;
    Ok(())
}

/// Interleaved samples in native byte order, matching the encoder's byte order
fn strip_bytes(raster: &Raster) -> Vec<u8> {
    match raster.sample_type() {
        SampleType::U8 => interleave(raster, |v| v as u8),
        SampleType::I8 => interleave(raster, |v| v as i8)
            .into_iter()
            .flat_map(i8::to_ne_bytes)
            .collect(),
        SampleType::U16 => interleave(raster, |v| v as u16)
            .into_iter()
            .flat_map(u16::to_ne_bytes)
            .collect(),
        SampleType::I16 => interleave(raster, |v| v as i16)
            .into_iter()
            .flat_map(i16::to_ne_bytes)
            .collect(),
        SampleType::U32 => interleave(raster, |v| v as u32)
            .into_iter()
            .flat_map(u32::to_ne_bytes)
            .collect(),
        SampleType::I32 => interleave(raster, |v| v as i32)
            .into_iter()
            .flat_map(i32::to_ne_bytes)
            .collect(),
        SampleType::F32 => interleave(raster, |v| v as f32)
            .into_iter()
            .flat_map(f32::to_ne_bytes)
            .collect(),
        SampleType::F64 => interleave(raster, |v| v)
            .into_iter()
            .flat_map(f64::to_ne_bytes)
            .collect(),
    }
}
