//! GeoTIFF georeferencing tags
//!
//! Reads and writes the TIFF tags that turn a plain TIFF into a GeoTIFF:
//!
//! | tag | name | content |
//! |---|---|---|
//! | 33550 | ModelPixelScale | `[sx, sy, sz]` |
//! | 33922 | ModelTiepoint | `[i, j, k, x, y, z]` |
//! | 34264 | ModelTransformation | 4x4 affine matrix, row-major |
//! | 34735 | GeoKeyDirectory | header + 4 shorts per key |
//! | 34736 | GeoDoubleParams | doubles referenced by keys |
//! | 34737 | GeoAsciiParams | `|`-terminated strings referenced by keys |
//! | 42113 | GDAL_NODATA | no-data value as ASCII |

use crate::{IoError, IoResult};
use geoenhance_core::spatial_ref::{GEO_ASCII_PARAMS_TAG, GEO_DOUBLE_PARAMS_TAG, keys};
use geoenhance_core::{GeoTransform, RasterMetadata, SpatialRef};
use std::io::{Read, Seek, Write};
use tiff::decoder::Decoder;
use tiff::encoder::{DirectoryEncoder, TiffKind};
use tiff::tags::Tag;

pub const MODEL_PIXEL_SCALE_TAG: u16 = 33550;
pub const MODEL_TIEPOINT_TAG: u16 = 33922;
pub const MODEL_TRANSFORMATION_TAG: u16 = 34264;
pub const GEO_KEY_DIRECTORY_TAG: u16 = 34735;
pub const GDAL_NODATA_TAG: u16 = 42113;

/// Read the geotransform from pixel scale + tiepoint, falling back to
/// ModelTransformation. `None` when the file carries neither.
pub(crate) fn read_geo_transform<R: Read + Seek>(
    decoder: &mut Decoder<R>,
) -> Option<GeoTransform> {
    let scale = decoder
        .get_tag_f64_vec(Tag::Unknown(MODEL_PIXEL_SCALE_TAG))
        .ok();
    let tiepoint = decoder
        .get_tag_f64_vec(Tag::Unknown(MODEL_TIEPOINT_TAG))
        .ok();

    if let (Some(scale), Some(tiepoint)) = (scale, tiepoint) {
        if scale.len() >= 2 && tiepoint.len() >= 6 {
            // Tiepoint ties raster (i, j) to model (x, y)
            let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
            let origin_y = tiepoint[4] + tiepoint[1] * scale[1];
            return Some(GeoTransform::new(origin_x, origin_y, scale[0], -scale[1]));
        }
    }

    let matrix = decoder
        .get_tag_f64_vec(Tag::Unknown(MODEL_TRANSFORMATION_TAG))
        .ok()?;
    if matrix.len() < 8 {
        return None;
    }
    // x = m0*i + m1*j + m3, y = m4*i + m5*j + m7
    Some(GeoTransform::from_gdal([
        matrix[3], matrix[0], matrix[1], matrix[7], matrix[4], matrix[5],
    ]))
}

/// Read the GeoKey directory and its parameter arrays
pub(crate) fn read_spatial_ref<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<SpatialRef> {
    let geo_keys = decoder
        .get_tag_u16_vec(Tag::Unknown(GEO_KEY_DIRECTORY_TAG))
        .ok()?;
    let double_params = decoder
        .get_tag_f64_vec(Tag::Unknown(GEO_DOUBLE_PARAMS_TAG))
        .unwrap_or_default();
    let ascii_params = decoder
        .get_tag_ascii_string(Tag::Unknown(GEO_ASCII_PARAMS_TAG))
        .unwrap_or_default();

    match SpatialRef::from_geokeys(geo_keys, double_params, ascii_params) {
        Ok(srs) => Some(srs),
        Err(e) => {
            tracing::warn!("ignoring malformed GeoKey directory: {}", e);
            None
        }
    }
}

/// Read the GDAL no-data value
pub(crate) fn read_nodata<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<f64> {
    let text = decoder
        .get_tag_ascii_string(Tag::Unknown(GDAL_NODATA_TAG))
        .ok()?;
    parse_nodata(&text)
}

fn parse_nodata(text: &str) -> Option<f64> {
    text.trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .parse()
        .ok()
}

/// GeoKey directory for rasters with no known CRS
fn default_geo_keys() -> Vec<u16> {
    vec![
        1, 1, 0, 2,
        keys::GT_MODEL_TYPE, 0, 1, keys::MODEL_TYPE_PROJECTED,
        keys::GT_RASTER_TYPE, 0, 1, keys::RASTER_PIXEL_IS_AREA,
    ]
}

/// Write georeferencing and no-data tags into an image directory
pub(crate) fn write_geo_tags<W: Write + Seek, K: TiffKind>(
    dir: &mut DirectoryEncoder<'_, W, K>,
    metadata: &RasterMetadata,
) -> IoResult<()> {
    let gt = &metadata.geo_transform;

    if gt.is_north_up() {
        let pixel_scale = [gt.pixel_width, -gt.pixel_height, 0.0];
        dir.write_tag(Tag::Unknown(MODEL_PIXEL_SCALE_TAG), pixel_scale.as_slice())
            .map_err(encode_err)?;
        let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
        dir.write_tag(Tag::Unknown(MODEL_TIEPOINT_TAG), tiepoint.as_slice())
            .map_err(encode_err)?;
    } else {
        let matrix = [
            gt.pixel_width, gt.row_rotation, 0.0, gt.origin_x,
            gt.col_rotation, gt.pixel_height, 0.0, gt.origin_y,
            0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        dir.write_tag(Tag::Unknown(MODEL_TRANSFORMATION_TAG), matrix.as_slice())
            .map_err(encode_err)?;
    }

    match &metadata.spatial_ref {
        Some(srs) => {
            dir.write_tag(Tag::Unknown(GEO_KEY_DIRECTORY_TAG), srs.geo_keys())
                .map_err(encode_err)?;
            if !srs.double_params().is_empty() {
                dir.write_tag(Tag::Unknown(GEO_DOUBLE_PARAMS_TAG), srs.double_params())
                    .map_err(encode_err)?;
            }
            if !srs.ascii_params().is_empty() {
                dir.write_tag(Tag::Unknown(GEO_ASCII_PARAMS_TAG), srs.ascii_params())
                    .map_err(encode_err)?;
            }
        }
        None => {
            let geo_keys = default_geo_keys();
            dir.write_tag(Tag::Unknown(GEO_KEY_DIRECTORY_TAG), geo_keys.as_slice())
                .map_err(encode_err)?;
        }
    }

    if let Some(nodata) = metadata.nodata {
        let text = nodata.to_string();
        dir.write_tag(Tag::Unknown(GDAL_NODATA_TAG), text.as_str())
            .map_err(encode_err)?;
    }

    Ok(())
}

pub(crate) fn encode_err(e: tiff::TiffError) -> IoError {
    IoError::EncodeError(format!("TIFF write error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nodata() {
        assert_eq!(parse_nodata("-99"), Some(-99.0));
        assert_eq!(parse_nodata(" 0.5\0"), Some(0.5));
        assert!(parse_nodata("nan").unwrap().is_nan());
        assert_eq!(parse_nodata("none"), None);
    }

    #[test]
    fn test_default_geo_keys_valid() {
        let srs = SpatialRef::from_geokeys(default_geo_keys(), vec![], String::new()).unwrap();
        assert_eq!(srs.key_count(), 2);
        assert_eq!(srs.key_value(keys::GT_RASTER_TYPE), Some(keys::RASTER_PIXEL_IS_AREA));
        assert_eq!(srs.epsg(), None);
    }

    #[test]
    fn test_nodata_text_format() {
        assert_eq!((-99.0f64).to_string(), "-99");
        assert_eq!(parse_nodata(&(-99.0f64).to_string()), Some(-99.0));
    }
}
