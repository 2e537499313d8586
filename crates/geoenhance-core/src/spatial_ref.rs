//! Spatial reference carried as GeoTIFF GeoKeys
//!
//! A GeoTIFF encodes its coordinate system as a GeoKey directory plus two
//! parameter arrays (doubles and a `|`-separated ASCII block). `SpatialRef`
//! keeps those three arrays verbatim so a projection read from one file can
//! be written to another without a projection database.

use crate::error::{Error, Result};
use std::fmt;

/// GeoKey IDs used by this crate
pub mod keys {
    pub const GT_MODEL_TYPE: u16 = 1024;
    pub const GT_RASTER_TYPE: u16 = 1025;
    pub const GT_CITATION: u16 = 1026;
    pub const GEOGRAPHIC_TYPE: u16 = 2048;
    pub const PROJECTED_CS_TYPE: u16 = 3072;

    pub const MODEL_TYPE_PROJECTED: u16 = 1;
    pub const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
    pub const RASTER_PIXEL_IS_AREA: u16 = 1;

    /// Value meaning "user-defined" for code-valued keys
    pub const USER_DEFINED: u16 = 32767;
}

/// TIFF tag holding GeoDoubleParams; GeoKeys stored there point at it
pub const GEO_DOUBLE_PARAMS_TAG: u16 = 34736;
/// TIFF tag holding GeoAsciiParams; GeoKeys stored there point at it
pub const GEO_ASCII_PARAMS_TAG: u16 = 34737;

/// Coordinate reference system of a raster, as GeoTIFF GeoKeys
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialRef {
    geo_keys: Vec<u16>,
    double_params: Vec<f64>,
    ascii_params: String,
}

impl SpatialRef {
    /// Wrap a GeoKey directory and its parameter arrays.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if the directory header is missing
    /// or its key count does not match the array length.
    pub fn from_geokeys(
        geo_keys: Vec<u16>,
        double_params: Vec<f64>,
        ascii_params: String,
    ) -> Result<Self> {
        if geo_keys.len() < 4 {
            return Err(Error::InvalidParameter(format!(
                "GeoKey directory too short: {} entries",
                geo_keys.len()
            )));
        }
        let declared = geo_keys[3] as usize;
        if geo_keys.len() < 4 + declared * 4 {
            return Err(Error::InvalidParameter(format!(
                "GeoKey directory declares {} keys but holds {} values",
                declared,
                geo_keys.len() - 4
            )));
        }
        Ok(Self {
            geo_keys,
            double_params,
            ascii_params,
        })
    }

    /// Minimal spatial reference for an EPSG code.
    ///
    /// Codes in 4000..5000 are treated as geographic, everything else as
    /// projected.
    pub fn from_epsg(code: u16) -> Self {
        let geographic = (4000..5000).contains(&code);
        let (model, crs_key) = if geographic {
            (keys::MODEL_TYPE_GEOGRAPHIC, keys::GEOGRAPHIC_TYPE)
        } else {
            (keys::MODEL_TYPE_PROJECTED, keys::PROJECTED_CS_TYPE)
        };
        let geo_keys = vec![
            1, 1, 0, 3, // version 1.1.0, 3 keys
            keys::GT_MODEL_TYPE, 0, 1, model,
            keys::GT_RASTER_TYPE, 0, 1, keys::RASTER_PIXEL_IS_AREA,
            crs_key, 0, 1, code,
        ];
        Self {
            geo_keys,
            double_params: Vec::new(),
            ascii_params: String::new(),
        }
    }

    /// Raw GeoKey directory (header + 4 shorts per key)
    pub fn geo_keys(&self) -> &[u16] {
        &self.geo_keys
    }

    /// GeoDoubleParams values
    pub fn double_params(&self) -> &[f64] {
        &self.double_params
    }

    /// GeoAsciiParams block
    pub fn ascii_params(&self) -> &str {
        &self.ascii_params
    }

    /// Number of keys in the directory
    pub fn key_count(&self) -> usize {
        self.geo_keys[3] as usize
    }

    /// `(key_id, location, count, value_offset)` entries
    fn entries(&self) -> impl Iterator<Item = (u16, u16, u16, u16)> + '_ {
        self.geo_keys[4..4 + self.key_count() * 4]
            .chunks_exact(4)
            .map(|e| (e[0], e[1], e[2], e[3]))
    }

    /// Value of a short-valued key stored inline in the directory
    pub fn key_value(&self, key: u16) -> Option<u16> {
        self.entries()
            .find(|&(id, loc, _, _)| id == key && loc == 0)
            .map(|(_, _, _, value)| value)
    }

    /// ASCII value of a key stored in GeoAsciiParams, without the `|` terminator
    pub fn key_ascii(&self, key: u16) -> Option<&str> {
        let (_, _, count, offset) = self
            .entries()
            .find(|&(id, loc, _, _)| id == key && loc == GEO_ASCII_PARAMS_TAG)?;
        let start = offset as usize;
        let end = start + count as usize;
        let text = self.ascii_params.get(start..end)?;
        Some(text.trim_end_matches(['|', '\0']))
    }

    /// EPSG code of the projected or geographic CRS, if one is declared
    pub fn epsg(&self) -> Option<u16> {
        [keys::PROJECTED_CS_TYPE, keys::GEOGRAPHIC_TYPE]
            .into_iter()
            .filter_map(|k| self.key_value(k))
            .find(|&code| code != 0 && code != keys::USER_DEFINED)
    }

    /// Whether the model type is geographic (lat/long)
    pub fn is_geographic(&self) -> bool {
        self.key_value(keys::GT_MODEL_TYPE) == Some(keys::MODEL_TYPE_GEOGRAPHIC)
    }

    /// Short printable description: `EPSG:<code>`, the citation, or `user-defined`
    pub fn description(&self) -> String {
        if let Some(code) = self.epsg() {
            return format!("EPSG:{}", code);
        }
        match self.key_ascii(keys::GT_CITATION) {
            Some(citation) if !citation.is_empty() => citation.to_string(),
            _ => "user-defined".to_string(),
        }
    }
}

impl fmt::Display for SpatialRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_epsg_projected() {
        let srs = SpatialRef::from_epsg(32618);
        assert_eq!(srs.key_count(), 3);
        assert_eq!(srs.epsg(), Some(32618));
        assert!(!srs.is_geographic());
        assert_eq!(srs.to_string(), "EPSG:32618");
    }

    #[test]
    fn test_from_epsg_geographic() {
        let srs = SpatialRef::from_epsg(4326);
        assert!(srs.is_geographic());
        assert_eq!(srs.key_value(keys::GEOGRAPHIC_TYPE), Some(4326));
        assert_eq!(srs.key_value(keys::PROJECTED_CS_TYPE), None);
    }

    #[test]
    fn test_citation_from_ascii_params() {
        let citation = "NAD83 / custom|";
        let geo_keys = vec![
            1, 1, 0, 2,
            keys::GT_MODEL_TYPE, 0, 1, keys::MODEL_TYPE_PROJECTED,
            keys::GT_CITATION, GEO_ASCII_PARAMS_TAG, citation.len() as u16, 0,
        ];
        let srs = SpatialRef::from_geokeys(geo_keys, vec![], citation.to_string()).unwrap();
        assert_eq!(srs.epsg(), None);
        assert_eq!(srs.key_ascii(keys::GT_CITATION), Some("NAD83 / custom"));
        assert_eq!(srs.description(), "NAD83 / custom");
    }

    #[test]
    fn test_user_defined_is_not_epsg() {
        let geo_keys = vec![1, 1, 0, 1, keys::PROJECTED_CS_TYPE, 0, 1, keys::USER_DEFINED];
        let srs = SpatialRef::from_geokeys(geo_keys, vec![], String::new()).unwrap();
        assert_eq!(srs.epsg(), None);
        assert_eq!(srs.description(), "user-defined");
    }

    #[test]
    fn test_invalid_directory() {
        assert!(SpatialRef::from_geokeys(vec![1, 1], vec![], String::new()).is_err());
        assert!(SpatialRef::from_geokeys(vec![1, 1, 0, 2, 1024, 0, 1, 1], vec![], String::new()).is_err());
    }
}
