//! Affine geotransform for rasters

use std::fmt;

/// Affine transformation coefficients for georeferencing rasters.
///
/// Converts pixel/line coordinates (col, row) to georeferenced (x, y):
/// ```text
/// x = origin_x + col * pixel_width + row * row_rotation
/// y = origin_y + col * col_rotation + row * pixel_height
/// ```
///
/// For north-up images the rotation terms are 0 and `pixel_height` is
/// negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Pixel width (cell size in X direction)
    pub pixel_width: f64,
    /// Pixel height (cell size in Y direction, usually negative)
    pub pixel_height: f64,
    /// Row rotation term (GDAL coefficient 2)
    pub row_rotation: f64,
    /// Column rotation term (GDAL coefficient 4)
    pub col_rotation: f64,
}

impl GeoTransform {
    /// Create a north-up GeoTransform (no rotation)
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
            row_rotation: 0.0,
            col_rotation: 0.0,
        }
    }

    /// Create from GDAL order `[origin_x, pixel_width, row_rotation, origin_y, col_rotation, pixel_height]`
    pub fn from_gdal(coeffs: [f64; 6]) -> Self {
        Self {
            origin_x: coeffs[0],
            pixel_width: coeffs[1],
            row_rotation: coeffs[2],
            origin_y: coeffs[3],
            col_rotation: coeffs[4],
            pixel_height: coeffs[5],
        }
    }

    /// Convert to GDAL order
    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            self.row_rotation,
            self.origin_y,
            self.col_rotation,
            self.pixel_height,
        ]
    }

    /// Geotransform of the same footprint resampled by `factor`.
    ///
    /// The four linear coefficients are divided by `factor`; the origin is
    /// unchanged. A factor of 4 turns 0.25 m pixels into 0.0625 m pixels.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            origin_x: self.origin_x,
            origin_y: self.origin_y,
            pixel_width: self.pixel_width / factor,
            pixel_height: self.pixel_height / factor,
            row_rotation: self.row_rotation / factor,
            col_rotation: self.col_rotation / factor,
        }
    }

    /// Geographic coordinates of a pixel's top-left corner
    pub fn pixel_to_geo_corner(&self, col: usize, row: usize) -> (f64, f64) {
        let col_f = col as f64;
        let row_f = row as f64;

        let x = self.origin_x + col_f * self.pixel_width + row_f * self.row_rotation;
        let y = self.origin_y + col_f * self.col_rotation + row_f * self.pixel_height;

        (x, y)
    }

    /// Whether either rotation term is non-zero
    pub fn has_rotation(&self) -> bool {
        self.row_rotation.abs() >= 1e-10 || self.col_rotation.abs() >= 1e-10
    }

    /// North-up image: no rotation and negative pixel height
    pub fn is_north_up(&self) -> bool {
        !self.has_rotation() && self.pixel_height < 0.0
    }

    /// Bounding box `(min_x, min_y, max_x, max_y)` of a raster of the given size
    pub fn bounds(&self, width: usize, height: usize) -> (f64, f64, f64, f64) {
        let (x0, y0) = self.pixel_to_geo_corner(0, 0);
        let (x1, y1) = self.pixel_to_geo_corner(width, 0);
        let (x2, y2) = self.pixel_to_geo_corner(0, height);
        let (x3, y3) = self.pixel_to_geo_corner(width, height);

        let min_x = x0.min(x1).min(x2).min(x3);
        let max_x = x0.max(x1).max(x2).max(x3);
        let min_y = y0.min(y1).min(y2).min(y3);
        let max_y = y0.max(y1).max(y2).max(y3);

        (min_x, min_y, max_x, max_y)
    }
}

impl Default for GeoTransform {
    /// GDAL's default for ungeoreferenced rasters: `(0, 1, 0, 0, 0, 1)`
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }
}

impl fmt::Display for GeoTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.to_gdal();
        write!(
            f,
            "({}, {}, {}, {}, {}, {})",
            c[0], c[1], c[2], c[3], c[4], c[5]
        )
    }
}
