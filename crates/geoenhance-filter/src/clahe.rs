//! Contrast-limited adaptive histogram equalization (CLAHE)
//!
//! The image is split into a `tiles_x` x `tiles_y` grid. Each tile gets its
//! own equalization curve built from a clipped histogram; every output pixel
//! blends the curves of the four tiles whose centres surround it.
//!
//! Images whose size is not a multiple of the grid are padded on the right
//! and bottom with reflect-101 borders (`dcb|abcd|cba`) for the histogram
//! pass only. The output always has the input's dimensions.

use crate::{FilterError, FilterResult};
use image::{GrayImage, Luma};

/// Number of histogram bins for 8-bit input
pub const HIST_SIZE: usize = 256;

/// Per-tile tone curve
type TileLut = [u8; HIST_SIZE];

/// CLAHE parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClaheParams {
    /// Contrast limit relative to a flat histogram; `<= 0` disables clipping
    pub clip_limit: f32,
    /// Number of tiles across
    pub tiles_x: u32,
    /// Number of tiles down
    pub tiles_y: u32,
}

impl Default for ClaheParams {
    fn default() -> Self {
        Self {
            clip_limit: 2.0,
            tiles_x: 64,
            tiles_y: 64,
        }
    }
}

impl ClaheParams {
    pub fn new(clip_limit: f32, tiles_x: u32, tiles_y: u32) -> Self {
        Self {
            clip_limit,
            tiles_x,
            tiles_y,
        }
    }

    /// Check the grid is non-empty and the clip limit is a number
    pub fn validate(&self) -> FilterResult<()> {
        if self.tiles_x == 0 || self.tiles_y == 0 {
            return Err(FilterError::InvalidParameters(format!(
                "tile grid must be at least 1x1, got {}x{}",
                self.tiles_x, self.tiles_y
            )));
        }
        if !self.clip_limit.is_finite() {
            return Err(FilterError::InvalidParameters(format!(
                "clip limit must be finite, got {}",
                self.clip_limit
            )));
        }
        Ok(())
    }
}

/// Apply CLAHE to an 8-bit gray image
///
/// # Errors
///
/// Returns `FilterError::EmptyImage` for a zero-sized image and
/// `FilterError::InvalidParameters` for an empty grid.
pub fn clahe(image: &GrayImage, params: &ClaheParams) -> FilterResult<GrayImage> {
    params.validate()?;
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(FilterError::EmptyImage);
    }

    let tiles_x = params.tiles_x as usize;
    let tiles_y = params.tiles_y as usize;

    let padded;
    let src = if width as usize % tiles_x == 0 && height as usize % tiles_y == 0 {
        image
    } else {
        padded = pad_reflect_101(
            image,
            (width as usize).div_ceil(tiles_x) * tiles_x,
            (height as usize).div_ceil(tiles_y) * tiles_y,
        );
        &padded
    };

    let tile_w = src.width() as usize / tiles_x;
    let tile_h = src.height() as usize / tiles_y;
    let tile_area = tile_w * tile_h;
    let limit = clip_limit_count(params.clip_limit, tile_area);
    let lut_scale = (HIST_SIZE - 1) as f32 / tile_area as f32;

    let mut luts: Vec<TileLut> = Vec::with_capacity(tiles_x * tiles_y);
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let mut hist = tile_histogram(src, tx * tile_w, ty * tile_h, tile_w, tile_h);
            if let Some(limit) = limit {
                clip_histogram(&mut hist, limit);
            }
            luts.push(histogram_lut(&hist, lut_scale));
        }
    }

    Ok(interpolate(image, &luts, (tile_w, tile_h), (tiles_x, tiles_y)))
}

/// Histogram bin limit for a tile, `None` when clipping is disabled
fn clip_limit_count(clip_limit: f32, tile_area: usize) -> Option<u32> {
    if clip_limit <= 0.0 {
        return None;
    }
    let limit = (clip_limit * tile_area as f32 / HIST_SIZE as f32) as u32;
    Some(limit.max(1))
}

/// Reflect-101 index into `[0, n)`, for any distance past the edge
fn reflect_101(i: usize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let period = 2 * (n - 1);
    let m = i % period;
    if m < n { m } else { period - m }
}

/// Extend an image to `new_width` x `new_height` with reflect-101 borders
fn pad_reflect_101(image: &GrayImage, new_width: usize, new_height: usize) -> GrayImage {
    let (width, height) = (image.width() as usize, image.height() as usize);
    GrayImage::from_fn(new_width as u32, new_height as u32, |x, y| {
        let sx = reflect_101(x as usize, width);
        let sy = reflect_101(y as usize, height);
        *image.get_pixel(sx as u32, sy as u32)
    })
}

fn tile_histogram(
    src: &GrayImage,
    x0: usize,
    y0: usize,
    tile_w: usize,
    tile_h: usize,
) -> [u32; HIST_SIZE] {
    let mut hist = [0u32; HIST_SIZE];
    for y in y0..y0 + tile_h {
        for x in x0..x0 + tile_w {
            hist[src.get_pixel(x as u32, y as u32)[0] as usize] += 1;
        }
    }
    hist
}

/// Clip every bin at `limit` and hand the excess back out.
///
/// The excess is spread as an equal batch over all bins, then the
/// remainder one count at a time with a stride. The total is preserved.
fn clip_histogram(hist: &mut [u32; HIST_SIZE], limit: u32) {
    let mut clipped = 0usize;
    for bin in hist.iter_mut() {
        if *bin > limit {
            clipped += (*bin - limit) as usize;
            *bin = limit;
        }
    }

    let batch = (clipped / HIST_SIZE) as u32;
    let mut residual = clipped % HIST_SIZE;
    for bin in hist.iter_mut() {
        *bin += batch;
    }

    if residual != 0 {
        let step = (HIST_SIZE / residual).max(1);
        let mut i = 0;
        while i < HIST_SIZE && residual > 0 {
            hist[i] += 1;
            i += step;
            residual -= 1;
        }
    }
}

/// Cumulative histogram scaled to [0, 255]
fn histogram_lut(hist: &[u32; HIST_SIZE], lut_scale: f32) -> TileLut {
    let mut lut = [0u8; HIST_SIZE];
    let mut sum = 0u32;
    for (entry, &count) in lut.iter_mut().zip(hist) {
        sum += count;
        *entry = (sum as f32 * lut_scale).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// Neighbouring tile indices and the weight of the second one for a pixel
/// coordinate. Node *t* sits at `(t + 0.5) * tile_size`; positions outside
/// the outermost nodes clamp to the border tile.
fn tile_neighbours(pos: u32, tile_size: usize, tiles: usize) -> (usize, usize, f32) {
    let f = pos as f32 / tile_size as f32 - 0.5;
    let lower = f.floor();
    let weight = f - lower;
    let lower = lower as i64;
    let t1 = lower.max(0) as usize;
    let t2 = ((lower + 1).max(0) as usize).min(tiles - 1);
    (t1.min(tiles - 1), t2, weight)
}

fn interpolate(
    image: &GrayImage,
    luts: &[TileLut],
    (tile_w, tile_h): (usize, usize),
    (tiles_x, tiles_y): (usize, usize),
) -> GrayImage {
    let cols: Vec<_> = (0..image.width())
        .map(|x| tile_neighbours(x, tile_w, tiles_x))
        .collect();
    let rows: Vec<_> = (0..image.height())
        .map(|y| tile_neighbours(y, tile_h, tiles_y))
        .collect();

    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let (x1, x2, xa) = cols[x as usize];
        let (y1, y2, ya) = rows[y as usize];
        let p = image.get_pixel(x, y)[0] as usize;

        let lut = |tx: usize, ty: usize| luts[ty * tiles_x + tx][p] as f32;
        let top = lut(x1, y1) * (1.0 - xa) + lut(x2, y1) * xa;
        let bottom = lut(x1, y2) * (1.0 - xa) + lut(x2, y2) * xa;
        let value = top * (1.0 - ya) + bottom * ya;

        Luma([value.round().clamp(0.0, 255.0) as u8])
    })
}
