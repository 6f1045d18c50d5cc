//! RGBA pixel buffers and nearest-neighbor downscaling
//!
//! Thumbnails are produced by copying the closest source pixel for each
//! destination pixel, with no blending or averaging. Speed is the point:
//! filmstrips are small preview images, not archival renders.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Bytes per pixel (R, G, B, A)
pub const BYTES_PER_PIXEL: usize = 4;

/// A decoded RGBA image
///
/// Pixels are stored row-major, 4 bytes per pixel, channel order R, G, B, A.
/// The buffer length always equals `width * height * 4`; both the constructor
/// and deserialization enforce this so downstream pixel arithmetic can index
/// without bounds checks on every access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RasterData")]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

/// Wire form of [`Raster`], converted through `Raster::new` on deserialize.
#[derive(Deserialize)]
struct RasterData {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl TryFrom<RasterData> for Raster {
    type Error = Error;

    fn try_from(data: RasterData) -> Result<Self> {
        Raster::new(data.width, data.height, data.pixels)
    }
}

impl Raster {
    /// Create a raster, validating the buffer length against the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(Error::InvalidRaster(format!(
                "{}x{} raster requires {} bytes, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a raster filled with a single RGBA color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * BYTES_PER_PIXEL);
        for _ in 0..count {
            pixels.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA channels of the pixel at (x, y).
    ///
    /// Panics if (x, y) is outside the raster; callers derive coordinates
    /// from the raster's own dimensions.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let offset = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.pixels[offset..offset + BYTES_PER_PIXEL]);
        out
    }

    /// Downscale to a fixed height via nearest-neighbor sampling.
    ///
    /// `scale_factor = height / target_height`; the scaled width is
    /// `floor(width / scale_factor)`, which preserves the aspect ratio within
    /// floor rounding. Each output pixel (i, j) copies all four channel bytes
    /// of source pixel `(floor(i * scale_factor), floor(j * scale_factor))`
    /// unmodified.
    pub fn scale_to_height(&self, target_height: u32) -> Result<Raster> {
        if target_height == 0 {
            return Err(Error::ConfigError("thumbnail height must be non-zero".into()));
        }
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidRaster("cannot scale an empty raster".into()));
        }

        let scale_factor = self.height as f64 / target_height as f64;
        let scaled_width = (self.width as f64 / scale_factor).floor() as u32;
        let scaled_height = target_height;

        let src_width = self.width as usize;
        let mut pixels =
            Vec::with_capacity(scaled_width as usize * scaled_height as usize * BYTES_PER_PIXEL);
        for j in 0..scaled_height {
            let orig_y = (j as f64 * scale_factor).floor() as usize;
            let row_offset = orig_y * src_width;
            for i in 0..scaled_width {
                let orig_x = (i as f64 * scale_factor).floor() as usize;
                let offset = (row_offset + orig_x) * BYTES_PER_PIXEL;
                pixels.extend_from_slice(&self.pixels[offset..offset + BYTES_PER_PIXEL]);
            }
        }

        Ok(Raster {
            width: scaled_width,
            height: scaled_height,
            pixels,
        })
    }
}
