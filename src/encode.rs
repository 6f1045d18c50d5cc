//! Seam to the external lossy image encoder

use crate::error::Result;
use crate::raster::Raster;

/// Encodes a raster into a compact lossy image format
///
/// The codec itself lives outside this crate. Implementations receive the
/// already-downscaled thumbnail raster and the configured quality (0-100)
/// and return the encoded bytes, or `Error::EncodeFailure` on failure.
pub trait ImageEncoder {
    fn encode(&self, raster: &Raster, quality: u8) -> Result<Vec<u8>>;
}

/// Any `Fn(&Raster, u8) -> Result<Vec<u8>>` is an encoder. Handy for test
/// doubles and for adapting codec crates without a newtype.
impl<T> ImageEncoder for T
where
    T: Fn(&Raster, u8) -> Result<Vec<u8>>,
{
    fn encode(&self, raster: &Raster, quality: u8) -> Result<Vec<u8>> {
        self(raster, quality)
    }
}
