//! 24-bit BMP encoder.
//!
//! Output is the classic 14-byte file header, a 40-byte `BITMAPINFOHEADER`
//! and a bottom-up BGR pixel array with each row padded to 4 bytes.

mod encode;

pub use encode::{
    BmpEncoder, BmpGeometry, DEFAULT_DPI, HEADER_SIZE, MAX_DPI, patch_file_size,
    pixels_per_meter,
};

use std::io::Write;

use enough::Stop;

use crate::error::BmError;
use crate::grid::PixelGrid;

/// Encode `grid` to `sink` at the default resolution. Returns the file size.
pub fn encode_bmp<W: Write + ?Sized>(
    grid: &PixelGrid,
    sink: &mut W,
    stop: impl Stop,
) -> Result<u32, BmError> {
    BmpEncoder::new().encode(grid, sink, stop)
}

/// Encode `grid` to a new buffer at the default resolution.
pub fn encode_bmp_to_vec(grid: &PixelGrid, stop: impl Stop) -> Result<Vec<u8>, BmError> {
    BmpEncoder::new().encode_to_vec(grid, stop)
}
