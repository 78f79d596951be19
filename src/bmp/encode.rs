//! BMP encoder: uncompressed 24-bit BMP, bottom-up rows.

use std::io::{self, Seek, SeekFrom, Write};

use enough::Stop;
use log::debug;

use crate::binio::{write_bytes, write_i32_le, write_u16_le, write_u32_le};
use crate::error::BmError;
use crate::grid::{BYTES_PER_PIXEL, PixelGrid};

/// Size of the file header plus `BITMAPINFOHEADER`.
pub const HEADER_SIZE: u32 = 54;
const INFO_HEADER_SIZE: u32 = 40;
const BITS_PER_PIXEL: u16 = 24;
const FILE_SIZE_OFFSET: u64 = 2;

/// Resolution written when none is configured.
pub const DEFAULT_DPI: u32 = 96;

/// Sizes derived from the image dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BmpGeometry {
    /// Padded row length in bytes (multiple of 4).
    pub row_stride: usize,
    /// `row_stride * height`.
    pub pixel_data_size: u32,
    /// `HEADER_SIZE + pixel_data_size`.
    pub file_size: u32,
}

impl BmpGeometry {
    /// Compute the padded layout, or `DimensionsTooLarge` if any header
    /// field would not fit.
    pub fn new(width: u32, height: u32) -> Result<Self, BmError> {
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(BmError::DimensionsTooLarge { width, height });
        }
        let row_stride = (width as usize)
            .checked_mul(BYTES_PER_PIXEL)
            .and_then(|r| r.checked_add(3))
            .map(|r| r & !3)
            .ok_or(BmError::DimensionsTooLarge { width, height })?;
        let pixel_data_size = row_stride
            .checked_mul(height as usize)
            .and_then(|s| u32::try_from(s).ok())
            .ok_or(BmError::DimensionsTooLarge { width, height })?;
        let file_size = pixel_data_size
            .checked_add(HEADER_SIZE)
            .ok_or(BmError::DimensionsTooLarge { width, height })?;
        Ok(Self {
            row_stride,
            pixel_data_size,
            file_size,
        })
    }

    /// Zero bytes appended to each row.
    pub fn padding(&self, width: u32) -> usize {
        self.row_stride - width as usize * BYTES_PER_PIXEL
    }
}

/// Pixels-per-meter for a DPI value: `round(dpi * 39.37)`.
///
/// Resolutions whose result does not fit the i32 header field are
/// `ResolutionOutOfRange`.
pub fn pixels_per_meter(dpi: u32) -> Result<i32, BmError> {
    let ppm = (f64::from(dpi) * 39.37).round() as i64;
    i32::try_from(ppm).map_err(|_| BmError::ResolutionOutOfRange { dpi })
}

/// Largest DPI whose pixels-per-meter value fits the header.
pub const MAX_DPI: u32 = 54_546_193;

/// Configurable 24-bit BMP encoder.
#[derive(Clone, Debug)]
pub struct BmpEncoder {
    dpi: u32,
}

impl Default for BmpEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BmpEncoder {
    pub fn new() -> Self {
        Self { dpi: DEFAULT_DPI }
    }

    /// Resolution written to both resolution fields.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Write `grid` as a complete BMP to `sink`. Returns the file size.
    ///
    /// On error the sink holds a partial file; discarding it is the
    /// caller's job.
    pub fn encode<W: Write + ?Sized>(
        &self,
        grid: &PixelGrid,
        sink: &mut W,
        stop: impl Stop,
    ) -> Result<u32, BmError> {
        self.encode_dyn(grid, sink, &stop)
    }

    pub(crate) fn encode_dyn<W: Write + ?Sized>(
        &self,
        grid: &PixelGrid,
        sink: &mut W,
        stop: &dyn Stop,
    ) -> Result<u32, BmError> {
        let width = grid.width();
        let height = grid.height();
        let geometry = BmpGeometry::new(width, height)?;
        let ppm = pixels_per_meter(self.dpi)?;
        debug!(
            "BMP {width}x{height}: stride {}, pixel data {}, file {}",
            geometry.row_stride, geometry.pixel_data_size, geometry.file_size
        );

        stop.check()?;
        write_header(sink, &geometry, width, height, ppm)?;

        if geometry.pixel_data_size > 0 {
            // Padding bytes stay zero; only the content prefix is rewritten.
            let rw = grid.row_width();
            let mut row_buf = vec![0u8; geometry.row_stride];
            for (n, row) in (0..height as usize).rev().enumerate() {
                if n % 16 == 0 {
                    stop.check()?;
                }
                row_buf[..rw].copy_from_slice(grid.row(row));
                write_bytes(sink, &row_buf)?;
            }
        }

        Ok(geometry.file_size)
    }

    /// Encode into a new buffer.
    pub fn encode_to_vec(&self, grid: &PixelGrid, stop: impl Stop) -> Result<Vec<u8>, BmError> {
        let geometry = BmpGeometry::new(grid.width(), grid.height())?;
        let mut out = Vec::with_capacity(geometry.file_size as usize);
        self.encode(grid, &mut out, stop)?;
        Ok(out)
    }
}

fn write_header<W: Write + ?Sized>(
    out: &mut W,
    geometry: &BmpGeometry,
    width: u32,
    height: u32,
    ppm: i32,
) -> Result<(), BmError> {
    // File header (14 bytes)
    write_bytes(out, b"BM")?;
    write_u32_le(out, geometry.file_size)?;
    write_u16_le(out, 0)?; // reserved
    write_u16_le(out, 0)?; // reserved
    write_u32_le(out, HEADER_SIZE)?; // data offset

    // DIB header (BITMAPINFOHEADER, 40 bytes)
    write_u32_le(out, INFO_HEADER_SIZE)?;
    write_i32_le(out, width as i32)?;
    write_i32_le(out, height as i32)?; // positive = bottom-up
    write_u16_le(out, 1)?; // planes
    write_u16_le(out, BITS_PER_PIXEL)?;
    write_u32_le(out, 0)?; // compression
    write_u32_le(out, geometry.pixel_data_size)?;
    write_i32_le(out, ppm)?; // h resolution
    write_i32_le(out, ppm)?; // v resolution
    write_u32_le(out, 0)?; // colors used
    write_u32_le(out, 0) // important colors
}

/// Overwrite the file-size field with the sink's measured length.
///
/// The BMP must start at offset 0 of `sink`. The stream position is
/// restored to the end afterwards. Returns the measured size.
pub fn patch_file_size<W: Write + Seek + ?Sized>(sink: &mut W) -> Result<u32, BmError> {
    let end = sink.seek(SeekFrom::End(0)).map_err(BmError::WriteFailure)?;
    let size = u32::try_from(end).map_err(|_| {
        BmError::WriteFailure(io::Error::other(format!(
            "BMP output of {end} bytes does not fit the file size field"
        )))
    })?;
    sink.seek(SeekFrom::Start(FILE_SIZE_OFFSET))
        .map_err(BmError::WriteFailure)?;
    write_u32_le(sink, size)?;
    sink.seek(SeekFrom::Start(end)).map_err(BmError::WriteFailure)?;
    debug!("patched BMP file size field to {size}");
    Ok(size)
}
