//! BM raster decoder (internal).
//!
//! A BM stream is two little-endian u32 dimensions followed by one palette
//! index byte per pixel, row-major, top row first. Each index is resolved
//! against a PAL stream of RGB triples and stored channel-reversed (BGR).

mod decode;
mod palette;

pub use decode::{BmLayout, RasterHeader};
pub use palette::{PALETTE_ENTRIES, PALETTE_SIZE_IN_BYTES, PaletteEntry, PaletteReader};

use std::io::{Read, Seek};

use enough::Stop;
use log::debug;

use crate::error::BmError;
use crate::grid::{GridBuilder, PixelGrid};
use crate::limits::Limits;

/// Options for [`decode_raster_with`].
#[derive(Clone, Debug)]
pub struct DecodeOptions {
    pub layout: BmLayout,
    pub limits: Option<Limits>,
    /// Memoize palette entries after their first read.
    pub cache_palette: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            layout: BmLayout::Compact,
            limits: None,
            cache_palette: true,
        }
    }
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: BmLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn with_palette_cache(mut self, cache: bool) -> Self {
        self.cache_palette = cache;
        self
    }
}

/// Read only the BM header.
pub fn read_raster_header<R: Read + ?Sized>(
    bm: &mut R,
    layout: BmLayout,
) -> Result<RasterHeader, BmError> {
    decode::parse_header(bm, layout)
}

/// Decode a BM stream (compact layout) against a palette stream.
pub fn decode_raster<B, P>(bm: &mut B, palette: &mut P, stop: impl Stop) -> Result<PixelGrid, BmError>
where
    B: Read + ?Sized,
    P: Read + Seek + ?Sized,
{
    decode_raster_with(bm, palette, &DecodeOptions::default(), stop)
}

/// Decode a BM stream against a palette stream with explicit options.
///
/// Neither stream is rewound first: `bm` must be positioned at the header.
pub fn decode_raster_with<B, P>(
    bm: &mut B,
    palette: &mut P,
    options: &DecodeOptions,
    stop: impl Stop,
) -> Result<PixelGrid, BmError>
where
    B: Read + ?Sized,
    P: Read + Seek + ?Sized,
{
    decode(bm, palette, options, &stop)
}

pub(crate) fn decode<B, P>(
    bm: &mut B,
    palette: &mut P,
    options: &DecodeOptions,
    stop: &dyn Stop,
) -> Result<PixelGrid, BmError>
where
    B: Read + ?Sized,
    P: Read + Seek + ?Sized,
{
    let header = decode::parse_header(bm, options.layout)?;
    if let Some(limits) = &options.limits {
        limits.check_raster(header)?;
    }
    stop.check()?;

    let mut grid = GridBuilder::new(header.width, header.height)?;
    debug!(
        "reserved {}x{} grid ({} rows to decode)",
        header.width,
        header.height,
        grid.rows_remaining()
    );

    let mut palette = PaletteReader::new(palette, options.cache_palette);
    decode::decode_indices(bm, &mut palette, &mut grid, stop)?;
    Ok(grid.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use enough::Unstoppable;
    use std::io::Cursor;

    fn bm(width: u32, height: u32, indices: &[u8]) -> Cursor<Vec<u8>> {
        let mut data = Vec::new();
        data.extend_from_slice(&width.to_le_bytes());
        data.extend_from_slice(&height.to_le_bytes());
        data.extend_from_slice(indices);
        Cursor::new(data)
    }

    fn gray_palette() -> Cursor<Vec<u8>> {
        Cursor::new((0..PALETTE_ENTRIES).flat_map(|i| [i as u8; 3]).collect())
    }

    #[test]
    fn decodes_gray_ramp() {
        let grid = decode_raster(&mut bm(2, 1, &[5, 200]), &mut gray_palette(), Unstoppable)
            .unwrap();
        assert_eq!(grid.pixels(), &[5, 5, 5, 200, 200, 200]);
    }

    #[test]
    fn truncated_indices() {
        let err = decode_raster(&mut bm(2, 2, &[1, 2, 3]), &mut gray_palette(), Unstoppable)
            .unwrap_err();
        assert!(matches!(
            err,
            BmError::TruncatedInput {
                stream: crate::InputStream::Raster
            }
        ));
    }

    #[test]
    fn limits_checked_before_reading_indices() {
        let options = DecodeOptions::new().with_limits(Limits {
            max_pixels: Some(3),
            ..Default::default()
        });
        // No index bytes at all: the limit must trip first.
        let err = decode_raster_with(&mut bm(2, 2, &[]), &mut gray_palette(), &options, Unstoppable)
            .unwrap_err();
        assert!(matches!(err, BmError::LimitExceeded(_)));
    }

    #[test]
    fn reserved_layout() {
        let mut data = bm(1, 1, &[0, 0, 0, 0, 9]);
        let options = DecodeOptions::new().with_layout(BmLayout::Reserved);
        let grid = decode_raster_with(&mut data, &mut gray_palette(), &options, Unstoppable)
            .unwrap();
        assert_eq!(grid.pixels(), &[9, 9, 9]);
    }

    struct AlwaysStop;

    impl Stop for AlwaysStop {
        fn check(&self) -> Result<(), enough::StopReason> {
            Err(enough::StopReason::Cancelled)
        }
    }

    #[test]
    fn cancelled_before_allocation() {
        let err = decode_raster(&mut bm(1, 1, &[0]), &mut gray_palette(), AlwaysStop)
            .unwrap_err();
        assert!(matches!(err, BmError::Cancelled(_)));
    }
}
