//! BM header parsing and index resolution.

use std::io::{Read, Seek};

use enough::Stop;
use log::trace;

use super::palette::PaletteReader;
use crate::binio::{read_exact_bytes, read_fixed_bytes, read_u32_le};
use crate::error::{BmError, InputStream};
use crate::grid::GridBuilder;

/// Where index bytes start in a BM stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BmLayout {
    /// `[width u32][height u32][indices...]`, indices at offset 8.
    #[default]
    Compact,
    /// `[width u32][height u32][reserved u32][indices...]`, indices at offset 12.
    Reserved,
}

impl BmLayout {
    /// Byte offset of the first index byte.
    pub fn data_offset(self) -> u64 {
        match self {
            Self::Compact => 8,
            Self::Reserved => 12,
        }
    }
}

/// Dimensions read from the start of a BM stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RasterHeader {
    pub width: u32,
    pub height: u32,
}

/// Read the BM header, leaving `bm` positioned at the first index byte.
pub(crate) fn parse_header<R: Read + ?Sized>(
    bm: &mut R,
    layout: BmLayout,
) -> Result<RasterHeader, BmError> {
    let width = read_u32_le(bm, InputStream::Raster)?;
    let height = read_u32_le(bm, InputStream::Raster)?;
    if layout == BmLayout::Reserved {
        read_fixed_bytes::<4, R>(bm, InputStream::Raster)?;
    }
    trace!("BM header: {width}x{height}, layout {layout:?}");
    Ok(RasterHeader { width, height })
}

/// Resolve every index byte of `bm` through `palette` into `grid`.
///
/// Index bytes are consumed sequentially, one row at a time, top row first.
/// The grid only grows once a row's indices have been read.
pub(crate) fn decode_indices<B, P>(
    bm: &mut B,
    palette: &mut PaletteReader<'_, P>,
    grid: &mut GridBuilder,
    stop: &dyn Stop,
) -> Result<(), BmError>
where
    B: Read + ?Sized,
    P: Read + Seek + ?Sized,
{
    let rows = grid.rows_remaining();
    if rows == 0 {
        return Ok(());
    }

    let mut indices = vec![0u8; grid.width() as usize];
    for y in 0..rows {
        if y % 16 == 0 {
            stop.check()?;
        }
        read_exact_bytes(bm, &mut indices, InputStream::Raster)?;
        for &index in &indices {
            grid.push(palette.lookup(index)?.to_bgr());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use enough::Unstoppable;
    use std::io::Cursor;

    #[test]
    fn compact_header() {
        let mut bm = Cursor::new([3u8, 0, 0, 0, 2, 0, 0, 0, 9]);
        let header = parse_header(&mut bm, BmLayout::Compact).unwrap();
        assert_eq!(header, RasterHeader { width: 3, height: 2 });
        assert_eq!(bm.position(), BmLayout::Compact.data_offset());
    }

    #[test]
    fn reserved_header_skips_four_bytes() {
        let mut bm = Cursor::new([1u8, 0, 0, 0, 1, 0, 0, 0, 0xaa, 0xbb, 0xcc, 0xdd, 5]);
        let header = parse_header(&mut bm, BmLayout::Reserved).unwrap();
        assert_eq!(header, RasterHeader { width: 1, height: 1 });
        assert_eq!(bm.position(), 12);
    }

    #[test]
    fn short_header_is_truncated() {
        let mut bm = Cursor::new([1u8, 0, 0, 0, 1, 0]);
        assert!(matches!(
            parse_header(&mut bm, BmLayout::Compact),
            Err(BmError::TruncatedInput {
                stream: InputStream::Raster
            })
        ));
    }

    #[test]
    fn indices_resolve_in_row_order() {
        let mut pal = Cursor::new(vec![
            10u8, 20, 30, // 0
            40, 50, 60, // 1
        ]);
        let mut palette = PaletteReader::new(&mut pal, true);
        let mut builder = GridBuilder::new(2, 2).unwrap();
        let mut bm = Cursor::new([0u8, 1, 1, 0]);
        decode_indices(&mut bm, &mut palette, &mut builder, &Unstoppable).unwrap();
        let grid = builder.finish();
        assert_eq!(grid.row(0), &[30, 20, 10, 60, 50, 40]);
        assert_eq!(grid.row(1), &[60, 50, 40, 30, 20, 10]);
    }

    #[test]
    fn zero_width_reads_no_indices() {
        let mut pal = Cursor::new(Vec::<u8>::new());
        let mut palette = PaletteReader::new(&mut pal, true);
        let mut builder = GridBuilder::new(0, 4).unwrap();
        let mut bm = Cursor::new(Vec::<u8>::new());
        decode_indices(&mut bm, &mut palette, &mut builder, &Unstoppable).unwrap();
        assert_eq!(bm.position(), 0);
    }

    #[test]
    fn missing_rows_fail_before_grid_grows() {
        let mut pal = Cursor::new(vec![0u8; 768]);
        let mut palette = PaletteReader::new(&mut pal, true);
        let mut builder = GridBuilder::new(4096, 4096).unwrap();
        let mut bm = Cursor::new(vec![0u8; 4096 + 10]);
        let err = decode_indices(&mut bm, &mut palette, &mut builder, &Unstoppable).unwrap_err();
        assert!(matches!(
            err,
            BmError::TruncatedInput {
                stream: InputStream::Raster
            }
        ));
        // Only the one complete row was stored.
        assert_eq!(builder.filled(), 4096 * 3);
        assert_eq!(builder.rows_remaining(), 4095);
    }
}
