//! # bmtobmp
//!
//! Transcoder from palette-indexed BM rasters to uncompressed 24-bit BMP.
//!
//! ## Formats
//!
//! - **BM**: `[width u32 LE][height u32 LE][width*height index bytes]`, top
//!   row first. A second revision with 4 reserved bytes before the indices is
//!   supported through [`BmLayout::Reserved`].
//! - **PAL**: flat RGB triples, one per index value (768 bytes for a full
//!   palette). Entries are looked up by seeking, so a short palette only fails
//!   when a missing entry is referenced.
//! - **BMP**: 14-byte file header, 40-byte `BITMAPINFOHEADER`, bottom-up BGR
//!   rows padded to a multiple of 4 bytes.
//!
//! ## Non-Goals
//!
//! - Compressed BMP output
//! - Palettes with alpha
//! - Streaming/incremental decode
//!
//! ## Usage
//!
//! ```no_run
//! use std::fs::File;
//!
//! let mut bm = File::open("image.BM")?;
//! let mut pal = File::open("image.PAL")?;
//! let path = bmtobmp::convert(&mut bm, &mut pal, "output")?;
//! println!("wrote {}", path.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! In-memory, with explicit options:
//!
//! ```
//! use std::io::Cursor;
//! use bmtobmp::{ConvertOptions, Unstoppable};
//!
//! let mut bm = Cursor::new([1u8, 0, 0, 0, 1, 0, 0, 0, 0]);
//! let mut pal = Cursor::new([255u8, 0, 0]);
//! let mut out = Vec::new();
//! let size = bmtobmp::transcode(&mut bm, &mut pal, &mut out, &ConvertOptions::new(), Unstoppable)?;
//! assert_eq!(size, 58);
//! assert_eq!(&out[54..], &[0, 0, 255, 0]);
//! # Ok::<(), bmtobmp::BmError>(())
//! ```

#![forbid(unsafe_code)]

pub mod binio;
pub mod bmp;
mod convert;
mod diagnostics;
mod error;
mod grid;
mod limits;
pub mod raster;

// Re-exports
pub use bmp::{BmpEncoder, BmpGeometry, encode_bmp, encode_bmp_to_vec, patch_file_size};
pub use convert::{
    ConvertOptions, OUTPUT_FILENAME_MAX_LEN, convert, convert_with, output_path, transcode,
};
pub use diagnostics::{Diagnostics, LogDiagnostics, Silent, Stage};
pub use enough::{Stop, StopReason, Unstoppable};
pub use error::{BmError, InputStream};
pub use grid::PixelGrid;
pub use limits::Limits;
pub use raster::{
    BmLayout, DecodeOptions, PaletteEntry, RasterHeader, decode_raster, decode_raster_with,
    read_raster_header,
};
