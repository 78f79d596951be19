//! PAL palette lookup.
//!
//! A PAL file is a flat array of RGB triples, one per index value. Entries
//! are fetched by seeking to `index * 3`; nothing is read ahead, so a palette
//! shorter than 768 bytes only fails when an out-of-range index is used.

use std::io::{Read, Seek, SeekFrom};

use log::debug;

use crate::binio::read_fixed_bytes;
use crate::error::{BmError, InputStream};

/// Number of addressable palette entries (one-byte index space).
pub const PALETTE_ENTRIES: usize = 256;

/// Size in bytes of a complete palette.
pub const PALETTE_SIZE_IN_BYTES: usize = PALETTE_ENTRIES * 3;

/// One palette color, as stored in the PAL stream (red, green, blue).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PaletteEntry {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl PaletteEntry {
    /// Channel-reversed bytes, as BMP stores them.
    pub fn to_bgr(self) -> [u8; 3] {
        [self.blue, self.green, self.red]
    }
}

/// Random-access reader over a borrowed palette stream.
///
/// With caching on, each index is read from the stream at most once.
/// Results and failure points are identical either way.
pub struct PaletteReader<'a, R: ?Sized> {
    source: &'a mut R,
    cache: Option<Box<[Option<PaletteEntry>; PALETTE_ENTRIES]>>,
    reads: u64,
}

impl<'a, R: Read + Seek + ?Sized> PaletteReader<'a, R> {
    pub fn new(source: &'a mut R, cache: bool) -> Self {
        Self {
            source,
            cache: cache.then(|| Box::new([None; PALETTE_ENTRIES])),
            reads: 0,
        }
    }

    /// Resolve `index` to its palette color.
    pub fn lookup(&mut self, index: u8) -> Result<PaletteEntry, BmError> {
        if let Some(entry) = self.cache.as_ref().and_then(|c| c[index as usize]) {
            return Ok(entry);
        }

        self.source
            .seek(SeekFrom::Start(u64::from(index) * 3))
            .map_err(|e| BmError::from_read(InputStream::Palette, e))?;
        let [red, green, blue] = read_fixed_bytes::<3, R>(self.source, InputStream::Palette)?;
        self.reads += 1;

        let entry = PaletteEntry { red, green, blue };
        if let Some(cache) = self.cache.as_mut() {
            cache[index as usize] = Some(entry);
        }
        Ok(entry)
    }

    /// Number of entries actually read from the stream so far.
    pub fn stream_reads(&self) -> u64 {
        self.reads
    }
}

impl<R: ?Sized> Drop for PaletteReader<'_, R> {
    fn drop(&mut self) {
        debug!("palette: {} stream reads", self.reads);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ramp_palette() -> Vec<u8> {
        (0..PALETTE_ENTRIES)
            .flat_map(|i| [i as u8, (i as u8).wrapping_add(1), (i as u8).wrapping_add(2)])
            .collect()
    }

    #[test]
    fn lookup_reads_rgb_at_index_times_three() {
        let mut pal = Cursor::new(ramp_palette());
        let mut reader = PaletteReader::new(&mut pal, false);
        assert_eq!(
            reader.lookup(10).unwrap(),
            PaletteEntry {
                red: 10,
                green: 11,
                blue: 12
            }
        );
        assert_eq!(reader.lookup(255).unwrap().to_bgr(), [1, 0, 255]);
    }

    #[test]
    fn cache_avoids_repeated_reads() {
        let mut pal = Cursor::new(ramp_palette());
        let mut reader = PaletteReader::new(&mut pal, true);
        for _ in 0..5 {
            reader.lookup(7).unwrap();
        }
        reader.lookup(8).unwrap();
        assert_eq!(reader.stream_reads(), 2);
    }

    #[test]
    fn uncached_rereads_every_lookup() {
        let mut pal = Cursor::new(ramp_palette());
        let mut reader = PaletteReader::new(&mut pal, false);
        for _ in 0..5 {
            reader.lookup(7).unwrap();
        }
        assert_eq!(reader.stream_reads(), 5);
    }

    #[test]
    fn short_palette_fails_only_at_missing_entry() {
        // Two complete entries and one partial.
        let mut pal = Cursor::new(vec![1u8, 2, 3, 4, 5, 6, 7]);
        let mut reader = PaletteReader::new(&mut pal, true);
        assert!(reader.lookup(1).is_ok());
        let err = reader.lookup(2).unwrap_err();
        assert!(matches!(
            err,
            BmError::TruncatedInput {
                stream: InputStream::Palette
            }
        ));
        // A failed lookup is not cached as black.
        assert!(reader.lookup(2).is_err());
    }
}
