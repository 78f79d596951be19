use crate::error::BmError;

/// Bytes per grid cell (B, G, R).
pub const BYTES_PER_PIXEL: usize = 3;

/// Decoded image: one contiguous BGR buffer, `height` rows of `width` cells.
///
/// Row 0 is the first row of the BM index stream (the top of the image).
/// Cell `(x, y)` channel `c` lives at `y * row_width() + x * 3 + c`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelGrid {
    /// Wrap an existing BGR buffer (top row first, no row padding).
    ///
    /// Returns [`BmError::AllocationFailure`] if `width * height * 3` overflows,
    /// and [`BmError::BufferSizeMismatch`] if `pixels` has the wrong length.
    pub fn from_bgr(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, BmError> {
        let len = grid_len(width, height).ok_or(BmError::AllocationFailure { width, height })?;
        if pixels.len() != len {
            return Err(BmError::BufferSizeMismatch {
                needed: len,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Access the pixel data (BGR, top row first).
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Unpadded row length in bytes.
    pub fn row_width(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Row `y`, counted from the top.
    pub fn row(&self, y: usize) -> &[u8] {
        let rw = self.row_width();
        &self.pixels[y * rw..(y + 1) * rw]
    }

    /// BGR bytes of the cell at column `x`, row `y` (from the top).
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let off = y * self.row_width() + x * BYTES_PER_PIXEL;
        [self.pixels[off], self.pixels[off + 1], self.pixels[off + 2]]
    }

    /// Reinterpret the grid as typed BGR pixels.
    #[cfg(feature = "rgb")]
    pub fn as_bgr(&self) -> &[rgb::Bgr<u8>] {
        use rgb::FromSlice as _;
        self.pixels[..].as_bgr()
    }

    /// Zero-copy view as an [`imgref::ImgRef`] of BGR pixels.
    #[cfg(feature = "imgref")]
    pub fn as_imgref(&self) -> imgref::ImgRef<'_, rgb::Bgr<u8>> {
        imgref::ImgRef::new(self.as_bgr(), self.width as usize, self.height as usize)
    }
}

/// A [`PixelGrid`] under construction, filled one row at a time.
///
/// The whole buffer is reserved up front but only written as rows arrive,
/// so a header claiming huge dimensions costs no resident memory until its
/// index bytes are actually present.
pub(crate) struct GridBuilder {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl GridBuilder {
    /// Reserve room for a `width` x `height` grid. Size overflow or
    /// allocator refusal is `AllocationFailure`.
    pub(crate) fn new(width: u32, height: u32) -> Result<Self, BmError> {
        let len = grid_len(width, height).ok_or(BmError::AllocationFailure { width, height })?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| BmError::AllocationFailure { width, height })?;
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    pub(crate) fn width(&self) -> u32 {
        self.width
    }

    /// Rows still missing.
    pub(crate) fn rows_remaining(&self) -> usize {
        let rw = self.width as usize * BYTES_PER_PIXEL;
        if rw == 0 {
            return 0;
        }
        self.height as usize - self.pixels.len() / rw
    }

    #[cfg(test)]
    pub(crate) fn filled(&self) -> usize {
        self.pixels.len()
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.pixels.capacity()
    }

    /// Append one cell to the current row.
    pub(crate) fn push(&mut self, bgr: [u8; 3]) {
        self.pixels.extend_from_slice(&bgr);
    }

    /// Finish the grid. Every row must have been pushed.
    pub(crate) fn finish(self) -> PixelGrid {
        debug_assert_eq!(self.rows_remaining(), 0);
        PixelGrid {
            pixels: self.pixels,
            width: self.width,
            height: self.height,
        }
    }
}

fn grid_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(BYTES_PER_PIXEL)
        .and_then(|rw| rw.checked_mul(height as usize))
}
