use crate::error::BmError;
use crate::grid::BYTES_PER_PIXEL;
use crate::raster::RasterHeader;

/// Resource limits applied to a BM header before its grid is allocated.
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes for the pixel grid.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    pub(crate) fn check_raster(&self, header: RasterHeader) -> Result<(), BmError> {
        let RasterHeader { width, height } = header;
        check("width", u64::from(width), self.max_width)?;
        check("height", u64::from(height), self.max_height)?;
        let pixels = u64::from(width) * u64::from(height);
        check("pixel count", pixels, self.max_pixels)?;
        let bytes = pixels.saturating_mul(BYTES_PER_PIXEL as u64);
        check("grid allocation of bytes", bytes, self.max_memory_bytes)
    }
}

fn check(what: &str, value: u64, limit: Option<u64>) -> Result<(), BmError> {
    match limit {
        Some(max) if value > max => Err(BmError::LimitExceeded(format!(
            "{what} {value} exceeds limit {max}"
        ))),
        _ => Ok(()),
    }
}
