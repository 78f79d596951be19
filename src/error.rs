use std::io;

use enough::StopReason;

/// Which input stream a read came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputStream {
    /// The BM raster (dimensions + index bytes).
    Raster,
    /// The PAL palette (RGB triples).
    Palette,
}

impl core::fmt::Display for InputStream {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Raster => "BM",
            Self::Palette => "PAL",
        })
    }
}

/// Errors from BM decoding, BMP encoding and conversion.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BmError {
    #[error("unexpected end of {stream} input")]
    TruncatedInput { stream: InputStream },

    #[error("failed to read {stream} input")]
    Read {
        stream: InputStream,
        #[source]
        source: io::Error,
    },

    #[error("unable to allocate pixel grid of {width}x{height}")]
    AllocationFailure { width: u32, height: u32 },

    #[error("failed to write BMP output")]
    WriteFailure(#[source] io::Error),

    #[error("invalid destination: {0}")]
    InvalidDestination(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("resolution of {dpi} dpi does not fit the BMP header")]
    ResolutionOutOfRange { dpi: u32 },

    #[error("pixel buffer size mismatch: need {needed} bytes, got {actual}")]
    BufferSizeMismatch { needed: usize, actual: usize },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl BmError {
    /// Map a failed read on `stream`. End of input becomes `TruncatedInput`.
    pub(crate) fn from_read(stream: InputStream, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            BmError::TruncatedInput { stream }
        } else {
            BmError::Read {
                stream,
                source: err,
            }
        }
    }
}

impl From<StopReason> for BmError {
    fn from(r: StopReason) -> Self {
        BmError::Cancelled(r)
    }
}
