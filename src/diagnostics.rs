//! Failure reporting hook for conversions.

use core::fmt;

use log::error;

use crate::error::BmError;

/// Conversion step at which a failure happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Validating or creating the output file.
    Destination,
    /// Reading the BM/PAL inputs.
    Decode,
    /// Writing BMP bytes.
    Encode,
    /// Patching the size field and moving the file into place.
    Finalize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Destination => "destination",
            Self::Decode => "decode",
            Self::Encode => "encode",
            Self::Finalize => "finalize",
        })
    }
}

/// Receives every failure before it is returned to the caller.
///
/// Reporting is observational only; it cannot change the outcome.
pub trait Diagnostics {
    fn failure(&self, stage: Stage, error: &BmError);
}

/// Forwards failures to the `log` facade at error level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn failure(&self, stage: Stage, error: &BmError) {
        match std::error::Error::source(error) {
            Some(source) => error!("[bmtobmp] {stage} failed: {error}: {source}"),
            None => error!("[bmtobmp] {stage} failed: {error}"),
        }
    }
}

/// Discards failures.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl Diagnostics for Silent {
    fn failure(&self, _stage: Stage, _error: &BmError) {}
}

impl<F: Fn(Stage, &BmError)> Diagnostics for F {
    fn failure(&self, stage: Stage, error: &BmError) {
        self(stage, error)
    }
}
