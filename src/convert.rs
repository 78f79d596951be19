//! BM + PAL → BMP conversion.
//!
//! [`transcode`] works on caller-owned streams. [`convert`] additionally
//! creates the `<name>.bmp` output file. Neither opens, rewinds or closes the
//! input streams.

use std::io::{self, BufWriter, Read, Seek, Write};
use std::path::{Path, PathBuf};

use enough::{Stop, Unstoppable};
use log::{debug, trace};
use tempfile::NamedTempFile;

use crate::bmp::{BmpEncoder, patch_file_size};
use crate::diagnostics::{Diagnostics, LogDiagnostics, Stage};
use crate::error::BmError;
use crate::limits::Limits;
use crate::raster::{self, BmLayout, DecodeOptions};

/// Longest output path, counting the `.bmp` suffix and a terminator byte.
pub const OUTPUT_FILENAME_MAX_LEN: usize = 256;

const BMP_EXTENSION: &str = ".bmp";

/// Options for [`transcode`] and [`convert_with`].
#[derive(Clone)]
pub struct ConvertOptions<'a> {
    pub decode: DecodeOptions,
    pub encoder: BmpEncoder,
    /// After writing, measure the output file and rewrite its size field.
    /// Only [`convert_with`] can seek its output, so [`transcode`] ignores this.
    pub patch_file_size: bool,
    pub diagnostics: &'a dyn Diagnostics,
}

impl Default for ConvertOptions<'_> {
    fn default() -> Self {
        Self {
            decode: DecodeOptions::default(),
            encoder: BmpEncoder::new(),
            patch_file_size: false,
            diagnostics: &LogDiagnostics,
        }
    }
}

impl<'a> ConvertOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: BmLayout) -> Self {
        self.decode.layout = layout;
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.decode.limits = Some(limits);
        self
    }

    pub fn with_palette_cache(mut self, cache: bool) -> Self {
        self.decode.cache_palette = cache;
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.encoder = self.encoder.with_dpi(dpi);
        self
    }

    pub fn with_file_size_patch(mut self, patch: bool) -> Self {
        self.patch_file_size = patch;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: &'a dyn Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

/// Decode `bm` against `palette` and write the BMP to `sink`.
///
/// Returns the BMP file size. On failure `sink` may hold a partial file.
pub fn transcode<B, P, W>(
    bm: &mut B,
    palette: &mut P,
    sink: &mut W,
    options: &ConvertOptions<'_>,
    stop: impl Stop,
) -> Result<u32, BmError>
where
    B: Read + ?Sized,
    P: Read + Seek + ?Sized,
    W: Write + ?Sized,
{
    let diag = options.diagnostics;
    let grid = report(
        diag,
        Stage::Decode,
        raster::decode(bm, palette, &options.decode, &stop),
    )?;
    report(
        diag,
        Stage::Encode,
        options.encoder.encode_dyn(&grid, sink, &stop),
    )
}

/// Convert with default options, writing `<output_name>.bmp`.
pub fn convert<B, P>(bm: &mut B, palette: &mut P, output_name: &str) -> Result<PathBuf, BmError>
where
    B: Read + ?Sized,
    P: Read + Seek + ?Sized,
{
    convert_with(bm, palette, output_name, &ConvertOptions::default(), Unstoppable)
}

/// Convert, writing `<output_name>.bmp`. Returns the path written.
///
/// `output_name` is validated before either input is read. The BMP is
/// written to a temporary file beside the destination and moved into place
/// only after every byte was written, so a failed conversion leaves no
/// output file behind (an existing file of the same name is untouched).
pub fn convert_with<B, P>(
    bm: &mut B,
    palette: &mut P,
    output_name: &str,
    options: &ConvertOptions<'_>,
    stop: impl Stop,
) -> Result<PathBuf, BmError>
where
    B: Read + ?Sized,
    P: Read + Seek + ?Sized,
{
    let diag = options.diagnostics;
    let path = report(diag, Stage::Destination, output_path(output_name))?;

    let grid = report(
        diag,
        Stage::Decode,
        raster::decode(bm, palette, &options.decode, &stop),
    )?;

    let dir = parent_dir_or_dot(&path);
    let mut tmp = report(
        diag,
        Stage::Destination,
        temp_file_in(dir).map_err(|e| {
            BmError::InvalidDestination(format!(
                "could not create file in {}: {e}",
                dir.display()
            ))
        }),
    )?;
    trace!("writing {} via {}", path.display(), tmp.path().display());

    let written = {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        let result = options
            .encoder
            .encode_dyn(&grid, &mut writer, &stop)
            .and_then(|size| {
                writer.flush().map_err(BmError::WriteFailure)?;
                Ok(size)
            });
        report(diag, Stage::Encode, result)?
    };
    drop(grid);

    let size = if options.patch_file_size {
        report(diag, Stage::Finalize, patch_file_size(tmp.as_file_mut()))?
    } else {
        written
    };

    report(
        diag,
        Stage::Finalize,
        tmp.persist(&path).map_err(|e| {
            BmError::InvalidDestination(format!(
                "could not create file {}: {}",
                path.display(),
                e.error
            ))
        }),
    )?;
    debug!("wrote {} ({size} bytes)", path.display());
    Ok(path)
}

/// Validate `output_name` and append the `.bmp` suffix.
pub fn output_path(output_name: &str) -> Result<PathBuf, BmError> {
    if output_name.is_empty() {
        return Err(BmError::InvalidDestination(
            "output filename is empty".into(),
        ));
    }
    if output_name.len() + BMP_EXTENSION.len() + 1 > OUTPUT_FILENAME_MAX_LEN {
        return Err(BmError::InvalidDestination(format!(
            "output filename is too long ({} bytes, at most {})",
            output_name.len(),
            OUTPUT_FILENAME_MAX_LEN - BMP_EXTENSION.len() - 1
        )));
    }
    Ok(PathBuf::from(format!("{output_name}{BMP_EXTENSION}")))
}

/// Temp file in `dir` created with the same mode `File::create` would use
/// (0o666 less the process umask), so the persisted output keeps it.
fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".bmtobmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

fn parent_dir_or_dot(path: &Path) -> &Path {
    // `Path::parent` is `Some("")` for bare file names.
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

fn report<T>(
    diag: &dyn Diagnostics,
    stage: Stage,
    result: Result<T, BmError>,
) -> Result<T, BmError> {
    result.inspect_err(|e| diag.failure(stage, e))
}
