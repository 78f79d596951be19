use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;

use bmtobmp::bmp::{DEFAULT_DPI, MAX_DPI};
use bmtobmp::{BmLayout, ConvertOptions, Unstoppable};

/// Converts a palette-indexed BM image and its PAL palette to a 24-bit BMP
#[derive(Parser)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
    /// Indexed image (.BM)
    bm_file: PathBuf,
    /// Palette (.PAL)
    pal_file: PathBuf,
    /// Output base name, ".bmp" is appended
    #[clap(short, long, default_value = "output")]
    output: String,
    #[clap(long, default_value_t = false)]
    /// BM header has 4 reserved bytes before the pixel indices
    reserved_header: bool,
    /// Resolution stored in the BMP header
    #[clap(
        long,
        default_value_t = DEFAULT_DPI,
        value_parser = clap::value_parser!(u32).range(..=i64::from(MAX_DPI))
    )]
    dpi: u32,
    #[clap(long, default_value_t = false)]
    /// Rewrite the size field from the measured output length
    patch_size: bool,
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == ext || e == ext.to_ascii_uppercase())
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file =
        File::open(path).with_context(|| format!("unable to open file, {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn main() -> Result<ExitCode> {
    let args = Cli::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    if !has_extension(&args.bm_file, "bm") {
        bail!("{} is not a BM file", args.bm_file.display());
    }
    if !has_extension(&args.pal_file, "pal") {
        bail!("{} is not a PAL file", args.pal_file.display());
    }

    let mut bm = open(&args.bm_file)?;
    let mut pal = open(&args.pal_file)?;

    let layout = if args.reserved_header {
        BmLayout::Reserved
    } else {
        BmLayout::Compact
    };
    let options = ConvertOptions::new()
        .with_layout(layout)
        .with_dpi(args.dpi)
        .with_file_size_patch(args.patch_size);

    println!("Converting image, {}.", args.bm_file.display());
    // Failures are already reported through the log by the conversion.
    match bmtobmp::convert_with(&mut bm, &mut pal, &args.output, &options, Unstoppable) {
        Ok(_) => {
            println!("Done!");
            Ok(ExitCode::SUCCESS)
        }
        Err(_) => Ok(ExitCode::FAILURE),
    }
}
