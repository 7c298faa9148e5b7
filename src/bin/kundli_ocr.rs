//! Command-line chart reader.
//!
//! Reads one or more chart images and prints one JSON analysis result per
//! image on stdout. Logs go to stderr and are controlled with `RUST_LOG`.
//!
//! # Usage
//!
//! ```bash
//! kundli-ocr [OPTIONS] <IMAGES>...
//! ```
//!
//! # Example
//!
//! ```bash
//! RUST_LOG=info kundli-ocr --psm 6 --overlay overlay.png --pretty chart.jpg
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use kundli_ocr::core::ChartReaderConfig;
use kundli_ocr::domain::AnalysisResult;
use kundli_ocr::pipeline::ChartReader;
use kundli_ocr::pipeline::result::decode_error;
use kundli_ocr::recognition::TesseractRecognizer;
use kundli_ocr::utils::{init_tracing, load_image, save_overlay};
use tracing::{error, info};

/// Command-line arguments
#[derive(Parser)]
#[command(name = "kundli-ocr")]
#[command(about = "Reads North-Indian birth chart images into ascendant and planet placements")]
struct Args {
    /// JSON configuration file; missing fields take their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the tesseract executable
    #[arg(long)]
    tesseract: Option<String>,

    /// Tesseract page segmentation mode
    #[arg(long)]
    psm: Option<u8>,

    /// Read the twelve houses concurrently
    #[arg(long)]
    parallel: bool,

    /// Write a diagnostics overlay; with several images an index is appended
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Chart images to read
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

fn load_config(args: &Args) -> Result<ChartReaderConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => ChartReaderConfig::from_json_file(path)?,
        None => ChartReaderConfig::default(),
    };
    if let Some(binary) = &args.tesseract {
        config.recognition.tesseract.binary = binary.clone();
    }
    if let Some(psm) = args.psm {
        config.recognition.tesseract.psm = psm;
    }
    if args.parallel {
        config = config.with_parallel_extraction(true);
    }
    Ok(config)
}

/// `overlay.png` for a single image, `overlay-2.png` for the second of many.
fn overlay_path(base: &Path, index: usize, total: usize) -> PathBuf {
    if total <= 1 {
        return base.to_path_buf();
    }
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "overlay".to_string());
    let ext = base
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_string());
    base.with_file_name(format!("{}-{}.{}", stem, index + 1, ext))
}

fn analyze(
    reader: &ChartReader,
    path: &Path,
    overlay: Option<PathBuf>,
) -> Result<AnalysisResult, Box<dyn std::error::Error>> {
    let Some(overlay) = overlay else {
        return Ok(reader.analyze_path(path)?);
    };

    let image = match load_image(path) {
        Ok(image) => image,
        Err(e) => return Ok(decode_error(&e)),
    };
    let (result, trace) = reader.analyze_image_with_trace(&image)?;
    if !trace.rois.is_empty() {
        save_overlay(&trace, &overlay)?;
        info!("overlay written to {}", overlay.display());
    }
    Ok(result)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args = Args::parse();
    let config = load_config(&args)?;

    let recognizer = TesseractRecognizer::new(config.recognition.tesseract.clone());
    match recognizer.missing_scripts(&config.recognition.scripts) {
        Ok(missing) if !missing.is_empty() => {
            error!("tesseract is missing language data for {:?}", missing)
        }
        Ok(_) => {}
        Err(e) => error!("tesseract is not usable: {}", e),
    }
    let reader = ChartReader::new(config, Arc::new(recognizer))?;
    info!("Processing {} images with {}", args.images.len(), reader.recognizer_name());

    let total = args.images.len();
    let mut failures = 0;
    for (index, path) in args.images.iter().enumerate() {
        let overlay = args
            .overlay
            .as_deref()
            .map(|base| overlay_path(base, index, total));
        let result = match analyze(&reader, path, overlay) {
            Ok(result) => result,
            Err(e) => {
                error!("{}: {}", path.display(), e);
                failures += 1;
                continue;
            }
        };
        if !result.is_valid() {
            info!("{}: {:?}", path.display(), result.errors());
        }

        let json = if args.pretty {
            serde_json::to_string_pretty(&result)?
        } else {
            serde_json::to_string(&result)?
        };
        println!("{}", json);
    }

    if failures > 0 {
        return Err(format!("{} of {} images failed", failures, total).into());
    }
    Ok(())
}
