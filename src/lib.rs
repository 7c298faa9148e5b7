//! # Kundli OCR
//!
//! Reads photographed or scanned North-Indian (diamond) birth charts and
//! returns the ascendant sign and the house and sign of every planet.
//!
//! ## Features
//!
//! - Grayscale conversion, resolution normalisation, denoising and OTSU binarization
//! - Chart frame detection from external contours
//! - Grid-line suppression with line-element morphology
//! - Fixed diamond topology with twelve house centroids
//! - Three OCR passes per house with majority-vote consensus
//! - Devanagari and Latin sign numbers and planet abbreviations
//! - Ascendant deduction when house 1 is unreadable
//!
//! ## Modules
//!
//! * [`core`] - Error handling and configuration
//! * [`domain`] - Signs, planets, the house layout and analysis results
//! * [`pipeline`] - The chart reader and its stages
//! * [`processors`] - Image processing and OCR text parsing
//! * [`recognition`] - OCR engine interface and the Tesseract backend
//! * [`utils`] - Image loading, diagnostics overlay and logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kundli_ocr::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = ChartReader::builder()
//!     .scripts(vec![Script::Devanagari, Script::Latin])
//!     .build()?;
//!
//! match reader.analyze_path(Path::new("kundli.jpg"))? {
//!     AnalysisResult::Valid { ascendant_sign, placements, .. } => {
//!         println!("Lagna: {}", ascendant_sign);
//!         for p in placements {
//!             println!("{} in house {}", p.planet, p.house);
//!         }
//!     }
//!     other => println!("{:?}", other.errors()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Custom OCR engine
//!
//! Any type implementing [`recognition::TextRecognizer`] can replace
//! Tesseract. Engines that are not reentrant implement
//! [`recognition::RecognitionSession`] and are wrapped in a
//! [`recognition::SerializedRecognizer`].

pub mod core;
pub mod domain;
pub mod pipeline;
pub mod processors;
pub mod recognition;
pub mod utils;

/// Prelude module for convenient imports.
///
/// ```rust
/// use kundli_ocr::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{ChartError, ChartReaderConfig, ChartResult, PipelineStage};
    pub use crate::domain::{AnalysisResult, AscendantSource, Planet, PlanetPlacement, Sign};
    pub use crate::pipeline::{ChartReader, ChartReaderBuilder, PipelineTrace};
    pub use crate::recognition::{Script, TesseractRecognizer, TextRecognizer};
    pub use crate::utils::load_image;
}
