//! Image and text processing used by the chart reader.
//!
//! # Modules
//!
//! * `binarize` - Grayscale scaling, Gaussian denoise and OTSU thresholding
//! * `frame` - Chart frame detection from external contours
//! * `morphology` - Line-element opening and grid-line suppression
//! * `region` - Pixel rectangles, ROI clamping and cropping
//! * `cell_text` - Sign and planet parsing of bilingual OCR text

pub mod binarize;
pub mod cell_text;
pub mod frame;
pub mod morphology;
pub mod region;

pub use binarize::{PreparedImage, ink_mask, otsu_binarize, prepare, upscale};
pub use cell_text::{CellReading, clean_ocr, parse_cell_text};
pub use frame::locate_frame;
pub use morphology::{GridSuppression, suppress_grid};
pub use region::{PixelRect, crop};
