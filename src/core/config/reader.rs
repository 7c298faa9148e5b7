//! Configuration for the chart reader.
//!
//! The defaults reproduce the calibration the reader was tuned on: 1000px
//! minimum working width, a 25% chart-frame area threshold, 25px grid kernels
//! and ROIs of `min(width, height) / 10`. These are resolution-dependent
//! constants; [`PreprocessConfig::max_width`] exists to keep very large inputs
//! inside the regime they were tuned for.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{ConfigError, ConfigValidator};
use crate::recognition::Script;

/// Image preparation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Images narrower than this are upscaled (cubic) to this width.
    #[serde(default = "PreprocessConfig::default_min_width")]
    pub min_width: u32,

    /// Images wider than this are downscaled to this width. `None` keeps
    /// large inputs at their native resolution.
    #[serde(default)]
    pub max_width: Option<u32>,

    /// Gaussian sigma used for denoising before OTSU binarization.
    /// 1.1 is the sigma a 5x5 kernel implies.
    #[serde(default = "PreprocessConfig::default_blur_sigma")]
    pub blur_sigma: f32,
}

impl PreprocessConfig {
    fn default_min_width() -> u32 {
        1000
    }

    fn default_blur_sigma() -> f32 {
        1.1
    }
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            min_width: Self::default_min_width(),
            max_width: None,
            blur_sigma: Self::default_blur_sigma(),
        }
    }
}

impl ConfigValidator for PreprocessConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_at_least("preprocess.min_width", self.min_width, 1)?;
        if let Some(max_width) = self.max_width {
            self.validate_at_least("preprocess.max_width", max_width, self.min_width)?;
        }
        self.validate_finite_at_least("preprocess.blur_sigma", self.blur_sigma, 0.0)
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Chart frame detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Minimum share of the image a contour's bounding box must cover to be
    /// considered the chart frame.
    #[serde(default = "LocatorConfig::default_min_area_fraction")]
    pub min_area_fraction: f32,
}

impl LocatorConfig {
    fn default_min_area_fraction() -> f32 {
        0.25
    }
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            min_area_fraction: Self::default_min_area_fraction(),
        }
    }
}

impl ConfigValidator for LocatorConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_fraction("locator.min_area_fraction", self.min_area_fraction)
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Grid-line suppression settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Length of the horizontal and vertical line elements. Runs shorter than
    /// this survive suppression; it must exceed glyph stroke length and stay
    /// below ruled-line length.
    #[serde(default = "GridConfig::default_kernel_length")]
    pub kernel_length: u32,
}

impl GridConfig {
    fn default_kernel_length() -> u32 {
        25
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            kernel_length: Self::default_kernel_length(),
        }
    }
}

impl ConfigValidator for GridConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_at_least("grid.kernel_length", self.kernel_length, 2)
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Per-house extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// ROI half-size is `min(width, height) / roi_divisor`.
    #[serde(default = "ExtractionConfig::default_roi_divisor")]
    pub roi_divisor: u32,

    /// Scale applied to the grayscale ROI before the third OCR pass.
    #[serde(default = "ExtractionConfig::default_upscale_factor")]
    pub upscale_factor: f32,

    /// Read the twelve houses concurrently. Results are still applied in
    /// house order.
    #[serde(default)]
    pub parallel: bool,
}

impl ExtractionConfig {
    fn default_roi_divisor() -> u32 {
        10
    }

    fn default_upscale_factor() -> f32 {
        2.0
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            roi_divisor: Self::default_roi_divisor(),
            upscale_factor: Self::default_upscale_factor(),
            parallel: false,
        }
    }
}

impl ConfigValidator for ExtractionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_at_least("extraction.roi_divisor", self.roi_divisor, 2)?;
        self.validate_finite_at_least("extraction.upscale_factor", self.upscale_factor, 1.0)
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Settings for the bundled Tesseract command-line engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TesseractConfig {
    /// Executable to invoke.
    #[serde(default = "TesseractConfig::default_binary")]
    pub binary: String,

    /// OCR engine mode (`--oem`).
    #[serde(default = "TesseractConfig::default_oem")]
    pub oem: u8,

    /// Page segmentation mode (`--psm`).
    #[serde(default = "TesseractConfig::default_psm")]
    pub psm: u8,
}

impl TesseractConfig {
    fn default_binary() -> String {
        "tesseract".to_string()
    }

    fn default_oem() -> u8 {
        3
    }

    fn default_psm() -> u8 {
        6
    }
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            binary: Self::default_binary(),
            oem: Self::default_oem(),
            psm: Self::default_psm(),
        }
    }
}

/// Recognition settings shared by every engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionConfig {
    /// Scripts the engine must recognise, in priority order.
    #[serde(default = "RecognitionConfig::default_scripts")]
    pub scripts: Vec<Script>,

    #[serde(default)]
    pub tesseract: TesseractConfig,
}

impl RecognitionConfig {
    fn default_scripts() -> Vec<Script> {
        vec![Script::Devanagari, Script::Latin]
    }
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            scripts: Self::default_scripts(),
            tesseract: TesseractConfig::default(),
        }
    }
}

impl ConfigValidator for RecognitionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.scripts.is_empty() {
            return Err(ConfigError::InvalidConfig {
                message: "recognition.scripts must name at least one script".to_string(),
            });
        }
        for (i, script) in self.scripts.iter().enumerate() {
            if self.scripts[..i].contains(script) {
                return Err(ConfigError::InvalidConfig {
                    message: format!("recognition.scripts lists {:?} twice", script),
                });
            }
        }
        if self.tesseract.binary.trim().is_empty() {
            return Err(ConfigError::InvalidConfig {
                message: "recognition.tesseract.binary must not be empty".to_string(),
            });
        }
        if self.tesseract.psm > 13 {
            return Err(ConfigError::OutOfRange {
                field: "recognition.tesseract.psm",
                message: format!("expected 0..=13, got {}", self.tesseract.psm),
            });
        }
        if self.tesseract.oem > 3 {
            return Err(ConfigError::OutOfRange {
                field: "recognition.tesseract.oem",
                message: format!("expected 0..=3, got {}", self.tesseract.oem),
            });
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Complete configuration of a [`crate::pipeline::ChartReader`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartReaderConfig {
    #[serde(default)]
    pub preprocess: PreprocessConfig,
    #[serde(default)]
    pub locator: LocatorConfig,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub recognition: RecognitionConfig,
}

impl ChartReaderConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from a JSON file. Missing fields take their
    /// defaults. The result is validated before it is returned.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Set the minimum working width.
    pub fn with_min_width(mut self, min_width: u32) -> Self {
        self.preprocess.min_width = min_width;
        self
    }

    /// Set the maximum working width.
    pub fn with_max_width(mut self, max_width: Option<u32>) -> Self {
        self.preprocess.max_width = max_width;
        self
    }

    /// Set the chart frame area threshold.
    pub fn with_min_area_fraction(mut self, fraction: f32) -> Self {
        self.locator.min_area_fraction = fraction;
        self
    }

    /// Set the grid-line element length.
    pub fn with_grid_kernel_length(mut self, length: u32) -> Self {
        self.grid.kernel_length = length;
        self
    }

    /// Set the ROI half-size divisor.
    pub fn with_roi_divisor(mut self, divisor: u32) -> Self {
        self.extraction.roi_divisor = divisor;
        self
    }

    /// Enable or disable concurrent house extraction.
    pub fn with_parallel_extraction(mut self, parallel: bool) -> Self {
        self.extraction.parallel = parallel;
        self
    }

    /// Set the scripts to recognise.
    pub fn with_scripts(mut self, scripts: Vec<Script>) -> Self {
        self.recognition.scripts = scripts;
        self
    }
}

impl ConfigValidator for ChartReaderConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.preprocess.validate()?;
        self.locator.validate()?;
        self.grid.validate()?;
        self.extraction.validate()?;
        self.recognition.validate()
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}
