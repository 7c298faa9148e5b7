//! The chart reader: runs every stage over one image.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use image::{DynamicImage, GrayImage};
use tracing::{debug, info, warn};

use super::result::{assemble, decode_error};
use super::stages::{
    ExtractionStage, LocateStage, PreprocessStage, StageMetrics, SuppressStage, ValidationStage,
};
use crate::core::config::{ChartReaderConfig, ConfigValidator};
use crate::core::{ChartResult, PipelineStage};
use crate::domain::{AnalysisResult, HouseCell, HouseTopology};
use crate::processors::PixelRect;
use crate::recognition::{Script, TesseractRecognizer, TextRecognizer};
use crate::utils::{load_image, load_image_from_memory};

/// Intermediate geometry and timings of one analysis.
#[derive(Debug, Clone, Default)]
pub struct PipelineTrace {
    /// Chart frame in working-resolution coordinates, if one was found.
    pub frame: Option<PixelRect>,
    /// Size of the preprocessed image before cropping.
    pub working_size: (u32, u32),
    /// OCR region of every house, relative to the cropped chart.
    pub rois: Vec<(u8, PixelRect)>,
    pub stages: Vec<StageMetrics>,
    /// Cropped grayscale chart the ROIs refer to.
    pub chart_gray: GrayImage,
}

impl PipelineTrace {
    /// Wall-clock time of `stage`, if it ran.
    pub fn stage_time(&self, stage: PipelineStage) -> Option<std::time::Duration> {
        self.stages
            .iter()
            .find(|m| m.stage.0 == stage)
            .and_then(|m| m.processing_time)
    }
}

/// Reads North-Indian diamond charts.
///
/// A reader is immutable once built and can be shared between threads; every
/// call owns its own image buffers and house cells.
///
/// # Example
///
/// ```rust,no_run
/// use kundli_ocr::prelude::*;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let reader = ChartReader::with_tesseract(ChartReaderConfig::default())?;
/// let result = reader.analyze_path(Path::new("chart.png"))?;
/// println!("{}", serde_json::to_string_pretty(&result)?);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ChartReader {
    config: ChartReaderConfig,
    recognizer: Arc<dyn TextRecognizer>,
}

impl std::fmt::Debug for ChartReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartReader")
            .field("config", &self.config)
            .field("recognizer", &self.recognizer.name())
            .finish()
    }
}

impl ChartReader {
    /// Creates a reader after validating `config`.
    pub fn new(
        config: ChartReaderConfig,
        recognizer: Arc<dyn TextRecognizer>,
    ) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self { config, recognizer })
    }

    /// Creates a reader backed by the `tesseract` executable named in the
    /// configuration.
    ///
    /// Missing language data is logged but not fatal, since Tesseract may
    /// still read digits with the remaining languages.
    pub fn with_tesseract(config: ChartReaderConfig) -> ChartResult<Self> {
        let recognizer = TesseractRecognizer::new(config.recognition.tesseract.clone());
        match recognizer.missing_scripts(&config.recognition.scripts) {
            Ok(missing) if !missing.is_empty() => {
                warn!("tesseract has no traineddata for {:?}", missing)
            }
            Ok(_) => {}
            Err(e) => warn!("could not list tesseract languages: {}", e),
        }
        Self::new(config, Arc::new(recognizer))
    }

    pub fn builder() -> ChartReaderBuilder {
        ChartReaderBuilder::new()
    }

    pub fn config(&self) -> &ChartReaderConfig {
        &self.config
    }

    pub fn recognizer_name(&self) -> &str {
        self.recognizer.name()
    }

    /// Analyses an already decoded image.
    ///
    /// An image without pixels yields [`AnalysisResult::DecodeError`]. Failures
    /// of any later stage are returned as errors.
    pub fn analyze_image(&self, image: &DynamicImage) -> ChartResult<AnalysisResult> {
        self.analyze_image_with_trace(image).map(|(result, _)| result)
    }

    /// Decodes an encoded image held in memory and analyses it.
    pub fn analyze_bytes(&self, bytes: &[u8]) -> ChartResult<AnalysisResult> {
        match load_image_from_memory(bytes) {
            Ok(image) => self.analyze_image(&image),
            Err(e) => {
                warn!("failed to decode {} bytes: {}", bytes.len(), e);
                Ok(decode_error(&e))
            }
        }
    }

    /// Loads an image file and analyses it.
    pub fn analyze_path(&self, path: &Path) -> ChartResult<AnalysisResult> {
        match load_image(path) {
            Ok(image) => self.analyze_image(&image),
            Err(e) => {
                warn!("failed to load {}: {}", path.display(), e);
                Ok(decode_error(&e))
            }
        }
    }

    /// Like [`ChartReader::analyze_image`], also returning the intermediate
    /// geometry and per-stage metrics.
    pub fn analyze_image_with_trace(
        &self,
        image: &DynamicImage,
    ) -> ChartResult<(AnalysisResult, PipelineTrace)> {
        let start = Instant::now();
        let mut trace = PipelineTrace::default();

        let prepared = match PreprocessStage::new(&self.config.preprocess).process(image) {
            Ok(prepared) => prepared,
            Err(e) if e.stage() == Some(PipelineStage::Decode) => {
                warn!("decode failed: {}", e);
                return Ok((decode_error(&e), trace));
            }
            Err(e) => return Err(e),
        };
        let mut chart = prepared.data;
        trace.working_size = (chart.width(), chart.height());
        trace.stages.push(prepared.metrics);

        let located = LocateStage::new(&self.config.locator).process(&mut chart)?;
        trace.frame = located.data;
        trace.stages.push(located.metrics);

        let suppressed = SuppressStage::new(&self.config.grid).process(&mut chart)?;
        debug!("removed {} grid pixels", suppressed.data);
        trace.stages.push(suppressed.metrics);

        let topology = HouseTopology::new(chart.width(), chart.height());
        let mut cells: [HouseCell; 12] = HouseCell::for_topology(&topology);
        let extracted = ExtractionStage::new(
            self.recognizer.as_ref(),
            self.scripts(),
            &self.config.extraction,
        )
        .process(&chart, &mut cells)?;
        trace.rois = extracted.data.rois;
        trace.stages.push(extracted.metrics);

        let validated = ValidationStage::new().process(&mut cells)?;
        trace.stages.push(validated.metrics);

        let result = assemble(&cells, validated.data);
        match &result {
            AnalysisResult::Valid {
                ascendant_sign,
                placements,
                warnings,
                ..
            } => info!(
                "chart valid: ascendant {}, {} placements, {} warnings in {:?}",
                ascendant_sign,
                placements.len(),
                warnings.len(),
                start.elapsed()
            ),
            AnalysisResult::Invalid { errors, .. } => {
                info!("chart invalid: {:?} in {:?}", errors, start.elapsed())
            }
            AnalysisResult::DecodeError { message } => info!("{}", message),
        }

        trace.chart_gray = chart.gray;
        Ok((result, trace))
    }

    fn scripts(&self) -> &[Script] {
        &self.config.recognition.scripts
    }
}

/// Builder for [`ChartReader`].
#[derive(Default)]
pub struct ChartReaderBuilder {
    config: ChartReaderConfig,
    recognizer: Option<Arc<dyn TextRecognizer>>,
}

impl ChartReaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration.
    pub fn from_config(config: ChartReaderConfig) -> Self {
        Self {
            config,
            recognizer: None,
        }
    }

    /// Sets the OCR engine. Without one, [`ChartReaderBuilder::build`] uses
    /// Tesseract.
    pub fn recognizer(mut self, recognizer: Arc<dyn TextRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn min_width(mut self, min_width: u32) -> Self {
        self.config = self.config.with_min_width(min_width);
        self
    }

    pub fn max_width(mut self, max_width: Option<u32>) -> Self {
        self.config = self.config.with_max_width(max_width);
        self
    }

    pub fn min_area_fraction(mut self, fraction: f32) -> Self {
        self.config = self.config.with_min_area_fraction(fraction);
        self
    }

    pub fn grid_kernel_length(mut self, length: u32) -> Self {
        self.config = self.config.with_grid_kernel_length(length);
        self
    }

    pub fn roi_divisor(mut self, divisor: u32) -> Self {
        self.config = self.config.with_roi_divisor(divisor);
        self
    }

    pub fn parallel_extraction(mut self, parallel: bool) -> Self {
        self.config = self.config.with_parallel_extraction(parallel);
        self
    }

    pub fn scripts(mut self, scripts: Vec<Script>) -> Self {
        self.config = self.config.with_scripts(scripts);
        self
    }

    pub fn tesseract_binary(mut self, binary: impl Into<String>) -> Self {
        self.config.recognition.tesseract.binary = binary.into();
        self
    }

    pub fn tesseract_psm(mut self, psm: u8) -> Self {
        self.config.recognition.tesseract.psm = psm;
        self
    }

    pub fn get_config(&self) -> &ChartReaderConfig {
        &self.config
    }

    /// Validates the configuration and builds the reader.
    pub fn build(self) -> ChartResult<ChartReader> {
        match self.recognizer {
            Some(recognizer) => ChartReader::new(self.config, recognizer),
            None => ChartReader::with_tesseract(self.config),
        }
    }
}
