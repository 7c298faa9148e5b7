//! Extract stage: per-house multi-pass OCR with consensus.
//!
//! Each house is read three times from a square region around its centroid:
//!
//! 1. the grid-suppressed binary region,
//! 2. the raw grayscale region,
//! 3. the grayscale region upscaled and re-binarized with OTSU, which helps
//!    with thin or tiny glyphs.
//!
//! The sign is the majority of the signs the passes found, with ties going to
//! the earliest pass. The planets are the union of every pass.

use std::collections::BTreeSet;
use std::time::Instant;

use image::GrayImage;
use rayon::prelude::*;
use tracing::{debug, warn};

use super::types::{StageMetrics, StageResult};
use crate::core::config::ExtractionConfig;
use crate::core::{ChartError, ChartResult, PipelineStage};
use crate::domain::{HouseCell, Planet, Sign};
use crate::pipeline::ChartImage;
use crate::processors::{
    CellReading, PixelRect, clean_ocr, crop, otsu_binarize, parse_cell_text, upscale,
};
use crate::recognition::{Script, TextRecognizer};

/// Number of OCR passes per house.
pub const OCR_PASSES: usize = 3;

/// Majority vote over the signs found by the passes, in pass order.
///
/// Absent readings do not vote. On a tie the sign seen first wins.
pub fn vote_sign(readings: &[Option<Sign>]) -> Option<Sign> {
    let votes: Vec<Sign> = readings.iter().flatten().copied().collect();
    let mut best: Option<(Sign, usize)> = None;
    for (i, sign) in votes.iter().enumerate() {
        if votes[..i].contains(sign) {
            continue;
        }
        let count = votes.iter().filter(|s| *s == sign).count();
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((*sign, count));
        }
    }
    best.map(|(sign, _)| sign)
}

/// Union of the planet sets of every pass.
pub fn merge_planets<'a>(sets: impl IntoIterator<Item = &'a BTreeSet<Planet>>) -> BTreeSet<Planet> {
    sets.into_iter().flatten().copied().collect()
}

/// Square ROI of half-size `min(width, height) / divisor` around `cell`,
/// clamped to the image.
pub fn roi_for(cell: &HouseCell, width: u32, height: u32, divisor: u32) -> PixelRect {
    let half = width.min(height) / divisor.max(1);
    PixelRect::around(cell.centroid, half, width, height)
}

/// Everything read from one house before it is applied to its cell.
#[derive(Debug, Clone, Default)]
pub struct HouseExtraction {
    pub roi: Option<PixelRect>,
    pub texts: Vec<String>,
    pub readings: Vec<CellReading>,
    /// Passes whose recognizer call failed.
    pub failed_passes: usize,
}

impl HouseExtraction {
    pub fn sign(&self) -> Option<Sign> {
        let signs: Vec<Option<Sign>> = self.readings.iter().map(|r| r.sign).collect();
        vote_sign(&signs)
    }

    pub fn planets(&self) -> BTreeSet<Planet> {
        merge_planets(self.readings.iter().map(|r| &r.planets))
    }
}

/// Summary returned by [`ExtractionStage::process`].
#[derive(Debug, Clone, Default)]
pub struct ExtractionSummary {
    /// ROI of every house, in house order.
    pub rois: Vec<(u8, PixelRect)>,
    pub houses_with_sign: usize,
    pub failed_passes: usize,
}

/// Reads every house of a chart with a [`TextRecognizer`].
pub struct ExtractionStage<'a> {
    recognizer: &'a dyn TextRecognizer,
    scripts: &'a [Script],
    config: &'a ExtractionConfig,
}

impl<'a> ExtractionStage<'a> {
    pub fn new(
        recognizer: &'a dyn TextRecognizer,
        scripts: &'a [Script],
        config: &'a ExtractionConfig,
    ) -> Self {
        Self {
            recognizer,
            scripts,
            config,
        }
    }

    /// Reads all cells and writes sign, planets and OCR trace into each.
    pub fn process(
        &self,
        image: &ChartImage,
        cells: &mut [HouseCell],
    ) -> ChartResult<StageResult<ExtractionSummary>> {
        let start = Instant::now();
        let (width, height) = (image.width(), image.height());
        if image.ocr_binary().dimensions() != (width, height) {
            return Err(ChartError::extract(
                "region crop",
                format!(
                    "binary buffer is {:?} but grayscale is {}x{}",
                    image.ocr_binary().dimensions(),
                    width,
                    height
                ),
            ));
        }

        let extractions: Vec<HouseExtraction> = if self.config.parallel {
            cells
                .par_iter()
                .map(|cell| self.read_house(image, cell))
                .collect()
        } else {
            cells
                .iter()
                .map(|cell| self.read_house(image, cell))
                .collect()
        };

        let mut summary = ExtractionSummary::default();
        for (cell, extraction) in cells.iter_mut().zip(extractions) {
            cell.sign = extraction.sign();
            cell.planets = extraction.planets();
            debug!(
                "house {}: sign {:?}, planets {:?}, trace {:?}",
                cell.house_number(),
                cell.sign.map(Sign::number),
                cell.planets,
                extraction.texts
            );
            cell.raw_ocr_trace = extraction.texts;

            if let Some(roi) = extraction.roi {
                summary.rois.push((cell.house_number(), roi));
            }
            summary.houses_with_sign += usize::from(cell.sign.is_some());
            summary.failed_passes += extraction.failed_passes;
        }

        let metrics = StageMetrics::new(
            PipelineStage::Extract,
            summary.houses_with_sign,
            cells.len() - summary.houses_with_sign,
        )
        .finished(start)
        .with_info("engine", self.recognizer.name())
        .with_info("failed_passes", summary.failed_passes.to_string())
        .with_info("parallel", self.config.parallel.to_string());
        Ok(StageResult::new(summary, metrics))
    }

    /// Runs the three passes over one house.
    pub fn read_house(&self, image: &ChartImage, cell: &HouseCell) -> HouseExtraction {
        let rect = roi_for(cell, image.width(), image.height(), self.config.roi_divisor);
        if rect.is_empty() {
            debug!("house {}: empty region, skipping OCR", cell.house_number());
            return HouseExtraction {
                roi: None,
                texts: vec![String::new(); OCR_PASSES],
                readings: vec![CellReading::default(); OCR_PASSES],
                failed_passes: 0,
            };
        }

        let gray_roi = crop(&image.gray, rect);
        let (rebinarized, _) = otsu_binarize(&upscale(&gray_roi, self.config.upscale_factor));
        let passes: [GrayImage; OCR_PASSES] =
            [crop(image.ocr_binary(), rect), gray_roi, rebinarized];

        let mut extraction = HouseExtraction {
            roi: Some(rect),
            ..HouseExtraction::default()
        };
        for (pass, region) in passes.iter().enumerate() {
            let text = match self.recognizer.recognize(region, self.scripts) {
                Ok(recognized) => clean_ocr(&recognized.text).to_string(),
                Err(e) => {
                    warn!(
                        "house {} pass {}: {} failed: {}",
                        cell.house_number(),
                        pass + 1,
                        self.recognizer.name(),
                        e
                    );
                    extraction.failed_passes += 1;
                    String::new()
                }
            };
            extraction.readings.push(parse_cell_text(&text));
            extraction.texts.push(text);
        }
        extraction
    }
}
