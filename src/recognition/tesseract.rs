//! Tesseract command-line recognizer.
//!
//! Every call writes the region to a temporary PNG and runs the `tesseract`
//! executable with TSV output, so each call is an independent process and the
//! recognizer is safe to share between threads.

use std::path::Path;
use std::process::Command;

use image::{GrayImage, ImageFormat};
use tracing::debug;

use super::{RecognizedText, Script, TextRecognizer};
use crate::core::config::TesseractConfig;
use crate::core::{ChartError, ChartResult};

const ENGINE_NAME: &str = "tesseract";

/// Word-level rows in Tesseract TSV output.
const TSV_WORD_LEVEL: u32 = 5;

/// Recognizer backed by the `tesseract` executable.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    config: TesseractConfig,
}

impl TesseractRecognizer {
    pub fn new(config: TesseractConfig) -> Self {
        Self { config }
    }

    /// Builds the `-l` argument, e.g. `hin+eng`.
    pub fn language_arg(scripts: &[Script]) -> String {
        scripts
            .iter()
            .map(|s| s.tesseract_language())
            .collect::<Vec<_>>()
            .join("+")
    }

    /// Lists the traineddata languages installed for this executable.
    pub fn available_languages(&self) -> ChartResult<Vec<String>> {
        let output = Command::new(&self.config.binary)
            .arg("--list-langs")
            .output()
            .map_err(|e| {
                ChartError::recognition(
                    ENGINE_NAME,
                    format!("failed to run {} --list-langs: {}", self.config.binary, e),
                )
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ChartError::recognition(
                ENGINE_NAME,
                format!("--list-langs failed: {}", stderr.trim()),
            ));
        }
        Ok(parse_language_list(&String::from_utf8_lossy(&output.stdout)))
    }

    /// Scripts whose traineddata is not installed.
    pub fn missing_scripts(&self, scripts: &[Script]) -> ChartResult<Vec<Script>> {
        let installed = self.available_languages()?;
        Ok(scripts
            .iter()
            .copied()
            .filter(|s| !installed.iter().any(|l| l == s.tesseract_language()))
            .collect())
    }

    fn run_tsv(&self, path: &Path, scripts: &[Script]) -> ChartResult<String> {
        let output = Command::new(&self.config.binary)
            .arg(path)
            .arg("stdout")
            .arg("-l")
            .arg(Self::language_arg(scripts))
            .arg("--oem")
            .arg(self.config.oem.to_string())
            .arg("--psm")
            .arg(self.config.psm.to_string())
            .arg("tsv")
            .output()
            .map_err(|e| {
                ChartError::recognition(
                    ENGINE_NAME,
                    format!("failed to run {} (is it installed?): {}", self.config.binary, e),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ChartError::recognition(ENGINE_NAME, stderr.trim().to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new(TesseractConfig::default())
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn name(&self) -> &str {
        ENGINE_NAME
    }

    fn recognize(&self, region: &GrayImage, scripts: &[Script]) -> ChartResult<RecognizedText> {
        if region.width() == 0 || region.height() == 0 {
            return Ok(RecognizedText::default());
        }

        let file = tempfile::Builder::new()
            .prefix("kundli-roi-")
            .suffix(".png")
            .tempfile()?;
        region
            .save_with_format(file.path(), ImageFormat::Png)
            .map_err(|e| ChartError::recognition(ENGINE_NAME, e.to_string()))?;

        let tsv = self.run_tsv(file.path(), scripts)?;
        let recognized = parse_tsv(&tsv);
        debug!(
            "tesseract read {:?} (confidence {:?}) from {}x{} region",
            recognized.text,
            recognized.confidence,
            region.width(),
            region.height()
        );
        Ok(recognized)
    }
}

/// Joins word rows of Tesseract TSV output into text.
///
/// Words on the same (block, paragraph, line) are joined with spaces and lines
/// with newlines. Confidence is the mean word confidence scaled to `[0, 1]`.
pub fn parse_tsv(tsv: &str) -> RecognizedText {
    let mut lines: Vec<((u32, u32, u32), Vec<String>)> = Vec::new();
    let mut confidence_sum = 0.0f32;
    let mut words = 0usize;

    for row in tsv.lines().skip(1) {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < 12 {
            continue;
        }
        if cols[0].parse::<u32>().ok() != Some(TSV_WORD_LEVEL) {
            continue;
        }
        let conf: f32 = cols[10].parse().unwrap_or(-1.0);
        let text = cols[11].trim();
        if text.is_empty() || conf < 0.0 {
            continue;
        }

        let key = (
            cols[2].parse().unwrap_or(0),
            cols[3].parse().unwrap_or(0),
            cols[4].parse().unwrap_or(0),
        );
        match lines.last_mut() {
            Some((last_key, line_words)) if *last_key == key => line_words.push(text.to_string()),
            _ => lines.push((key, vec![text.to_string()])),
        }
        confidence_sum += conf;
        words += 1;
    }

    let text = lines
        .iter()
        .map(|(_, line_words)| line_words.join(" "))
        .collect::<Vec<_>>()
        .join("\n");
    let recognized = RecognizedText::new(text);
    if words == 0 {
        recognized
    } else {
        recognized.with_confidence(confidence_sum / words as f32 / 100.0)
    }
}

fn parse_language_list(stdout: &str) -> Vec<String> {
    // The first line is a header ("List of available languages ...").
    stdout
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    #[test]
    fn test_language_arg() {
        assert_eq!(
            TesseractRecognizer::language_arg(&[Script::Devanagari, Script::Latin]),
            "hin+eng"
        );
        assert_eq!(TesseractRecognizer::language_arg(&[Script::Latin]), "eng");
    }

    #[test]
    fn test_parse_tsv_groups_lines() {
        let tsv = format!(
            "{HEADER}\n\
             1\t1\t0\t0\t0\t0\t0\t0\t100\t100\t-1\t\n\
             5\t1\t1\t1\t1\t1\t10\t10\t20\t20\t90.0\t5\n\
             5\t1\t1\t1\t1\t2\t40\t10\t20\t20\t70.0\tसू\n\
             5\t1\t1\t1\t2\t1\t10\t40\t20\t20\t80.0\tMa\n\
             5\t1\t1\t1\t2\t2\t40\t40\t20\t20\t-1\t \n"
        );
        let recognized = parse_tsv(&tsv);
        assert_eq!(recognized.text, "5 सू\nMa");
        let confidence = recognized.confidence.unwrap();
        assert!((confidence - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_parse_tsv_empty() {
        let recognized = parse_tsv(HEADER);
        assert_eq!(recognized.text, "");
        assert_eq!(recognized.confidence, None);
    }

    #[test]
    fn test_parse_language_list() {
        let langs = parse_language_list(
            "List of available languages in \"/usr/share/tessdata/\" (3):\neng\nhin\nosd\n",
        );
        assert_eq!(langs, vec!["eng", "hin", "osd"]);
    }

    #[test]
    fn test_missing_binary_is_recognition_error() {
        let recognizer = TesseractRecognizer::new(TesseractConfig {
            binary: "/nonexistent/tesseract-binary".to_string(),
            ..TesseractConfig::default()
        });
        let err = recognizer
            .recognize(&GrayImage::new(8, 8), &[Script::Latin])
            .unwrap_err();
        assert!(matches!(err, ChartError::Recognition { .. }));
        assert!(recognizer.available_languages().is_err());
    }

    #[test]
    fn test_empty_region_skips_engine() {
        let recognizer = TesseractRecognizer::new(TesseractConfig {
            binary: "/nonexistent/tesseract-binary".to_string(),
            ..TesseractConfig::default()
        });
        let recognized = recognizer
            .recognize(&GrayImage::new(0, 0), &[Script::Latin])
            .unwrap();
        assert_eq!(recognized, RecognizedText::default());
    }
}
