//! End-to-end runs of [`ChartReader`] over synthetic charts.

use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use super::*;
use crate::core::config::ChartReaderConfig;
use crate::core::{ChartError, ChartResult, PipelineStage};
use crate::domain::{
    ASCENDANT_MISSING, AnalysisResult, AscendantSource, NO_PLANETS, Planet, Sign,
};
use crate::pipeline::stages::OCR_PASSES;
use crate::recognition::{
    RecognitionSession, RecognizedText, Script, SerializedRecognizer, TextRecognizer,
};

/// Replays canned texts in call order. Extraction runs houses in order and
/// passes in order, so call `3 * (house - 1) + pass` belongs to that house.
struct ScriptedSession {
    texts: VecDeque<String>,
    calls: Arc<AtomicUsize>,
}

impl RecognitionSession for ScriptedSession {
    fn name(&self) -> &str {
        "scripted"
    }

    fn recognize(
        &mut self,
        _region: &GrayImage,
        _scripts: &[Script],
    ) -> ChartResult<RecognizedText> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RecognizedText::new(self.texts.pop_front().unwrap_or_default()))
    }
}

/// First-pass text per house; the other passes read nothing.
fn scripted(first_pass: &[(u8, &str)]) -> (Arc<dyn TextRecognizer>, Arc<AtomicUsize>) {
    let mut texts = VecDeque::new();
    for house in 1..=12u8 {
        let text = first_pass
            .iter()
            .find(|(h, _)| *h == house)
            .map(|(_, t)| t.to_string())
            .unwrap_or_default();
        texts.push_back(text);
        for _ in 1..OCR_PASSES {
            texts.push_back(String::new());
        }
    }
    let calls = Arc::new(AtomicUsize::new(0));
    let session = ScriptedSession {
        texts,
        calls: Arc::clone(&calls),
    };
    (Arc::new(SerializedRecognizer::new(session)), calls)
}

/// White page with a thick square frame, both diagonals and the inner
/// diamond, as printed North-Indian charts are drawn.
fn synthetic_chart() -> DynamicImage {
    let mut img = GrayImage::from_pixel(1000, 1000, Luma([255]));
    let black = Luma([0]);
    for inset in 0..4 {
        draw_hollow_rect_mut(
            &mut img,
            Rect::at(100 + inset, 100 + inset)
                .of_size(800 - 2 * inset as u32, 800 - 2 * inset as u32),
            black,
        );
    }
    let (lo, mid, hi) = (100.0, 500.0, 899.0);
    for offset in [-1.0, 0.0, 1.0] {
        draw_line_segment_mut(&mut img, (lo + offset, lo), (hi + offset, hi), black);
        draw_line_segment_mut(&mut img, (hi + offset, lo), (lo + offset, hi), black);
        draw_line_segment_mut(&mut img, (mid + offset, lo), (hi + offset, mid), black);
        draw_line_segment_mut(&mut img, (hi + offset, mid), (mid + offset, hi), black);
        draw_line_segment_mut(&mut img, (mid + offset, hi), (lo + offset, mid), black);
        draw_line_segment_mut(&mut img, (lo + offset, mid), (mid + offset, lo), black);
    }
    DynamicImage::ImageLuma8(img)
}

fn reader(recognizer: Arc<dyn TextRecognizer>) -> ChartReader {
    ChartReader::new(ChartReaderConfig::default(), recognizer).unwrap()
}

#[test]
fn test_clean_chart_reads_ascendant_directly() {
    let labels: Vec<String> = (1..=12).map(|h| h.to_string()).collect();
    let mut first_pass: Vec<(u8, &str)> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| (i as u8 + 1, label.as_str()))
        .collect();
    first_pass[0].1 = "1 Su";
    first_pass[6].1 = "7 Mo Ma";
    let (recognizer, calls) = scripted(&first_pass);

    let result = reader(recognizer).analyze_image(&synthetic_chart()).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 12 * OCR_PASSES);
    match result {
        AnalysisResult::Valid {
            ascendant_sign,
            ascendant_source,
            placements,
            warnings,
            ..
        } => {
            assert_eq!(ascendant_sign.number(), 1);
            assert_eq!(ascendant_source, AscendantSource::Read);
            assert!(warnings.is_empty());
            let found: Vec<(Planet, u8)> = placements.iter().map(|p| (p.planet, p.house)).collect();
            assert_eq!(
                found,
                vec![(Planet::Sun, 1), (Planet::Moon, 7), (Planet::Mars, 7)]
            );
            assert_eq!(placements[1].sign, Sign::new(7));
        }
        other => panic!("expected valid, got {:?}", other),
    }
}

#[test]
fn test_unreadable_house_one_is_deduced() {
    let (recognizer, _) = scripted(&[(4, "10 Ju")]);

    let result = reader(recognizer).analyze_image(&synthetic_chart()).unwrap();
    assert!(result.is_valid());
    assert_eq!(result.ascendant_sign(), Sign::new(7));
    match result {
        AnalysisResult::Valid {
            ascendant_source,
            placements,
            ..
        } => {
            assert_eq!(ascendant_source, AscendantSource::Deduced { from_house: 4 });
            assert_eq!(placements.len(), 1);
            assert_eq!(placements[0].planet, Planet::Jupiter);
            assert_eq!(placements[0].house, 4);
        }
        other => panic!("expected valid, got {:?}", other),
    }
}

#[test]
fn test_blank_image_is_invalid() {
    let (recognizer, _) = scripted(&[]);
    let blank = DynamicImage::ImageLuma8(GrayImage::from_pixel(1000, 1000, Luma([255])));

    match reader(recognizer).analyze_image(&blank).unwrap() {
        AnalysisResult::Invalid {
            errors,
            raw_house_data,
        } => {
            assert_eq!(errors, vec![ASCENDANT_MISSING.to_string()]);
            assert_eq!(raw_house_data.len(), 12);
            assert!(raw_house_data.iter().all(|cell| cell.sign.is_none()));
            let houses: Vec<u8> = raw_house_data.iter().map(|c| c.house_number()).collect();
            assert_eq!(houses, (1..=12).collect::<Vec<u8>>());
        }
        other => panic!("expected invalid, got {:?}", other),
    }
}

#[test]
fn test_no_planets_is_valid_with_warning() {
    let (recognizer, _) = scripted(&[(1, "3"), (2, "4")]);

    let result = reader(recognizer).analyze_image(&synthetic_chart()).unwrap();
    assert!(result.is_valid());
    assert_eq!(result.ascendant_sign(), Sign::new(3));
    assert_eq!(result.warnings(), [NO_PLANETS.to_string()]);
}

#[test]
fn test_recognizer_failures_do_not_abort() {
    struct Failing;
    impl TextRecognizer for Failing {
        fn name(&self) -> &str {
            "failing"
        }
        fn recognize(&self, _: &GrayImage, _: &[Script]) -> ChartResult<RecognizedText> {
            Err(ChartError::recognition("failing", "no engine"))
        }
    }

    let result = reader(Arc::new(Failing))
        .analyze_image(&synthetic_chart())
        .unwrap();
    assert_eq!(result.errors(), vec![ASCENDANT_MISSING.to_string()]);
}

#[test]
fn test_trace_reports_frame_and_rois() {
    let (recognizer, _) = scripted(&[(1, "5 Ra")]);
    let (result, trace) = reader(recognizer)
        .analyze_image_with_trace(&synthetic_chart())
        .unwrap();
    assert!(result.is_valid());

    assert_eq!(trace.working_size, (1000, 1000));
    let frame = trace.frame.expect("chart frame");
    assert!((95..=105).contains(&frame.x), "frame {:?}", frame);
    assert!((790..=810).contains(&frame.width), "frame {:?}", frame);
    assert_eq!(trace.chart_gray.dimensions(), (frame.width, frame.height));

    assert_eq!(trace.rois.len(), 12);
    let (w, h) = trace.chart_gray.dimensions();
    assert!(trace.rois.iter().all(|(_, roi)| roi.fits_within(w, h)));
    assert_eq!(trace.stages.len(), 5);
    assert!(trace.stage_time(PipelineStage::Extract).is_some());
}

#[test]
fn test_parallel_extraction_matches_sequential() {
    struct Constant;
    impl TextRecognizer for Constant {
        fn name(&self) -> &str {
            "constant"
        }
        fn recognize(&self, _: &GrayImage, _: &[Script]) -> ChartResult<RecognizedText> {
            Ok(RecognizedText::new("8 Sa"))
        }
    }

    let image = synthetic_chart();
    let sequential = reader(Arc::new(Constant)).analyze_image(&image).unwrap();
    let parallel = ChartReader::builder()
        .recognizer(Arc::new(Constant))
        .parallel_extraction(true)
        .build()
        .unwrap()
        .analyze_image(&image)
        .unwrap();
    assert_eq!(sequential, parallel);
    assert_eq!(parallel.ascendant_sign(), Sign::new(8));
}

#[test]
fn test_empty_image_is_decode_error() {
    let (recognizer, calls) = scripted(&[]);
    let empty = DynamicImage::ImageLuma8(GrayImage::new(0, 0));
    let result = reader(recognizer).analyze_image(&empty).unwrap();
    assert!(matches!(result, AnalysisResult::DecodeError { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_bytes_and_paths() {
    let (recognizer, _) = scripted(&[]);
    let reader = reader(recognizer);

    let garbage = reader.analyze_bytes(b"not an image").unwrap();
    match garbage {
        AnalysisResult::DecodeError { message } => {
            assert!(message.starts_with("Could not read image"), "{}", message)
        }
        other => panic!("expected decode error, got {:?}", other),
    }

    let dir = tempfile::tempdir().unwrap();
    let missing = reader.analyze_path(&dir.path().join("missing.png")).unwrap();
    assert!(matches!(missing, AnalysisResult::DecodeError { .. }));

    let mut png = Vec::new();
    synthetic_chart()
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .unwrap();
    let path = dir.path().join("chart.png");
    std::fs::write(&path, &png).unwrap();
    // The scripted session reads nothing for any house.
    assert!(matches!(
        reader.analyze_path(&path).unwrap(),
        AnalysisResult::Invalid { .. }
    ));
}

#[test]
fn test_builder_validates_config() {
    let (recognizer, _) = scripted(&[]);
    let err = ChartReader::builder()
        .recognizer(recognizer)
        .roi_divisor(1)
        .build()
        .unwrap_err();
    assert!(matches!(err, ChartError::ConfigError { .. }));
}

#[test]
fn test_result_json_shape() {
    let (recognizer, _) = scripted(&[(1, "12 Ke")]);
    let result = reader(recognizer).analyze_image(&synthetic_chart()).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["status"], "valid");
    assert_eq!(json["ascendant_sign"], 12);
    assert_eq!(json["ascendant_source"]["kind"], "read");
    assert_eq!(json["placements"][0]["planet"], "Ketu");
}
