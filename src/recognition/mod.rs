//! Text recognition capability.
//!
//! The pipeline never talks to a concrete OCR engine. It asks a
//! [`TextRecognizer`] to read a grayscale region in a given set of
//! [`Script`]s. Engines that can be called from several threads at once
//! implement [`TextRecognizer`] directly; engines that need exclusive access
//! implement [`RecognitionSession`] and are wrapped in a
//! [`SerializedRecognizer`], which serialises calls behind a mutex.

pub mod tesseract;

use std::sync::Mutex;

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::core::{ChartError, ChartResult};

pub use tesseract::TesseractRecognizer;

/// A writing system the recognizer must be able to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    /// Latin letters and digits (English abbreviations).
    Latin,
    /// Devanagari letters and digits (Hindi/Nepali abbreviations).
    Devanagari,
}

impl Script {
    /// Tesseract traineddata name for this script.
    pub fn tesseract_language(self) -> &'static str {
        match self {
            Script::Latin => "eng",
            Script::Devanagari => "hin",
        }
    }
}

/// Text read from one region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecognizedText {
    pub text: String,
    /// Engine confidence in `[0, 1]`, when the engine reports one.
    pub confidence: Option<f32>,
}

impl RecognizedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }
}

/// An OCR engine that can be shared between threads.
pub trait TextRecognizer: Send + Sync {
    /// Short engine name used in logs and errors.
    fn name(&self) -> &str;

    /// Reads the text in `region` using the given scripts.
    fn recognize(&self, region: &GrayImage, scripts: &[Script]) -> ChartResult<RecognizedText>;
}

/// An OCR engine handle that is not reentrant.
pub trait RecognitionSession: Send {
    fn name(&self) -> &str;

    fn recognize(&mut self, region: &GrayImage, scripts: &[Script])
    -> ChartResult<RecognizedText>;
}

/// Shares a [`RecognitionSession`] by serialising every call through a mutex.
pub struct SerializedRecognizer<S> {
    name: String,
    session: Mutex<S>,
}

impl<S: RecognitionSession> SerializedRecognizer<S> {
    pub fn new(session: S) -> Self {
        Self {
            name: session.name().to_string(),
            session: Mutex::new(session),
        }
    }

    /// Returns the wrapped session.
    pub fn into_inner(self) -> ChartResult<S> {
        self.session
            .into_inner()
            .map_err(|_| ChartError::recognition(&self.name, "session mutex poisoned"))
    }
}

impl<S: RecognitionSession> TextRecognizer for SerializedRecognizer<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn recognize(&self, region: &GrayImage, scripts: &[Script]) -> ChartResult<RecognizedText> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| ChartError::recognition(&self.name, "session mutex poisoned"))?;
        session.recognize(region, scripts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct CountingSession {
        calls: usize,
    }

    impl RecognitionSession for CountingSession {
        fn name(&self) -> &str {
            "counting"
        }

        fn recognize(
            &mut self,
            _region: &GrayImage,
            scripts: &[Script],
        ) -> ChartResult<RecognizedText> {
            self.calls += 1;
            Ok(RecognizedText::new(format!("{} {}", self.calls, scripts.len())))
        }
    }

    #[test]
    fn test_script_languages() {
        assert_eq!(Script::Latin.tesseract_language(), "eng");
        assert_eq!(Script::Devanagari.tesseract_language(), "hin");
        assert_eq!(serde_json::to_string(&Script::Devanagari).unwrap(), "\"devanagari\"");
    }

    #[test]
    fn test_confidence_is_clamped() {
        let text = RecognizedText::new("5").with_confidence(1.7);
        assert_eq!(text.confidence, Some(1.0));
    }

    #[test]
    fn test_serialized_recognizer_counts_every_call() {
        let recognizer = Arc::new(SerializedRecognizer::new(CountingSession { calls: 0 }));
        let region = GrayImage::new(4, 4);

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let recognizer = Arc::clone(&recognizer);
                let region = &region;
                scope.spawn(move || {
                    for _ in 0..5 {
                        recognizer.recognize(region, &[Script::Latin]).unwrap();
                    }
                });
            }
        });

        assert_eq!(recognizer.name(), "counting");
        let session = Arc::try_unwrap(recognizer).ok().unwrap().into_inner().unwrap();
        assert_eq!(session.calls, 20);
    }
}
