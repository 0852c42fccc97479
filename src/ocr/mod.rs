//! Text recognition: the collaborator that turns document bytes into plain
//! text for the OCR-then-extract path.

pub mod recognizer;

pub use recognizer::DocumentRecognizer;

use thiserror::Error;

use crate::pipeline::DocumentKind;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("image decoding failed: {0}")]
    ImageDecode(String),

    #[error("OCR engine initialization failed: {0}")]
    EngineInit(String),

    #[error("OCR processing failed: {0}")]
    Processing(String),

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("PDF has no extractable text layer; submit page images instead")]
    NoTextLayer,

    #[error("image OCR is unavailable in this build (compiled without the `ocr` feature)")]
    EngineUnavailable,

    #[error("tessdata not found at: {0}")]
    TessdataNotFound(std::path::PathBuf),
}

/// Text recognition abstraction (allows mocking for tests).
pub trait TextRecognizer {
    fn recognize(&self, bytes: &[u8], kind: DocumentKind) -> Result<String, OcrError>;
}

/// Mock recognizer for unit testing without an OCR engine.
pub struct MockRecognizer {
    pub text: String,
}

impl MockRecognizer {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl TextRecognizer for MockRecognizer {
    fn recognize(&self, _bytes: &[u8], _kind: DocumentKind) -> Result<String, OcrError> {
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_recognizer_returns_configured_text() {
        let recognizer = MockRecognizer::new("Metformin 500mg");
        let text = recognizer.recognize(b"fake", DocumentKind::Image).unwrap();
        assert_eq!(text, "Metformin 500mg");
    }
}
