//! Entity extraction backends.
//!
//! Three interchangeable implementations consume recognized text: the
//! rule-based extractor (no network), Ollama (local LLM), and Gemini
//! (cloud). Gemini additionally consumes raw image bytes for the
//! vision-only handwriting path.

pub mod gemini;
pub mod ollama;
pub mod parse;
pub mod prompt;
pub mod rule_based;

pub use gemini::GeminiExtractor;
pub use ollama::OllamaExtractor;
pub use rule_based::RuleBasedExtractor;

use thiserror::Error;

use crate::pipeline::ClinicalEntities;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("backend unreachable at {0}")]
    Connection(String),

    #[error("backend request timed out after {0}s")]
    Timeout(u64),

    #[error("backend returned error (status {status}): {body}")]
    RemoteStatus { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("malformed backend response: {0}")]
    MalformedResponse(String),

    #[error("response parsing error: {0}")]
    ResponseParsing(String),

    #[error("cloud API key is not configured")]
    MissingApiKey,
}

/// Text-consuming extraction backend (all three implementations).
pub trait EntityExtractor {
    fn extract_from_text(&self, text: &str) -> Result<ClinicalEntities, BackendError>;
}

/// Image-consuming extraction backend (cloud only).
pub trait VisionExtractor {
    fn extract_from_image(
        &self,
        bytes: &[u8],
        media_type: &str,
    ) -> Result<ClinicalEntities, BackendError>;
}

/// Mock backend for testing — returns a configurable result from both the
/// text and the vision entry points.
pub struct MockExtractor {
    entities: ClinicalEntities,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self {
            entities: ClinicalEntities::default(),
        }
    }

    pub fn returning(entities: ClinicalEntities) -> Self {
        Self { entities }
    }
}

impl Default for MockExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityExtractor for MockExtractor {
    fn extract_from_text(&self, _text: &str) -> Result<ClinicalEntities, BackendError> {
        Ok(self.entities.clone())
    }
}

impl VisionExtractor for MockExtractor {
    fn extract_from_image(
        &self,
        _bytes: &[u8],
        _media_type: &str,
    ) -> Result<ClinicalEntities, BackendError> {
        Ok(self.entities.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_configured_entities() {
        let entities = ClinicalEntities {
            diagnoses: vec!["Hypertension".into()],
            ..Default::default()
        };
        let backend = MockExtractor::returning(entities.clone());
        assert_eq!(backend.extract_from_text("ignored").unwrap(), entities);
        assert_eq!(
            backend.extract_from_image(b"ignored", "image/png").unwrap(),
            entities
        );
    }
}
