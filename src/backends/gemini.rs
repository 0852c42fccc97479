//! Cloud backend: entity extraction through the Gemini generateContent API.
//!
//! The only backend with a vision entry point — handwritten documents are
//! sent as inline image data and extracted without an OCR pass.

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::pipeline::ClinicalEntities;

use super::parse::parse_entities_response;
use super::prompt::{build_text_prompt, build_vision_prompt, EXTRACTION_SYSTEM_PROMPT};
use super::{BackendError, EntityExtractor, VisionExtractor};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini HTTP client. The key is optional at construction so the service
/// can start without cloud credentials; requests then fail with
/// `MissingApiKey` instead of a panic.
pub struct GeminiExtractor {
    api_key: Option<String>,
    model: String,
    api_base: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiExtractor {
    pub fn new(api_key: Option<String>, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key,
            model: model.to_string(),
            api_base: GEMINI_API_BASE.to_string(),
            client,
            timeout_secs,
        }
    }

    /// Point the client at a different API host (proxies, test servers).
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn generate(&self, parts: Vec<Part>) -> Result<String, BackendError> {
        let api_key = self.api_key.as_deref().ok_or(BackendError::MissingApiKey)?;
        let url = format!(
            "{}/models/{}:generateContent",
            self.api_base, self.model
        );

        let body = GenerateContentRequest {
            system_instruction: Instruction {
                parts: vec![Part::text(EXTRACTION_SYSTEM_PROMPT)],
            },
            contents: vec![Content { parts }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    BackendError::Connection(self.api_base.clone())
                } else if e.is_timeout() {
                    BackendError::Timeout(self.timeout_secs)
                } else {
                    BackendError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(BackendError::RemoteStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| BackendError::ResponseParsing(e.to_string()))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(BackendError::MalformedResponse(
                "Gemini returned no candidates".into(),
            ));
        }
        Ok(text)
    }
}

// ── Wire types (proto-JSON field names) ──────────────────────────

#[derive(Serialize)]
struct GenerateContentRequest {
    system_instruction: Instruction,
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Instruction {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }

    fn inline_image(media_type: &str, bytes: &[u8]) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: media_type.to_string(),
                data: base64::engine::general_purpose::STANDARD.encode(bytes),
            }),
        }
    }
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl EntityExtractor for GeminiExtractor {
    fn extract_from_text(&self, text: &str) -> Result<ClinicalEntities, BackendError> {
        let start = std::time::Instant::now();
        let raw = self.generate(vec![Part::text(&build_text_prompt(text))])?;

        tracing::info!(
            model = %self.model,
            elapsed_ms = %start.elapsed().as_millis(),
            response_len = raw.len(),
            "Gemini text extraction complete"
        );

        parse_entities_response(&raw)
    }
}

impl VisionExtractor for GeminiExtractor {
    fn extract_from_image(
        &self,
        bytes: &[u8],
        media_type: &str,
    ) -> Result<ClinicalEntities, BackendError> {
        let start = std::time::Instant::now();
        let raw = self.generate(vec![
            Part::text(&build_vision_prompt()),
            Part::inline_image(media_type, bytes),
        ])?;

        tracing::info!(
            model = %self.model,
            elapsed_ms = %start.elapsed().as_millis(),
            image_size = bytes.len(),
            "Gemini vision extraction complete"
        );

        parse_entities_response(&raw)
    }
}
