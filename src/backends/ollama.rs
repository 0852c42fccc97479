//! Local LLM backend: entity extraction through the Ollama HTTP API.

use serde::{Deserialize, Serialize};

use crate::pipeline::ClinicalEntities;

use super::parse::parse_entities_response;
use super::prompt::{build_text_prompt, EXTRACTION_SYSTEM_PROMPT};
use super::{BackendError, EntityExtractor};

/// Ollama HTTP client for local LLM inference.
pub struct OllamaExtractor {
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaExtractor {
    /// Create an extractor pointing at an Ollama instance.
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        }
    }

    /// Check whether the configured model is pulled. Used as a startup
    /// probe so a missing model surfaces in the logs, not on request N.
    pub fn is_model_available(&self) -> Result<bool, BackendError> {
        let models = self.list_models()?;
        Ok(models.iter().any(|m| m.starts_with(&self.model)))
    }

    pub fn list_models(&self) -> Result<Vec<String>, BackendError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self.client.get(&url).send().map_err(|e| {
            if e.is_connect() {
                BackendError::Connection(self.base_url.clone())
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

        let parsed: OllamaTagsResponse = response
            .json()
            .map_err(|e| BackendError::ResponseParsing(e.to_string()))?;

        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }

    fn generate(&self, prompt: &str, system: &str) -> Result<String, BackendError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            system,
            stream: false,
        };

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_connect() {
                BackendError::Connection(self.base_url.clone())
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

        let parsed: OllamaGenerateResponse = response
            .json()
            .map_err(|e| BackendError::ResponseParsing(e.to_string()))?;

        Ok(parsed.response)
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

/// Response body from Ollama /api/tags
#[derive(Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

impl EntityExtractor for OllamaExtractor {
    fn extract_from_text(&self, text: &str) -> Result<ClinicalEntities, BackendError> {
        let start = std::time::Instant::now();
        let raw = self.generate(&build_text_prompt(text), EXTRACTION_SYSTEM_PROMPT)?;

        tracing::info!(
            model = %self.model,
            elapsed_ms = %start.elapsed().as_millis(),
            response_len = raw.len(),
            "Ollama extraction complete"
        );

        parse_entities_response(&raw)
    }
}
