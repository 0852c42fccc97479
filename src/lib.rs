//! medextract — extraction service for medical documents.
//!
//! Accepts an image or PDF, runs text recognition, and extracts structured
//! clinical entities through one of three interchangeable backends: a local
//! rule-based extractor, a local LLM via Ollama, or Gemini in the cloud
//! (which can also consume images directly, bypassing OCR). Single-document
//! requests return one JSON result; batch requests stream one result per
//! file over SSE as each completes.

pub mod api;
pub mod backends;
pub mod config;
pub mod ocr;
pub mod pipeline;
