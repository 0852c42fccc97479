//! Error taxonomy for document processing.
//!
//! Every variant is terminal for the document it concerns — the orchestrator
//! never retries. The boundary layer maps these onto transport status codes;
//! nothing in this module knows about HTTP.

use thiserror::Error;

use crate::backends::BackendError;
use crate::ocr::OcrError;

#[derive(Error, Debug)]
pub enum ExtractError {
    /// The declared media type is neither an image nor a PDF. Raised before
    /// any collaborator is invoked.
    #[error("{0}")]
    InvalidInput(String),

    #[error("text recognition failed: {0}")]
    Ocr(#[from] OcrError),

    #[error("entity extraction failed: {0}")]
    Backend(#[from] BackendError),
}

impl ExtractError {
    /// Stable machine-readable code, shared by the HTTP error body and the
    /// batch stream's error descriptor.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Ocr(_) => "OCR_FAILED",
            Self::Backend(_) => "BACKEND_FAILED",
        }
    }
}
