//! Shared handler state and request flag handling.

use std::sync::Arc;

use crate::pipeline::{BackendKind, ExtractionEngine, ExtractionMode};

/// Shared state handed to every handler: the engine built at startup.
#[derive(Clone)]
pub struct ApiContext {
    pub engine: Arc<ExtractionEngine>,
}

impl ApiContext {
    pub fn new(engine: ExtractionEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

/// Backend/mode selection flags, shared by both endpoints. All default to
/// false: no flags means rule-based extraction over OCR text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractionFlags {
    pub use_cloud_llm: bool,
    pub use_local_llm: bool,
    pub is_handwritten: bool,
}

impl ExtractionFlags {
    pub fn backend(&self) -> BackendKind {
        BackendKind::from_flags(self.use_cloud_llm, self.use_local_llm)
    }

    pub fn mode(&self) -> ExtractionMode {
        ExtractionMode::select(self.is_handwritten, self.backend() == BackendKind::CloudLlm)
    }

    /// True when a handwritten document will degrade to the OCR path
    /// because the cloud backend was not selected. Logged by handlers.
    pub fn handwriting_degraded(&self) -> bool {
        self.is_handwritten && self.mode() == ExtractionMode::OcrThenExtract
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_select_rule_based_ocr_path() {
        let flags = ExtractionFlags::default();
        assert_eq!(flags.backend(), BackendKind::RuleBased);
        assert_eq!(flags.mode(), ExtractionMode::OcrThenExtract);
        assert!(!flags.handwriting_degraded());
    }

    #[test]
    fn handwritten_with_cloud_takes_vision_path() {
        let flags = ExtractionFlags {
            use_cloud_llm: true,
            is_handwritten: true,
            ..Default::default()
        };
        assert_eq!(flags.mode(), ExtractionMode::VisionOnly);
        assert!(!flags.handwriting_degraded());
    }

    #[test]
    fn handwritten_without_cloud_is_degraded() {
        let flags = ExtractionFlags {
            use_local_llm: true,
            is_handwritten: true,
            ..Default::default()
        };
        assert_eq!(flags.mode(), ExtractionMode::OcrThenExtract);
        assert_eq!(flags.backend(), BackendKind::LocalLlm);
        assert!(flags.handwriting_degraded());
    }

    #[test]
    fn conflicting_backend_flags_resolve_to_cloud() {
        let flags = ExtractionFlags {
            use_cloud_llm: true,
            use_local_llm: true,
            ..Default::default()
        };
        assert_eq!(flags.backend(), BackendKind::CloudLlm);
    }
}
