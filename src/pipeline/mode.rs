/// The two mutually exclusive processing paths for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// Hand the raw image straight to the cloud vision backend, skipping OCR.
    VisionOnly,
    /// Recognize text first, then dispatch it to the selected backend.
    OcrThenExtract,
}

impl ExtractionMode {
    /// Pick the processing path from the request flags.
    ///
    /// Vision-only requires both: a handwritten document AND the cloud
    /// backend, since only that backend consumes image bytes directly.
    /// A handwritten document without the cloud backend degrades to the
    /// OCR path; callers log that combination so it stays visible.
    pub fn select(is_handwritten: bool, use_cloud_llm: bool) -> Self {
        if is_handwritten && use_cloud_llm {
            Self::VisionOnly
        } else {
            Self::OcrThenExtract
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VisionOnly => "vision_only",
            Self::OcrThenExtract => "ocr_then_extract",
        }
    }
}

impl std::fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vision_only_requires_both_flags() {
        assert_eq!(
            ExtractionMode::select(true, true),
            ExtractionMode::VisionOnly
        );
    }

    #[test]
    fn handwritten_without_cloud_falls_back_to_ocr() {
        assert_eq!(
            ExtractionMode::select(true, false),
            ExtractionMode::OcrThenExtract
        );
    }

    #[test]
    fn printed_documents_always_take_ocr_path() {
        assert_eq!(
            ExtractionMode::select(false, true),
            ExtractionMode::OcrThenExtract
        );
        assert_eq!(
            ExtractionMode::select(false, false),
            ExtractionMode::OcrThenExtract
        );
    }

    #[test]
    fn mode_display() {
        assert_eq!(ExtractionMode::VisionOnly.to_string(), "vision_only");
        assert_eq!(
            ExtractionMode::OcrThenExtract.to_string(),
            "ocr_then_extract"
        );
    }
}
