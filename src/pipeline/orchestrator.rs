//! Single-document orchestration: one validation, at most one recognition
//! call, exactly one backend call.

use std::time::Instant;

use crate::backends::{EntityExtractor, VisionExtractor};
use crate::ocr::TextRecognizer;

use super::backend::BackendKind;
use super::error::ExtractError;
use super::mode::ExtractionMode;
use super::types::{ClinicalEntities, Document};

/// The cloud slot must serve both the text path and the vision path.
pub trait CloudBackend: EntityExtractor + VisionExtractor + Send + Sync {}
impl<T: EntityExtractor + VisionExtractor + Send + Sync> CloudBackend for T {}

/// Owns the collaborators and runs one processing path per document.
/// Built once at startup; immutable and shareable across requests.
pub struct ExtractionEngine {
    recognizer: Box<dyn TextRecognizer + Send + Sync>,
    rule_based: Box<dyn EntityExtractor + Send + Sync>,
    local_llm: Box<dyn EntityExtractor + Send + Sync>,
    cloud: Box<dyn CloudBackend>,
}

impl ExtractionEngine {
    pub fn new(
        recognizer: Box<dyn TextRecognizer + Send + Sync>,
        rule_based: Box<dyn EntityExtractor + Send + Sync>,
        local_llm: Box<dyn EntityExtractor + Send + Sync>,
        cloud: Box<dyn CloudBackend>,
    ) -> Self {
        Self {
            recognizer,
            rule_based,
            local_llm,
            cloud,
        }
    }

    /// Process one document end-to-end.
    ///
    /// Media-type validation happens before any collaborator is touched.
    /// A recognition failure short-circuits the backend call. No retries;
    /// a failed collaborator call is terminal for this document.
    pub fn process(
        &self,
        doc: &Document,
        mode: ExtractionMode,
        backend: BackendKind,
    ) -> Result<ClinicalEntities, ExtractError> {
        let kind = doc.kind().ok_or_else(|| {
            ExtractError::InvalidInput(format!(
                "file must be an image or PDF, got {}",
                doc.media_type
            ))
        })?;

        let _span = tracing::info_span!(
            "process_document",
            filename = %doc.filename,
            mode = %mode,
            backend = %backend,
        )
        .entered();
        let start = Instant::now();

        let entities = match mode {
            ExtractionMode::VisionOnly => {
                self.cloud.extract_from_image(&doc.bytes, &doc.media_type)?
            }
            ExtractionMode::OcrThenExtract => {
                let text = self.recognizer.recognize(&doc.bytes, kind)?;
                tracing::debug!(text_len = text.len(), "text recognized");

                match backend {
                    BackendKind::RuleBased => self.rule_based.extract_from_text(&text)?,
                    BackendKind::LocalLlm => self.local_llm.extract_from_text(&text)?,
                    BackendKind::CloudLlm => self.cloud.extract_from_text(&text)?,
                }
            }
        };

        tracing::info!(
            elapsed_ms = %start.elapsed().as_millis(),
            "document processed"
        );
        Ok(entities)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::backends::BackendError;
    use crate::ocr::OcrError;
    use crate::pipeline::DocumentKind;

    /// Recognizer stub that counts calls and echoes the document bytes as
    /// text, so tests can steer downstream behavior per document.
    pub(crate) struct StubRecognizer {
        pub calls: Arc<AtomicUsize>,
        pub fail: bool,
    }

    impl StubRecognizer {
        pub fn ok() -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                fail: false,
            }
        }

        pub fn failing() -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                fail: true,
            }
        }
    }

    impl crate::ocr::TextRecognizer for StubRecognizer {
        fn recognize(&self, bytes: &[u8], _kind: DocumentKind) -> Result<String, OcrError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(OcrError::Processing("unreadable".into()))
            } else {
                Ok(String::from_utf8_lossy(bytes).to_string())
            }
        }
    }

    /// Backend stub that counts calls, optionally fails when the input text
    /// equals "FAIL", and tags its output so dispatch is observable.
    pub(crate) struct StubBackend {
        pub text_calls: Arc<AtomicUsize>,
        pub vision_calls: Arc<AtomicUsize>,
        pub tag: &'static str,
    }

    impl StubBackend {
        pub fn tagged(tag: &'static str) -> Self {
            Self {
                text_calls: Arc::new(AtomicUsize::new(0)),
                vision_calls: Arc::new(AtomicUsize::new(0)),
                tag,
            }
        }

        fn entities(&self) -> ClinicalEntities {
            ClinicalEntities {
                notes: Some(self.tag.to_string()),
                ..Default::default()
            }
        }
    }

    impl EntityExtractor for StubBackend {
        fn extract_from_text(&self, text: &str) -> Result<ClinicalEntities, BackendError> {
            self.text_calls.fetch_add(1, Ordering::SeqCst);
            if text == "FAIL" {
                return Err(BackendError::MalformedResponse("stub failure".into()));
            }
            Ok(self.entities())
        }
    }

    impl VisionExtractor for StubBackend {
        fn extract_from_image(
            &self,
            _bytes: &[u8],
            _media_type: &str,
        ) -> Result<ClinicalEntities, BackendError> {
            self.vision_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.entities())
        }
    }

    pub(crate) struct EngineHandles {
        pub engine: ExtractionEngine,
        pub recognizer_calls: Arc<AtomicUsize>,
        pub rule_calls: Arc<AtomicUsize>,
        pub local_calls: Arc<AtomicUsize>,
        pub cloud_text_calls: Arc<AtomicUsize>,
        pub cloud_vision_calls: Arc<AtomicUsize>,
    }

    pub(crate) fn stub_engine() -> EngineHandles {
        stub_engine_with_recognizer(StubRecognizer::ok())
    }

    pub(crate) fn stub_engine_with_recognizer(recognizer: StubRecognizer) -> EngineHandles {
        let rule = StubBackend::tagged("rule_based");
        let local = StubBackend::tagged("local_llm");
        let cloud = StubBackend::tagged("cloud_llm");

        let recognizer_calls = recognizer.calls.clone();
        let rule_calls = rule.text_calls.clone();
        let local_calls = local.text_calls.clone();
        let cloud_text_calls = cloud.text_calls.clone();
        let cloud_vision_calls = cloud.vision_calls.clone();

        EngineHandles {
            engine: ExtractionEngine::new(
                Box::new(recognizer),
                Box::new(rule),
                Box::new(local),
                Box::new(cloud),
            ),
            recognizer_calls,
            rule_calls,
            local_calls,
            cloud_text_calls,
            cloud_vision_calls,
        }
    }

    fn image_doc(name: &str, bytes: &[u8]) -> Document {
        Document::new(name, "image/png", bytes.to_vec())
    }

    #[test]
    fn invalid_media_type_touches_no_collaborator() {
        let h = stub_engine();
        let doc = Document::new("notes.txt", "text/plain", b"hello".to_vec());

        let result = h.engine.process(
            &doc,
            ExtractionMode::OcrThenExtract,
            BackendKind::RuleBased,
        );

        assert!(matches!(result, Err(ExtractError::InvalidInput(_))));
        assert_eq!(h.recognizer_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.rule_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.cloud_vision_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn recognition_failure_short_circuits_backends() {
        let h = stub_engine_with_recognizer(StubRecognizer::failing());
        let doc = image_doc("scan.png", b"whatever");

        let result = h.engine.process(
            &doc,
            ExtractionMode::OcrThenExtract,
            BackendKind::LocalLlm,
        );

        assert!(matches!(result, Err(ExtractError::Ocr(_))));
        assert_eq!(h.recognizer_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.rule_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.local_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.cloud_text_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn vision_mode_skips_recognition_entirely() {
        let h = stub_engine();
        let doc = image_doc("handwritten.jpg", b"scribbles");

        let entities = h
            .engine
            .process(&doc, ExtractionMode::VisionOnly, BackendKind::CloudLlm)
            .unwrap();

        assert_eq!(entities.notes.as_deref(), Some("cloud_llm"));
        assert_eq!(h.recognizer_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.cloud_vision_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.cloud_text_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn text_path_dispatches_to_selected_backend() {
        for (backend, tag) in [
            (BackendKind::RuleBased, "rule_based"),
            (BackendKind::LocalLlm, "local_llm"),
            (BackendKind::CloudLlm, "cloud_llm"),
        ] {
            let h = stub_engine();
            let doc = image_doc("scan.png", b"Patient: John Doe");

            let entities = h
                .engine
                .process(&doc, ExtractionMode::OcrThenExtract, backend)
                .unwrap();

            assert_eq!(entities.notes.as_deref(), Some(tag), "backend {backend}");
            assert_eq!(h.recognizer_calls.load(Ordering::SeqCst), 1);
            let total_text_calls = h.rule_calls.load(Ordering::SeqCst)
                + h.local_calls.load(Ordering::SeqCst)
                + h.cloud_text_calls.load(Ordering::SeqCst);
            assert_eq!(total_text_calls, 1, "exactly one backend call");
            assert_eq!(h.cloud_vision_calls.load(Ordering::SeqCst), 0);
        }
    }

    #[test]
    fn backend_failure_is_terminal_not_retried() {
        let h = stub_engine();
        let doc = image_doc("scan.png", b"FAIL");

        let result = h.engine.process(
            &doc,
            ExtractionMode::OcrThenExtract,
            BackendKind::RuleBased,
        );

        assert!(matches!(result, Err(ExtractError::Backend(_))));
        assert_eq!(h.rule_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn identical_inputs_produce_identical_results() {
        let h = stub_engine();
        let doc = image_doc("scan.png", b"Patient: John Doe");

        let first = h
            .engine
            .process(&doc, ExtractionMode::OcrThenExtract, BackendKind::RuleBased)
            .unwrap();
        let second = h
            .engine
            .process(&doc, ExtractionMode::OcrThenExtract, BackendKind::RuleBased)
            .unwrap();

        assert_eq!(first, second);
    }
}
