//! Production text recognizer: Tesseract for images (behind the `ocr`
//! feature), embedded text layer for digital PDFs.
//!
//! Scanned PDFs without a text layer are rejected with `NoTextLayer` rather
//! than rasterized; callers are expected to submit page images instead.

use crate::pipeline::DocumentKind;

use super::{OcrError, TextRecognizer};

/// Recognizer dispatching on document kind.
pub struct DocumentRecognizer {
    #[cfg(feature = "ocr")]
    tessdata_dir: std::path::PathBuf,
    #[cfg(feature = "ocr")]
    lang: String,
}

#[cfg(feature = "ocr")]
impl DocumentRecognizer {
    /// Initialize with a tessdata directory. Fails early when the English
    /// traineddata is missing so a misconfigured deployment dies at startup,
    /// not on the first request.
    pub fn new(tessdata_dir: &std::path::Path) -> Result<Self, OcrError> {
        if !tessdata_dir.join("eng.traineddata").exists() {
            return Err(OcrError::TessdataNotFound(tessdata_dir.to_path_buf()));
        }
        Ok(Self {
            tessdata_dir: tessdata_dir.to_path_buf(),
            lang: "eng".to_string(),
        })
    }

    /// Set language(s) for OCR (e.g., "eng", "eng+fra").
    pub fn with_languages(mut self, langs: &str) -> Self {
        self.lang = langs.to_string();
        self
    }

    fn ocr_image(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
        let tessdata_str = self
            .tessdata_dir
            .to_str()
            .ok_or_else(|| OcrError::EngineInit("invalid tessdata path".into()))?;

        let tess = tesseract::Tesseract::new(Some(tessdata_str), Some(&self.lang))
            .map_err(|e| OcrError::EngineInit(format!("{e:?}")))?;

        let mut tess = tess
            .set_image_from_mem(image_bytes)
            .map_err(|e| OcrError::Processing(format!("{e:?}")))?;

        tess.get_text()
            .map_err(|e| OcrError::Processing(format!("{e:?}")))
    }
}

#[cfg(not(feature = "ocr"))]
impl DocumentRecognizer {
    pub fn new() -> Self {
        Self {}
    }
}

#[cfg(not(feature = "ocr"))]
impl Default for DocumentRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRecognizer for DocumentRecognizer {
    fn recognize(&self, bytes: &[u8], kind: DocumentKind) -> Result<String, OcrError> {
        match kind {
            DocumentKind::Pdf => pdf_text_layer(bytes),
            DocumentKind::Image => {
                // Validate the bytes decode as an image before handing them
                // to the engine; Tesseract's own failure modes are opaque.
                image::load_from_memory(bytes)
                    .map_err(|e| OcrError::ImageDecode(e.to_string()))?;

                #[cfg(feature = "ocr")]
                {
                    self.ocr_image(bytes)
                }
                #[cfg(not(feature = "ocr"))]
                {
                    Err(OcrError::EngineUnavailable)
                }
            }
        }
    }
}

/// Extract the embedded text layer of a digital PDF.
fn pdf_text_layer(pdf_bytes: &[u8]) -> Result<String, OcrError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
        .map_err(|e| OcrError::PdfParsing(e.to_string()))?;

    let text = pages.join("\n\n");
    if text.trim().is_empty() {
        return Err(OcrError::NoTextLayer);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Generate a valid PDF with text using lopdf (the library that
    /// pdf-extract uses internally).
    fn make_test_pdf(text: &str) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Stream};

        let mut doc = Document::with_version("1.4");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let content = format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

        let resources = dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        };

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources,
        });

        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        });

        if let Ok(page) = doc.get_object_mut(page_id) {
            if let lopdf::Object::Dictionary(ref mut dict) = page {
                dict.set("Parent", pages_id);
            }
        }

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    /// Minimal 1x1 PNG.
    #[cfg(not(feature = "ocr"))]
    fn tiny_png() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(1, 1, image::Rgb([255, 255, 255]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn pdf_text_layer_reads_digital_pdf() {
        let pdf = make_test_pdf("Diagnosis: Hypertension");
        let text = pdf_text_layer(&pdf).unwrap();
        assert!(text.contains("Hypertension"), "got: {text}");
    }

    #[test]
    fn pdf_without_text_layer_is_rejected() {
        let pdf = make_test_pdf("");
        let result = pdf_text_layer(&pdf);
        assert!(matches!(result, Err(OcrError::NoTextLayer)));
    }

    #[test]
    fn garbage_pdf_is_a_parse_error() {
        let result = pdf_text_layer(b"not a pdf at all");
        assert!(matches!(result, Err(OcrError::PdfParsing(_))));
    }

    #[cfg(not(feature = "ocr"))]
    #[test]
    fn image_ocr_unavailable_without_feature() {
        let recognizer = DocumentRecognizer::new();
        let result = recognizer.recognize(&tiny_png(), DocumentKind::Image);
        assert!(matches!(result, Err(OcrError::EngineUnavailable)));
    }

    #[cfg(not(feature = "ocr"))]
    #[test]
    fn undecodable_image_fails_before_engine_dispatch() {
        let recognizer = DocumentRecognizer::new();
        let result = recognizer.recognize(b"\xff\xd8 truncated", DocumentKind::Image);
        assert!(matches!(result, Err(OcrError::ImageDecode(_))));
    }

    #[cfg(not(feature = "ocr"))]
    #[test]
    fn pdf_recognition_works_without_ocr_feature() {
        let recognizer = DocumentRecognizer::new();
        let pdf = make_test_pdf("Prescription: Lisinopril 10mg");
        let text = recognizer.recognize(&pdf, DocumentKind::Pdf).unwrap();
        assert!(text.contains("Lisinopril"));
    }

    #[cfg(feature = "ocr")]
    #[test]
    fn recognizer_rejects_missing_tessdata() {
        let result = DocumentRecognizer::new(std::path::Path::new("/nonexistent/tessdata"));
        assert!(matches!(result, Err(OcrError::TessdataNotFound(_))));
    }

    #[cfg(feature = "ocr")]
    #[test]
    fn recognizer_initializes_with_system_tessdata() {
        let tessdata_dir = std::path::Path::new("/usr/share/tesseract-ocr/5/tessdata");
        if !tessdata_dir.exists() {
            return; // Skip on systems without Tesseract
        }
        let recognizer = DocumentRecognizer::new(tessdata_dir).unwrap();
        assert_eq!(recognizer.lang, "eng");
    }
}
