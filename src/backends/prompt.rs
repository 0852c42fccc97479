//! Prompt construction shared by the LLM backends.

pub const EXTRACTION_SYSTEM_PROMPT: &str = r#"
You are a medical document entity extractor. Your ONLY role is to pull
structured clinical entities out of the provided document content.

RULES — ABSOLUTE, NO EXCEPTIONS:
1. Extract ONLY information explicitly stated in the document.
2. NEVER add interpretation, diagnosis, advice, or clinical opinion.
3. NEVER infer information that is not directly written.
4. If a field is unclear or missing, output null for that field.
5. Preserve exact values (doses, lab values, dates) verbatim.
6. Output MUST be a single valid JSON object and nothing else.
"#;

/// The JSON shape both LLM backends are asked to produce.
const ENTITY_SCHEMA: &str = r#"{
  "patient_name": "full name or null",
  "date_of_birth": "as written or null",
  "document_date": "as written or null",
  "diagnoses": ["diagnosis"],
  "medications": [
    {"name": "drug name", "dose": "e.g. 10mg or null", "frequency": "e.g. twice daily or null", "route": "oral | topical | injection | null"}
  ],
  "lab_values": [
    {"test_name": "test", "value": "as written or null", "unit": "unit or null", "reference_range": "range or null"}
  ],
  "signs_symptoms": ["symptom"],
  "procedures": ["procedure"],
  "notes": "other clinically relevant text or null"
}"#;

/// Build the extraction prompt for recognized document text.
pub fn build_text_prompt(raw_text: &str) -> String {
    format!(
        r#"<document>
{raw_text}
</document>

Extract ALL clinical entities from the above document into this JSON structure.
For any field not present in the document, use null (or an empty array).

{ENTITY_SCHEMA}"#
    )
}

/// Prompt for the vision path: the document arrives as an image attachment
/// instead of text.
pub fn build_vision_prompt() -> String {
    format!(
        r#"Read the attached medical document image, including handwritten text.
Extract ALL clinical entities into this JSON structure. For any field not
present in the document, use null (or an empty array).

{ENTITY_SCHEMA}"#
    )
}
