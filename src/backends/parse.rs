//! Lenient parsing of LLM responses into clinical entities.
//!
//! Models are prompted for bare JSON but routinely wrap it in markdown
//! fences or surround it with prose. The parser strips fences when present,
//! falls back to the outermost brace pair otherwise, ignores unknown
//! fields, and drops malformed array items instead of failing the whole
//! document.

use serde::Deserialize;

use crate::pipeline::{ClinicalEntities, LabValueEntity, MedicationEntity};

use super::BackendError;

/// Parse a model response into entities.
pub fn parse_entities_response(response: &str) -> Result<ClinicalEntities, BackendError> {
    let json_str = extract_json_block(response)?;

    let value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| BackendError::ResponseParsing(e.to_string()))?;
    let obj = value
        .as_object()
        .ok_or_else(|| BackendError::MalformedResponse("top-level JSON is not an object".into()))?;

    Ok(ClinicalEntities {
        patient_name: string_field(obj, "patient_name"),
        date_of_birth: string_field(obj, "date_of_birth"),
        document_date: string_field(obj, "document_date"),
        diagnoses: string_array(obj, "diagnoses"),
        medications: parse_array_lenient::<MedicationEntity>(obj.get("medications")),
        lab_values: parse_array_lenient::<LabValueEntity>(obj.get("lab_values")),
        signs_symptoms: string_array(obj, "signs_symptoms"),
        procedures: string_array(obj, "procedures"),
        notes: string_field(obj, "notes"),
    })
}

/// Locate the JSON payload inside the raw response.
fn extract_json_block(response: &str) -> Result<&str, BackendError> {
    if let Some(fence_start) = response.find("```json") {
        let content_start = fence_start + 7;
        let fence_end = response[content_start..]
            .find("```")
            .ok_or_else(|| BackendError::MalformedResponse("unclosed JSON block".into()))?;
        return Ok(response[content_start..content_start + fence_end].trim());
    }

    let start = response
        .find('{')
        .ok_or_else(|| BackendError::MalformedResponse("no JSON object in response".into()))?;
    let end = response
        .rfind('}')
        .ok_or_else(|| BackendError::MalformedResponse("no JSON object in response".into()))?;
    if end < start {
        return Err(BackendError::MalformedResponse(
            "no JSON object in response".into(),
        ));
    }
    Ok(response[start..=end].trim())
}

fn string_field(obj: &serde_json::Map<String, serde_json::Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_array(obj: &serde_json::Map<String, serde_json::Value>, key: &str) -> Vec<String> {
    match obj.get(key).and_then(|v| v.as_array()) {
        None => vec![],
        Some(arr) => arr
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

/// Parse an array leniently — skip items that fail to deserialize.
fn parse_array_lenient<T: for<'de> Deserialize<'de>>(value: Option<&serde_json::Value>) -> Vec<T> {
    match value.and_then(|v| v.as_array()) {
        None => vec![],
        Some(arr) => arr
            .iter()
            .filter_map(|v| serde_json::from_value(v.clone()).ok())
            .collect(),
    }
}
