pub mod extract;
pub mod extract_batch;
pub mod health;

use axum::extract::multipart::Field;

use crate::api::error::ApiError;
use crate::api::types::ExtractionFlags;
use crate::pipeline::Document;

/// Read one multipart file field into a `Document`. The declared content
/// type wins; when the client sent none, it is guessed from the filename.
pub(crate) async fn read_document_field(field: Field<'_>) -> Result<Document, ApiError> {
    let filename = field.file_name().unwrap_or("document").to_string();
    let media_type = match field.content_type() {
        Some(ct) => ct.to_string(),
        None => mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .to_string(),
    };
    let bytes = field.bytes().await?;
    Ok(Document::new(filename, media_type, bytes.to_vec()))
}

/// Apply one boolean form field onto the flags. Unknown names are left to
/// the caller; values accept the usual textual booleans.
pub(crate) fn apply_flag_field(
    flags: &mut ExtractionFlags,
    name: &str,
    value: &str,
) -> Result<bool, ApiError> {
    let parsed = match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => true,
        "false" | "0" | "off" | "no" | "" => false,
        other => {
            return Err(ApiError::BadRequest(format!(
                "field `{name}` must be a boolean, got `{other}`"
            )))
        }
    };
    match name {
        "use_cloud_llm" => flags.use_cloud_llm = parsed,
        "use_local_llm" => flags.use_local_llm = parsed,
        "is_handwritten" => flags.is_handwritten = parsed,
        _ => return Ok(false),
    }
    Ok(true)
}
