//! `POST /extract` — one document in, one entity record out.

use axum::extract::{Multipart, State};
use axum::Json;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ExtractionFlags};
use crate::pipeline::{ClinicalEntities, Document};

use super::{apply_flag_field, read_document_field};

/// Accept an image or PDF plus backend-selection flags, extract entities.
///
/// The engine's collaborators block (OCR, HTTP clients), so the processing
/// runs on the blocking pool; the handler task stays free for other
/// requests.
pub async fn extract(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<ClinicalEntities>, ApiError> {
    let mut flags = ExtractionFlags::default();
    let mut document: Option<Document> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" {
            document = Some(read_document_field(field).await?);
        } else {
            let value = field.text().await?;
            if !apply_flag_field(&mut flags, &name, &value)? {
                tracing::debug!(field = %name, "ignoring unknown multipart field");
            }
        }
    }

    let doc = document.ok_or_else(|| ApiError::BadRequest("missing `file` field".into()))?;

    let request_id = Uuid::new_v4();
    let mode = flags.mode();
    let backend = flags.backend();
    tracing::info!(
        %request_id,
        filename = %doc.filename,
        media_type = %doc.media_type,
        mode = %mode,
        backend = %backend,
        "extraction request"
    );
    if flags.handwriting_degraded() {
        tracing::warn!(
            %request_id,
            filename = %doc.filename,
            "handwritten document routed through OCR: cloud backend not selected"
        );
    }

    let engine = ctx.engine.clone();
    let entities = tokio::task::spawn_blocking(move || engine.process(&doc, mode, backend))
        .await
        .map_err(|e| ApiError::Internal(format!("processing task failed: {e}")))?
        .map_err(ApiError::from)?;

    Ok(Json(entities))
}
