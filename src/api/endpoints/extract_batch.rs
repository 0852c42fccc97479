//! `POST /extract_batch` — many documents in, an SSE stream of tagged
//! results out, one event per input file in input order.

use std::convert::Infallible;

use axum::extract::{Multipart, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::Stream;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ExtractionFlags};
use crate::pipeline::{Document, TaggedResult};

use super::{apply_flag_field, read_document_field};

/// Accept multiple files plus shared flags and stream one result per file.
///
/// The batch runs on the blocking pool feeding a capacity-1 channel, so
/// each result is handed to the transport as soon as it is produced —
/// the stream never buffers past the document currently being processed.
/// When the client disconnects the channel closes and production stops
/// after the current document.
pub async fn extract_batch(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let mut flags = ExtractionFlags::default();
    let mut docs: Vec<Document> = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        if name == "files" || name == "file" {
            docs.push(read_document_field(field).await?);
        } else {
            let value = field.text().await?;
            if !apply_flag_field(&mut flags, &name, &value)? {
                tracing::debug!(field = %name, "ignoring unknown multipart field");
            }
        }
    }

    if docs.is_empty() {
        return Err(ApiError::BadRequest("no files provided".into()));
    }

    let request_id = Uuid::new_v4();
    let mode = flags.mode();
    let backend = flags.backend();
    tracing::info!(
        %request_id,
        files = docs.len(),
        mode = %mode,
        backend = %backend,
        "batch extraction request"
    );
    if flags.handwriting_degraded() {
        tracing::warn!(
            %request_id,
            "handwritten batch routed through OCR: cloud backend not selected"
        );
    }

    let (tx, rx) = tokio::sync::mpsc::channel::<TaggedResult>(1);
    let engine = ctx.engine.clone();
    tokio::task::spawn_blocking(move || engine.process_batch(docs, mode, backend, tx));

    let stream = futures_util::stream::unfold(rx, |mut rx| async move {
        let item = rx.recv().await?;
        let event = match Event::default().json_data(&item) {
            Ok(event) => event,
            Err(err) => {
                tracing::error!(error = %err, filename = %item.filename, "result serialization failed");
                Event::default()
                    .data(r#"{"error":{"code":"INTERNAL","message":"result serialization failed"}}"#)
            }
        };
        Some((Ok(event), rx))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
