//! Batch orchestration: strictly sequential per-document processing with
//! failure isolation and progressive emission.

use tokio::sync::mpsc;

use super::backend::BackendKind;
use super::mode::ExtractionMode;
use super::orchestrator::ExtractionEngine;
use super::types::{Document, TaggedResult};

impl ExtractionEngine {
    /// Process a batch in input order, emitting one filename-tagged result
    /// per document through `tx` as soon as it is produced.
    ///
    /// A document's failure becomes a tagged error record; it never aborts
    /// or reorders the remaining documents. Runs on a blocking thread — the
    /// sends are `blocking_send` against the async receiver feeding the
    /// transport. When the receiver is gone (client disconnected) the send
    /// fails and production stops after the current document; an in-flight
    /// collaborator call is never aborted mid-way.
    pub fn process_batch(
        &self,
        docs: Vec<Document>,
        mode: ExtractionMode,
        backend: BackendKind,
        tx: mpsc::Sender<TaggedResult>,
    ) {
        let total = docs.len();
        tracing::info!(total, mode = %mode, backend = %backend, "batch started");

        for (index, doc) in docs.into_iter().enumerate() {
            let item = match self.process(&doc, mode, backend) {
                Ok(entities) => TaggedResult::success(doc.filename, entities),
                Err(err) => {
                    tracing::warn!(
                        filename = %doc.filename,
                        error = %err,
                        "document failed in batch"
                    );
                    TaggedResult::failure(doc.filename, &err)
                }
            };

            if tx.blocking_send(item).is_err() {
                tracing::info!(
                    delivered = index,
                    total,
                    "batch receiver dropped, stopping"
                );
                return;
            }
        }

        tracing::info!(total, "batch complete");
    }
}
