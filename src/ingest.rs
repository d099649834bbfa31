//! Ingestion pipeline: documents in, embedded chunk records out.
//!
//! Ingestion is best-effort per chunk: an embedding failure skips that
//! chunk (logged and counted) and never aborts the batch. Embeddings for
//! the whole batch are computed before the store is touched, so the store
//! lock is never held across network I/O and the snapshot is rewritten
//! once per batch.

use anyhow::Result;

use crate::chunk::chunk_text;
use crate::embedding::EmbeddingClient;
use crate::models::{ChunkRecord, Document};
use crate::store::KnowledgeBase;

/// Outcome of one chunk's trip through the embedding client.
enum ChunkOutcome {
    Embedded(ChunkRecord),
    Skipped { reason: String },
}

/// Result of an ingestion batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    /// Chunks embedded and stored.
    pub added: usize,
    /// Documents submitted — not documents that yielded chunks.
    pub docs: usize,
    /// Chunks skipped because embedding failed.
    pub skipped: usize,
}

/// Chunk and embed `docs`, appending every successful record to `store`.
///
/// Documents are processed in order, one embedding call at a time. A
/// document with empty or whitespace-only content contributes zero
/// chunks. The call itself fails only outside per-chunk embedding: on an
/// invalid chunk size (before any store mutation) or on a snapshot write
/// failure.
pub async fn ingest_documents(
    store: &KnowledgeBase,
    embedder: &EmbeddingClient,
    docs: &[Document],
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<IngestSummary> {
    let mut outcomes = Vec::new();

    for doc in docs {
        if doc.content.trim().is_empty() {
            continue;
        }

        for chunk in chunk_text(&doc.content, chunk_size, chunk_overlap)? {
            let outcome = match embedder.embed(&chunk).await {
                Ok(embedding) => ChunkOutcome::Embedded(ChunkRecord {
                    id: doc.id.clone(),
                    title: doc.title.clone(),
                    text: chunk,
                    embedding,
                }),
                Err(e) => ChunkOutcome::Skipped {
                    reason: e.to_string(),
                },
            };
            outcomes.push(outcome);
        }
    }

    let mut records = Vec::new();
    let mut skipped = 0;
    for outcome in outcomes {
        match outcome {
            ChunkOutcome::Embedded(record) => records.push(record),
            ChunkOutcome::Skipped { reason } => {
                tracing::warn!(%reason, "skipping chunk, embedding failed");
                skipped += 1;
            }
        }
    }

    let added = store.extend(records)?;

    Ok(IngestSummary {
        added,
        docs: docs.len(),
        skipped,
    })
}
