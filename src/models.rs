//! Core data types for the knowledge base.
//!
//! These shapes double as the wire format: [`Document`] is what the ingest
//! endpoint receives, [`ChunkRecord`] is both the in-memory unit and the
//! snapshot file's array element, and [`ScoredChunk`] is one retrieval
//! result row.

use serde::{Deserialize, Serialize};

/// Input document supplied by the harvesting collaborator.
///
/// `content` must already be flattened plain text; the core performs no
/// markup stripping of its own. `id` is an opaque identifier from the
/// source system and is not assumed unique across ingestions.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub content: String,
}

/// One embedded chunk, the persisted unit of the knowledge base.
///
/// Field names are the snapshot format: the store serializes a plain JSON
/// array of these records. `id` and `title` are copied from the source
/// document; `embedding` length is fixed by the embedding model in use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub id: String,
    pub title: String,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// A stored chunk scored against a query vector.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredChunk {
    pub id: String,
    pub title: String,
    pub text: String,
    pub score: f32,
}
