//! Exact nearest-neighbor retrieval.
//!
//! A full linear scan scores every stored record against the query vector
//! with cosine similarity. Records embedded under a different model (a
//! different dimensionality) are not comparable and are skipped without
//! error. The scan is exact and unindexed — at the corpus sizes this
//! store targets, a scan is cheaper than maintaining an index. Callers go
//! through [`KnowledgeBase::search`](crate::store::KnowledgeBase::search),
//! so an indexed backend could replace the scan without touching them.

use std::cmp::Ordering;

use crate::embedding::cosine_similarity;
use crate::models::{ChunkRecord, ScoredChunk};

/// Score `records` against `query` and return the top `k`, most similar
/// first. Ties keep insertion order (the sort is stable).
pub fn rank(records: &[ChunkRecord], query: &[f32], k: usize) -> Vec<ScoredChunk> {
    let mut scored: Vec<ScoredChunk> = records
        .iter()
        .filter(|r| r.embedding.len() == query.len())
        .map(|r| ScoredChunk {
            id: r.id.clone(),
            title: r.title.clone(),
            text: r.text.clone(),
            score: cosine_similarity(query, &r.embedding),
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, embedding: Vec<f32>) -> ChunkRecord {
        ChunkRecord {
            id: id.to_string(),
            title: String::new(),
            text: String::new(),
            embedding,
        }
    }

    #[test]
    fn ranks_by_cosine_similarity() {
        let records = vec![
            record("a", vec![1.0, 0.0]),
            record("b", vec![0.0, 1.0]),
            record("c", vec![0.9, 0.1]),
        ];

        let results = rank(&records, &[1.0, 0.0], 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "a");
        assert_eq!(results[1].id, "c");
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn excludes_mismatched_dimensions() {
        let records = vec![
            record("flat", vec![1.0, 0.0]),
            record("deep", vec![1.0, 0.0, 0.0]),
        ];

        let results = rank(&records, &[1.0, 0.0], 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "flat");
    }

    #[test]
    fn ties_keep_insertion_order() {
        let records = vec![
            record("first", vec![1.0, 0.0]),
            record("second", vec![1.0, 0.0]),
            record("third", vec![2.0, 0.0]),
        ];

        let results = rank(&records, &[1.0, 0.0], 3);
        // All three score 1.0 (cosine ignores magnitude).
        assert_eq!(results[0].id, "first");
        assert_eq!(results[1].id, "second");
        assert_eq!(results[2].id, "third");
    }

    #[test]
    fn k_larger_than_store_returns_all() {
        let records = vec![record("a", vec![1.0]), record("b", vec![0.5])];
        assert_eq!(rank(&records, &[1.0], 100).len(), 2);
    }

    #[test]
    fn k_zero_returns_nothing() {
        let records = vec![record("a", vec![1.0])];
        assert!(rank(&records, &[1.0], 0).is_empty());
    }

    #[test]
    fn empty_store_returns_nothing() {
        assert!(rank(&[], &[1.0, 0.0], 5).is_empty());
    }
}
