//! Knowledge base storage: in-memory records mirrored to a JSON snapshot.
//!
//! The store is an insertion-ordered sequence of [`ChunkRecord`]s behind a
//! read/write lock. Every mutation rewrites the snapshot file while the
//! write lock is still held, so the in-memory sequence and the file stay
//! consistent and concurrent mutations cannot interleave mid-rewrite.
//!
//! Loading is forgiving: a missing or unreadable snapshot starts the
//! store empty rather than failing startup. A snapshot write failure is
//! reported to the caller but does not roll back the in-memory change.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use anyhow::{Context, Result};

use crate::models::{ChunkRecord, ScoredChunk};
use crate::retrieval;

/// The persisted collection of embedded chunks backing retrieval.
pub struct KnowledgeBase {
    path: PathBuf,
    records: RwLock<Vec<ChunkRecord>>,
}

impl KnowledgeBase {
    /// Load the snapshot at `path`, or start empty if it is missing or
    /// unreadable. Called once at startup; never fatal.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let records = match read_snapshot(&path) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    snapshot = %path.display(),
                    error = %e,
                    "could not load snapshot, starting empty"
                );
                Vec::new()
            }
        };

        Self {
            path,
            records: RwLock::new(records),
        }
    }

    /// Path of the snapshot file backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored chunk records.
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A copy of the current record sequence, in insertion order.
    pub fn records(&self) -> Vec<ChunkRecord> {
        self.records.read().unwrap().clone()
    }

    /// Append one record and rewrite the snapshot.
    pub fn append(&self, record: ChunkRecord) -> Result<()> {
        self.extend(vec![record]).map(|_| ())
    }

    /// Append a batch of records and rewrite the snapshot once.
    ///
    /// Returns the number of records appended. On a snapshot write
    /// failure the records remain in memory and the error is returned.
    pub fn extend(&self, records: Vec<ChunkRecord>) -> Result<usize> {
        let added = records.len();
        let mut guard = self.records.write().unwrap();
        guard.extend(records);
        write_snapshot(&self.path, &guard)?;
        Ok(added)
    }

    /// Remove every record and rewrite the snapshot as an empty sequence.
    /// Idempotent.
    pub fn wipe(&self) -> Result<()> {
        let mut guard = self.records.write().unwrap();
        guard.clear();
        write_snapshot(&self.path, &guard)
    }

    /// Rank all stored records against `query`, returning the top `k`.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<ScoredChunk> {
        let guard = self.records.read().unwrap();
        retrieval::rank(&guard, query, k)
    }
}

fn read_snapshot(path: &Path) -> Result<Vec<ChunkRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let records = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
    Ok(records)
}

fn write_snapshot(path: &Path, records: &[ChunkRecord]) -> Result<()> {
    let content = serde_json::to_string_pretty(records)?;
    fs::write(path, content).with_context(|| format!("failed to write snapshot {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(id: &str, embedding: Vec<f32>) -> ChunkRecord {
        ChunkRecord {
            id: id.to_string(),
            title: format!("title-{}", id),
            text: format!("text of {}", id),
            embedding,
        }
    }

    #[test]
    fn missing_snapshot_starts_empty() {
        let tmp = TempDir::new().unwrap();
        let kb = KnowledgeBase::load(tmp.path().join("kb.json"));
        assert!(kb.is_empty());
    }

    #[test]
    fn corrupt_snapshot_starts_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("kb.json");
        fs::write(&path, "not json at all").unwrap();
        let kb = KnowledgeBase::load(&path);
        assert!(kb.is_empty());
    }

    #[test]
    fn extend_persists_and_reloads_identically() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("kb.json");

        let kb = KnowledgeBase::load(&path);
        let records = vec![
            record("a", vec![1.0, 0.0]),
            record("b", vec![0.0, 1.0]),
            record("c", vec![0.5, 0.5]),
        ];
        assert_eq!(kb.extend(records.clone()).unwrap(), 3);

        let reloaded = KnowledgeBase::load(&path);
        assert_eq!(reloaded.records(), records);
    }

    #[test]
    fn append_rewrites_snapshot() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("kb.json");

        let kb = KnowledgeBase::load(&path);
        kb.append(record("a", vec![1.0])).unwrap();
        kb.append(record("b", vec![2.0])).unwrap();

        let on_disk: Vec<ChunkRecord> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.len(), 2);
        assert_eq!(on_disk[0].id, "a");
        assert_eq!(on_disk[1].id, "b");
    }

    #[test]
    fn wipe_clears_memory_and_snapshot() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("kb.json");

        let kb = KnowledgeBase::load(&path);
        kb.extend(vec![record("a", vec![1.0])]).unwrap();
        kb.wipe().unwrap();
        assert!(kb.is_empty());

        let reloaded = KnowledgeBase::load(&path);
        assert!(reloaded.is_empty());

        // Wiping an already-empty store is a no-op, not an error.
        kb.wipe().unwrap();
        assert!(kb.is_empty());
    }

    #[test]
    fn search_ranks_stored_records() {
        let tmp = TempDir::new().unwrap();
        let kb = KnowledgeBase::load(tmp.path().join("kb.json"));
        kb.extend(vec![
            record("a", vec![1.0, 0.0]),
            record("b", vec![0.0, 1.0]),
            record("c", vec![0.9, 0.1]),
        ])
        .unwrap();

        let results = kb.search(&[1.0, 0.0], 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "a");
        assert_eq!(results[1].id, "c");
    }
}
