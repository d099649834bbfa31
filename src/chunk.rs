//! Sliding-window text chunker.
//!
//! Splits document content into fixed-size windows of characters with a
//! configurable overlap between consecutive windows. Chunking is
//! deterministic: the same text and parameters always produce the same
//! chunk sequence.

use anyhow::{bail, Result};

/// Split `text` into overlapping windows of at most `size` characters.
///
/// Window `i` starts at `i * step` where `step = max(size - overlap, 1)`,
/// so every `overlap` value terminates, including `overlap >= size`.
/// Iteration stops once a window reaches the end of the text; no trailing
/// window wholly contained in the previous chunk's tail is emitted.
///
/// Windows are measured in characters, not bytes — multi-byte UTF-8
/// content never splits mid-character.
///
/// # Errors
///
/// Returns an error if `size` is zero.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Result<Vec<String>> {
    if size == 0 {
        bail!("chunk size must be at least 1");
    }

    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Ok(Vec::new());
    }

    let step = size.saturating_sub(overlap).max(1);
    let mut out = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + size).min(chars.len());
        out.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("", 100, 10).unwrap().is_empty());
    }

    #[test]
    fn short_text_yields_single_chunk() {
        let chunks = chunk_text("hello", 100, 10).unwrap();
        assert_eq!(chunks, vec!["hello".to_string()]);
    }

    #[test]
    fn overlapping_windows() {
        let chunks = chunk_text("abcdefghij", 4, 1).unwrap();
        assert_eq!(chunks, vec!["abcd", "defg", "ghij"]);
    }

    #[test]
    fn no_overlap_partitions_text() {
        let chunks = chunk_text("abcdef", 2, 0).unwrap();
        assert_eq!(chunks, vec!["ab", "cd", "ef"]);
    }

    #[test]
    fn consecutive_chunks_share_exactly_overlap_chars() {
        let chunks = chunk_text("abcdefghijkl", 5, 2).unwrap();
        assert_eq!(chunks, vec!["abcde", "defgh", "ghijk", "jkl"]);
        for pair in chunks.windows(2) {
            let tail: String = pair[0].chars().skip(pair[0].chars().count() - 2).collect();
            let head: String = pair[1].chars().take(2).collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn covers_whole_text_without_gaps() {
        let text = "abcdefghij";
        let overlap = 1;
        let chunks = chunk_text(text, 4, overlap).unwrap();
        let mut rebuilt: String = chunks[0].clone();
        for chunk in &chunks[1..] {
            rebuilt.extend(chunk.chars().skip(overlap));
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn terminates_when_overlap_equals_size() {
        let chunks = chunk_text("abcdef", 3, 3).unwrap();
        assert_eq!(chunks, vec!["abc", "bcd", "cde", "def"]);
    }

    #[test]
    fn terminates_when_overlap_exceeds_size() {
        let chunks = chunk_text("abcde", 2, 10).unwrap();
        assert_eq!(chunks, vec!["ab", "bc", "cd", "de"]);
    }

    #[test]
    fn zero_size_rejected() {
        assert!(chunk_text("abc", 0, 0).is_err());
    }

    #[test]
    fn step_count_stays_within_bound() {
        let text: String = std::iter::repeat('x').take(100).collect();
        let chunks = chunk_text(&text, 10, 3).unwrap();
        // ceil(100 / 7) = 15
        assert!(chunks.len() <= 15, "got {} chunks", chunks.len());
    }

    #[test]
    fn multibyte_text_splits_on_character_boundaries() {
        let chunks = chunk_text("héllo wörld ünïcode", 4, 1).unwrap();
        assert_eq!(chunks[0], "héll");
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 4);
        }
    }

    #[test]
    fn deterministic() {
        let text = "The dragon sleeps beneath the mountain.";
        assert_eq!(
            chunk_text(text, 10, 3).unwrap(),
            chunk_text(text, 10, 3).unwrap()
        );
    }
}
