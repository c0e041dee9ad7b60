//! Word-window chunking.

use crate::document::Document;
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Configuration for text chunking.
#[derive(Debug, Clone, Copy)]
pub struct ChunkConfig {
    /// Maximum words per chunk.
    pub chunk_size: usize,
    /// Words shared between consecutive chunks.
    pub chunk_overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 300,
            chunk_overlap: 50,
        }
    }
}

/// Where a chunk came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct ChunkMetadata {
    /// File name of the source document.
    pub source: String,
    /// Position of the chunk within its document.
    pub chunk_idx: usize,
    /// Full path of the source file, when it was loaded from disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// A chunk of text with a stable identifier.
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
pub struct Chunk {
    pub id: String,
    pub text: String,
    pub metadata: ChunkMetadata,
}

/// Split text into overlapping windows of whitespace-separated words.
///
/// Windows start every `chunk_size - chunk_overlap` words and hold up to
/// `chunk_size` words re-joined with single spaces, so the last windows may
/// be shorter (and fully contained in the previous one).
pub fn chunk_words(text: &str, config: &ChunkConfig) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let size = config.chunk_size.max(1);
    let step = size.saturating_sub(config.chunk_overlap).max(1);

    (0..words.len())
        .step_by(step)
        .map(|start| words[start..(start + size).min(words.len())].join(" "))
        .filter(|chunk| !chunk.is_empty())
        .collect()
}

/// Stable identifier for the `idx`-th chunk of `source`.
///
/// Only the file name is hashed, so same-named files in different
/// directories share ids; [`VectorStore::add`](crate::store::VectorStore::add)
/// reports such collisions.
pub fn chunk_id(source: &str, idx: usize) -> String {
    let digest = Sha256::digest(format!("{}_{}", source, idx).as_bytes());
    format!("{:x}", digest)[..32].to_string()
}

/// Chunk a document, attaching ids and metadata.
pub fn chunk_document(document: &Document, config: &ChunkConfig) -> Vec<Chunk> {
    chunk_words(&document.content, config)
        .into_iter()
        .enumerate()
        .map(|(idx, text)| Chunk {
            id: chunk_id(&document.name, idx),
            text,
            metadata: ChunkMetadata {
                source: document.name.clone(),
                chunk_idx: idx,
                path: document.path.as_ref().map(|p| p.display().to_string()),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_words(n: usize) -> String {
        (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_chunk_config_default() {
        let config = ChunkConfig::default();
        assert_eq!(config.chunk_size, 300);
        assert_eq!(config.chunk_overlap, 50);
    }

    #[test]
    fn test_windows_overlap() {
        let config = ChunkConfig {
            chunk_size: 4,
            chunk_overlap: 1,
        };
        let chunks = chunk_words(&numbered_words(7), &config);
        assert_eq!(chunks, ["w0 w1 w2 w3", "w3 w4 w5 w6", "w6"]);
    }

    #[test]
    fn test_whitespace_is_normalised() {
        let config = ChunkConfig {
            chunk_size: 10,
            chunk_overlap: 2,
        };
        let chunks = chunk_words("  Hall A\n\n has\ta gym  ", &config);
        assert_eq!(chunks, ["Hall A has a gym"]);
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        assert!(chunk_words("   ", &ChunkConfig::default()).is_empty());
    }

    #[test]
    fn test_chunk_id_is_stable_and_distinct() {
        assert_eq!(chunk_id("halls.md", 0), chunk_id("halls.md", 0));
        assert_ne!(chunk_id("halls.md", 0), chunk_id("halls.md", 1));
        assert_eq!(chunk_id("halls.md", 0).len(), 32);
    }

    #[test]
    fn test_chunk_document_metadata() {
        let doc = Document::from_text("halls.md", numbered_words(500));
        let chunks = chunk_document(&doc, &ChunkConfig::default());
        // Windows start at 0, 250
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].metadata.source, "halls.md");
        assert_eq!(chunks[1].metadata.chunk_idx, 1);
        assert_eq!(chunks[1].id, chunk_id("halls.md", 1));
        assert_eq!(chunks[1].metadata.path, None);
    }

    #[test]
    fn test_chunk_metadata_keeps_file_path() {
        let doc = Document {
            name: "info.txt".to_string(),
            path: Some("docs/halls/info.txt".into()),
            content: "Hall A has a gym".to_string(),
        };
        let chunks = chunk_document(&doc, &ChunkConfig::default());
        assert_eq!(chunks[0].metadata.source, "info.txt");
        assert_eq!(chunks[0].metadata.path.as_deref(), Some("docs/halls/info.txt"));
        assert_eq!(chunks[0].id, chunk_id("info.txt", 0));
    }
}
