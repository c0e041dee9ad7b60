//! Source documents for the vector store.
//!
//! A corpus is every `.txt` and `.md` file below a directory. Each file is
//! one document; its file name becomes the `source` of every chunk cut from it.

use crate::error::{RagEvalError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extensions picked up when scanning a corpus directory.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md"];

/// A single text document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// File name including extension, e.g. `halls.md`.
    pub name: String,
    /// Original file path (if loaded from file).
    pub path: Option<PathBuf>,
    /// Full text content.
    pub content: String,
}

impl Document {
    /// Create a document from raw text content.
    pub fn from_text(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            content: content.into(),
        }
    }

    /// Load a text file as a document.
    pub fn from_text_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RagEvalError::io(path, e))?;

        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string();

        Ok(Self {
            name,
            path: Some(path.to_path_buf()),
            content,
        })
    }

    /// Whether the document has any non-whitespace content.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Approximate word count.
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

/// The documents found under a corpus directory.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub root: PathBuf,
    pub documents: Vec<Document>,
}

impl Corpus {
    /// Load every supported, non-blank file below `root`, sorted by path.
    ///
    /// A missing directory is created and yields an empty corpus. Files that
    /// cannot be read are logged and skipped.
    pub fn load(root: &Path) -> Result<Self> {
        if !root.exists() {
            tracing::warn!("Directory not found: {}, creating it", root.display());
            std::fs::create_dir_all(root).map_err(|e| RagEvalError::io(root, e))?;
            return Ok(Self {
                root: root.to_path_buf(),
                documents: Vec::new(),
            });
        }

        let mut paths: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| is_supported(path))
            .collect();
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            match Document::from_text_file(&path) {
                Ok(doc) if doc.is_blank() => {
                    tracing::debug!("Skipping empty document {}", path.display());
                }
                Ok(doc) => documents.push(doc),
                Err(e) => tracing::warn!("Error processing {}: {}", path.display(), e),
            }
        }

        Ok(Self {
            root: root.to_path_buf(),
            documents,
        })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}
