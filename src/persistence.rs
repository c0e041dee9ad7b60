//! Persistence layer for vector store collections.
//!
//! A collection lives in `<db_path>/<collection>.json` (human-readable) or
//! `<db_path>/<collection>.bin` (bincode).

use crate::error::{RagEvalError, Result};
use crate::store::VectorStore;
use std::fs;
use std::path::{Path, PathBuf};

/// Save format for collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    /// JSON format (human-readable, larger).
    Json,
    /// Bincode format (binary, compact).
    Bincode,
}

impl SaveFormat {
    /// Determine format from file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("bin") | Some("bincode") => SaveFormat::Bincode,
            _ => SaveFormat::Json,
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            SaveFormat::Json => "json",
            SaveFormat::Bincode => "bin",
        }
    }
}

/// File holding `collection` under `db_path` in the given format.
pub fn collection_path(db_path: &Path, collection: &str, format: SaveFormat) -> PathBuf {
    db_path.join(format!("{}.{}", collection, format.extension()))
}

/// Locate an existing collection file, preferring JSON.
pub fn find_collection(db_path: &Path, collection: &str) -> Option<PathBuf> {
    [SaveFormat::Json, SaveFormat::Bincode]
        .into_iter()
        .map(|format| collection_path(db_path, collection, format))
        .find(|path| path.is_file())
}

/// Save a collection, replacing any previous version in either format.
pub fn save_store(store: &VectorStore, db_path: &Path, format: SaveFormat) -> Result<PathBuf> {
    if !db_path.exists() {
        fs::create_dir_all(db_path).map_err(|e| RagEvalError::io(db_path, e))?;
    }

    if let Some(old) = find_collection(db_path, &store.collection) {
        fs::remove_file(&old).map_err(|e| RagEvalError::io(&old, e))?;
        tracing::info!("Deleted old collection {}", old.display());
    }

    let path = collection_path(db_path, &store.collection, format);
    let data = match format {
        SaveFormat::Json => serde_json::to_string(store)
            .map_err(|e| RagEvalError::Serialization(e.to_string()))?
            .into_bytes(),
        SaveFormat::Bincode => {
            let config = bincode::config::standard();
            bincode::encode_to_vec(store, config)
                .map_err(|e| RagEvalError::Serialization(e.to_string()))?
        }
    };

    fs::write(&path, &data).map_err(|e| RagEvalError::io(&path, e))?;

    Ok(path)
}

/// Open a saved collection.
pub fn load_store(db_path: &Path, collection: &str) -> Result<VectorStore> {
    let path = find_collection(db_path, collection)
        .ok_or_else(|| RagEvalError::StoreNotFound(db_path.join(collection)))?;

    let data = fs::read(&path).map_err(|e| RagEvalError::io(&path, e))?;

    let store = match SaveFormat::from_path(&path) {
        SaveFormat::Json => serde_json::from_slice(&data)
            .map_err(|e| RagEvalError::Serialization(e.to_string()))?,
        SaveFormat::Bincode => {
            let config = bincode::config::standard();
            let (store, _): (VectorStore, usize) = bincode::decode_from_slice(&data, config)
                .map_err(|e| RagEvalError::Serialization(e.to_string()))?;
            store
        }
    };

    Ok(store)
}

/// Get the size of a collection file in bytes.
pub fn store_size(path: &Path) -> Result<u64> {
    let metadata = fs::metadata(path).map_err(|e| RagEvalError::io(path, e))?;
    Ok(metadata.len())
}
