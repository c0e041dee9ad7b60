//! Error types for the evaluation harness.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our custom error.
pub type Result<T> = std::result::Result<T, RagEvalError>;

/// Errors that can occur while indexing, querying or scoring.
#[derive(Error, Debug)]
pub enum RagEvalError {
    /// Error reading or writing files.
    #[error("I/O error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error during serialization/deserialization.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The question category is not one of the four known archetypes.
    #[error("Unknown question type: {0}")]
    InvalidCategory(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// LLM API error.
    #[error("LLM API error: {0}")]
    LlmApi(String),

    /// LLM response parsing error.
    #[error("Failed to parse LLM response: {0}")]
    LlmParse(String),

    /// HTTP request error.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The vector store has not been built yet.
    #[error("Vector store not found at '{0}'. Run the build command first")]
    StoreNotFound(PathBuf),

    /// The vector store exists but holds no chunks.
    #[error("Vector store '{0}' contains no chunks")]
    EmptyStore(String),

    /// Embedding dimension mismatch or similar embedding failure.
    #[error("Embedding error: {0}")]
    Embedding(String),
}

impl RagEvalError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for RagEvalError {
    fn from(err: reqwest::Error) -> Self {
        RagEvalError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for RagEvalError {
    fn from(err: serde_json::Error) -> Self {
        RagEvalError::LlmParse(err.to_string())
    }
}

#[cfg(feature = "minilm")]
impl From<candle_core::Error> for RagEvalError {
    fn from(err: candle_core::Error) -> Self {
        RagEvalError::Embedding(err.to_string())
    }
}
