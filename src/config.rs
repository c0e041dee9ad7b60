//! Configuration for the evaluation harness.
//!
//! Supports both environment variables and a YAML config file.
//! Environment variables take precedence over config file values.

use crate::error::{RagEvalError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Which HTTP API the language models are served behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    /// Ollama's native `/api/generate` endpoint.
    Ollama,
    /// Any OpenAI-compatible `/v1/chat/completions` endpoint.
    OpenAi,
}

impl std::str::FromStr for LlmBackend {
    type Err = RagEvalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(LlmBackend::Ollama),
            "openai" | "open_ai" | "openai-compatible" => Ok(LlmBackend::OpenAi),
            other => Err(RagEvalError::Config(format!("Unknown LLM backend: {}", other))),
        }
    }
}

/// Which embedder turns chunks and questions into vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    /// Hashed bag-of-words vectors, always available.
    Hashing,
    /// all-MiniLM-L6-v2 through candle (`minilm` feature).
    MiniLm,
}

impl Default for EmbedderKind {
    fn default() -> Self {
        if cfg!(feature = "minilm") {
            EmbedderKind::MiniLm
        } else {
            EmbedderKind::Hashing
        }
    }
}

impl std::str::FromStr for EmbedderKind {
    type Err = RagEvalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "hashing" => Ok(EmbedderKind::Hashing),
            "minilm" => Ok(EmbedderKind::MiniLm),
            other => Err(RagEvalError::Config(format!("Unknown embedder: {}", other))),
        }
    }
}

/// LLM configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub backend: LlmBackend,

    /// Base URL for the LLM API (e.g., "http://localhost:11434")
    pub api_base: String,

    /// API key, only sent by the OpenAI-compatible backend
    pub api_key: String,

    /// Sampling temperature used for every answer
    pub temperature: f32,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum tokens for response (OpenAI-compatible backend only)
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: LlmBackend::Ollama,
            api_base: "http://localhost:11434".to_string(),
            api_key: String::new(),
            temperature: 0.7,
            timeout_secs: 120,
            max_tokens: 1024,
        }
    }
}

/// Chunking and retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Chunks retrieved per question
    pub top_k: usize,
    /// Words per chunk
    pub chunk_size: usize,
    /// Words shared by consecutive chunks
    pub chunk_overlap: usize,
    /// Name of the collection inside the vector store directory
    pub collection: String,
    pub embedder: EmbedderKind,
    /// Dimension of the hashed term vectors (hashing embedder only)
    pub embedding_dim: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            chunk_size: 300,
            chunk_overlap: 50,
            collection: "nus_docs".to_string(),
            embedder: EmbedderKind::default(),
            embedding_dim: 384,
        }
    }
}

/// Experiment inputs and outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Models compared in a run, in order
    pub models: Vec<String>,
    /// Audience named in the prompt preamble
    pub persona: String,
    pub docs_dir: PathBuf,
    pub db_path: PathBuf,
    pub questions_dir: PathBuf,
    pub results_dir: PathBuf,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            models: default_models(),
            persona: "NUS (National University of Singapore) students".to_string(),
            docs_dir: PathBuf::from("data/raw_docs"),
            db_path: PathBuf::from("data/vector_db"),
            questions_dir: PathBuf::from("questions"),
            results_dir: PathBuf::from("results"),
        }
    }
}

fn default_models() -> Vec<String> {
    ["qwen2.5:3b", "qwen2.5:1.5b", "llama3.2:3b", "phi3:mini", "deepseek-r1:1.5b"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Full application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub retrieval: RetrievalConfig,
    pub experiment: ExperimentConfig,
}

impl Config {
    /// Load configuration from environment variables and optional config file.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (LLM_API_BASE, RAG_MODELS, ...)
    /// 2. The explicit `path`, or ~/.config/rag-category-eval/config.yaml
    /// 3. Default values
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::config_file_path() {
                Some(default_path) if default_path.exists() => {
                    Self::load_from_file(&default_path)?
                }
                _ => Config::default(),
            },
        };

        config.apply_env()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RagEvalError::io(path, e))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| RagEvalError::Config(format!("Failed to parse config file: {}", e)))?;

        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(backend) = env::var("LLM_BACKEND") {
            self.llm.backend = backend.parse()?;
        }

        if let Ok(api_base) = env::var("LLM_API_BASE") {
            self.llm.api_base = api_base;
        }

        if let Ok(api_key) = env::var("LLM_API_KEY") {
            self.llm.api_key = api_key;
        }

        if let Some(temperature) = parse_env("LLM_TEMPERATURE") {
            self.llm.temperature = temperature;
        }

        if let Some(timeout) = parse_env("LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = timeout;
        }

        if let Some(max_tokens) = parse_env("LLM_MAX_TOKENS") {
            self.llm.max_tokens = max_tokens;
        }

        if let Ok(models) = env::var("RAG_MODELS") {
            self.experiment.models = parse_model_list(&models);
        }

        if let Some(top_k) = parse_env("RAG_TOP_K") {
            self.retrieval.top_k = top_k;
        }

        if let Ok(embedder) = env::var("RAG_EMBEDDER") {
            self.retrieval.embedder = embedder.parse()?;
        }

        if let Ok(db_path) = env::var("RAG_DB_PATH") {
            self.experiment.db_path = PathBuf::from(db_path);
        }

        Ok(())
    }

    /// Get the default config file path.
    pub fn config_file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "rag-category-eval")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Validate that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.llm.api_base.is_empty() {
            return Err(RagEvalError::InvalidConfig(
                "LLM API base URL is required. Set LLM_API_BASE environment variable or add to config file.".to_string(),
            ));
        }

        if self.experiment.models.is_empty() {
            return Err(RagEvalError::InvalidConfig(
                "At least one model is required. Set RAG_MODELS or experiment.models.".to_string(),
            ));
        }

        self.retrieval.validate()
    }
}

impl RetrievalConfig {
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(RagEvalError::InvalidConfig("top_k must be at least 1".to_string()));
        }

        if self.chunk_size == 0 {
            return Err(RagEvalError::InvalidConfig(
                "chunk_size must be at least 1".to_string(),
            ));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(RagEvalError::InvalidConfig(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        if self.embedder == EmbedderKind::MiniLm && !cfg!(feature = "minilm") {
            return Err(RagEvalError::InvalidConfig(
                "embedder 'minilm' needs a build with `--features minilm`".to_string(),
            ));
        }

        if self.embedding_dim == 0 {
            return Err(RagEvalError::InvalidConfig(
                "embedding_dim must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.parse().ok())
}

/// Split a comma-separated model list, dropping blanks.
pub fn parse_model_list(models: &str) -> Vec<String> {
    models
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.backend, LlmBackend::Ollama);
        assert_eq!(config.llm.api_base, "http://localhost:11434");
        assert_eq!(config.llm.temperature, 0.7);
        assert_eq!(config.llm.timeout_secs, 120);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.retrieval.chunk_size, 300);
        assert_eq!(config.retrieval.chunk_overlap, 50);
        assert_eq!(config.experiment.models.len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_chunking() {
        let mut config = Config::default();
        config.retrieval.chunk_overlap = config.retrieval.chunk_size;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.retrieval.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_models() {
        let mut config = Config::default();
        config.experiment.models.clear();
        assert!(matches!(config.validate(), Err(RagEvalError::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "llm:\n  backend: openai\n  api_base: https://api.example.com\nexperiment:\n  models: [gpt-4o-mini]\n",
        )
        .unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.llm.backend, LlmBackend::OpenAi);
        assert_eq!(config.llm.api_base, "https://api.example.com");
        assert_eq!(config.llm.timeout_secs, 120);
        assert_eq!(config.experiment.models, vec!["gpt-4o-mini"]);
        assert_eq!(config.retrieval.collection, "nus_docs");
    }

    #[test]
    fn test_invalid_file_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "llm: [not, a, map]").unwrap();
        assert!(matches!(
            Config::load_from_file(&path),
            Err(RagEvalError::Config(_))
        ));
    }

    #[test]
    fn test_parse_model_list() {
        assert_eq!(
            parse_model_list(" qwen2.5:3b, ,phi3:mini "),
            vec!["qwen2.5:3b", "phi3:mini"]
        );
    }

    #[test]
    fn test_embedder_default_follows_features() {
        let expected = if cfg!(feature = "minilm") {
            EmbedderKind::MiniLm
        } else {
            EmbedderKind::Hashing
        };
        assert_eq!(RetrievalConfig::default().embedder, expected);
        assert_eq!("MiniLM".parse::<EmbedderKind>().unwrap(), EmbedderKind::MiniLm);
        assert!("bert".parse::<EmbedderKind>().is_err());
    }

    #[cfg(not(feature = "minilm"))]
    #[test]
    fn test_validate_rejects_unavailable_embedder() {
        let mut config = Config::default();
        config.retrieval.embedder = EmbedderKind::MiniLm;
        assert!(matches!(config.validate(), Err(RagEvalError::InvalidConfig(_))));
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("Ollama".parse::<LlmBackend>().unwrap(), LlmBackend::Ollama);
        assert_eq!("openai".parse::<LlmBackend>().unwrap(), LlmBackend::OpenAi);
        assert!("bedrock".parse::<LlmBackend>().is_err());
    }
}
