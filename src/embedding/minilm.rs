//! Local sentence-transformers embeddings using candle.

use super::Embedder;
use crate::error::{RagEvalError, Result};
use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use hf_hub::{Repo, RepoType, api::sync::Api};
use tokenizers::{Tokenizer, TruncationParams};

/// Hugging Face id of the default embedding model.
pub const MINILM_MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Word pieces kept per text; longer chunks are truncated like sentence-transformers does.
const MAX_SEQ_LEN: usize = 256;

fn hub_err(e: impl std::fmt::Display) -> RagEvalError {
    RagEvalError::Embedding(format!("model download failed: {}", e))
}

fn tokenizer_err(e: impl std::fmt::Display) -> RagEvalError {
    RagEvalError::Embedding(format!("tokenizer: {}", e))
}

/// Mean-pooled, L2-normalised BERT sentence embeddings.
pub struct MiniLmEmbedder {
    model_id: String,
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    dimension: usize,
}

impl MiniLmEmbedder {
    /// Load the all-MiniLM-L6-v2 model from Hugging Face Hub.
    pub fn load_minilm() -> Result<Self> {
        Self::load(MINILM_MODEL_ID)
    }

    /// Load a sentence-transformers BERT model by name.
    pub fn load(model_id: &str) -> Result<Self> {
        let device = Device::Cpu;

        let api = Api::new().map_err(hub_err)?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let config_path = repo.get("config.json").map_err(hub_err)?;
        let tokenizer_path = repo.get("tokenizer.json").map_err(hub_err)?;
        let weights_path = repo
            .get("model.safetensors")
            .or_else(|_| repo.get("pytorch_model.bin"))
            .map_err(hub_err)?;

        let raw_config = std::fs::read_to_string(&config_path)
            .map_err(|e| RagEvalError::io(&config_path, e))?;
        let config: BertConfig = serde_json::from_str(&raw_config)
            .map_err(|e| RagEvalError::Embedding(format!("invalid model config: {}", e)))?;
        let dimension = serde_json::from_str::<serde_json::Value>(&raw_config)
            .ok()
            .and_then(|v| v["hidden_size"].as_u64())
            .ok_or_else(|| RagEvalError::Embedding("model config has no hidden_size".to_string()))?
            as usize;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(tokenizer_err)?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQ_LEN,
                ..Default::default()
            }))
            .map_err(tokenizer_err)?;

        // SAFETY: the weights file is owned by the hub cache and not modified while mapped.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DTYPE, &device)? };
        let model = BertModel::load(vb, &config)?;

        tracing::debug!(model_id, dimension, "embedding model loaded");

        Ok(Self {
            model_id: model_id.to_string(),
            model,
            tokenizer,
            device,
            dimension,
        })
    }
}

impl Embedder for MiniLmEmbedder {
    fn name(&self) -> String {
        self.model_id.clone()
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(tokenizer_err)?;

        let max_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0);

        let mut input_ids = Vec::with_capacity(texts.len() * max_len);
        let mut attention_mask = Vec::with_capacity(texts.len() * max_len);

        for encoding in &encodings {
            let mut ids = encoding.get_ids().to_vec();
            let mut mask = encoding.get_attention_mask().to_vec();
            ids.resize(max_len, 0);
            mask.resize(max_len, 0);
            input_ids.extend(ids);
            attention_mask.extend(mask);
        }

        let shape = (texts.len(), max_len);
        let input_ids = Tensor::from_vec(input_ids, shape, &self.device)?;
        let attention_mask = Tensor::from_vec(attention_mask, shape, &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;

        let output = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        // Mean pooling over real tokens only
        let mask = attention_mask
            .unsqueeze(2)?
            .to_dtype(output.dtype())?
            .broadcast_as(output.shape())?;
        let summed = (output * &mask)?.sum(1)?;
        let counts = mask.sum(1)?.clamp(1e-9, f64::MAX)?;
        let pooled = (summed / counts)?;

        let norms = pooled.sqr()?.sum_keepdim(1)?.sqrt()?;
        let normalised = pooled.broadcast_div(&norms)?;

        Ok(normalised.to_vec2::<f32>()?)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
