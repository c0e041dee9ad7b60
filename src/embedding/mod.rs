//! Text embeddings for similarity search.
//!
//! With the `minilm` feature the default embedder is the
//! sentence-transformers all-MiniLM-L6-v2 model run locally through candle.
//! Without it, [`HashingEmbedder`] is the only embedder available.

#[cfg(feature = "minilm")]
mod minilm;

#[cfg(feature = "minilm")]
pub use minilm::MiniLmEmbedder;

use crate::config::{EmbedderKind, RetrievalConfig};
use crate::error::Result;

/// Turns text into fixed-size vectors.
pub trait Embedder: Send + Sync {
    /// Identifier persisted with a store; vectors from embedders with
    /// different names are not comparable.
    fn name(&self) -> String;

    /// Generate embeddings for a batch of texts.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Embedding dimension.
    fn dimension(&self) -> usize;

    /// Generate embedding for a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self
            .embed_batch(&[text])?
            .into_iter()
            .next()
            .unwrap_or_else(|| vec![0.0; self.dimension()]))
    }
}

/// Hashed bag-of-words embedding.
///
/// Lower-cased alphanumeric tokens are hashed (FNV-1a) into `dimension`
/// buckets; bucket weights are sublinear term frequencies and the vector is
/// L2-normalised. Deterministic across runs and platforms, so a persisted
/// store stays queryable.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut counts = vec![0u32; self.dimension];
        for token in tokenize(text) {
            let bucket = (fnv1a(token.as_bytes()) % self.dimension as u64) as usize;
            counts[bucket] += 1;
        }

        let mut vector: Vec<f32> = counts
            .into_iter()
            .map(|c| if c == 0 { 0.0 } else { 1.0 + (c as f32).ln() })
            .collect();

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

impl Embedder for HashingEmbedder {
    fn name(&self) -> String {
        format!("hashing-{}", self.dimension)
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, b| (hash ^ *b as u64).wrapping_mul(PRIME))
}

/// Create the embedder selected in the retrieval configuration.
pub fn load_embedder(config: &RetrievalConfig) -> Result<Box<dyn Embedder>> {
    match config.embedder {
        EmbedderKind::Hashing => Ok(Box::new(HashingEmbedder::new(config.embedding_dim))),
        #[cfg(feature = "minilm")]
        EmbedderKind::MiniLm => {
            tracing::info!("Loading embedding model {}", minilm::MINILM_MODEL_ID);
            Ok(Box::new(MiniLmEmbedder::load_minilm()?))
        }
        #[cfg(not(feature = "minilm"))]
        EmbedderKind::MiniLm => Err(crate::error::RagEvalError::InvalidConfig(
            "the minilm embedder needs a build with `--features minilm`".to_string(),
        )),
    }
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
