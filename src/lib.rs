//! RAG Category Eval - compare language models on a fixed question set.
//!
//! The harness indexes a folder of documents, retrieves context for each
//! question, asks every model under test to answer, and scores each answer
//! with rule-based heuristics tuned to four question archetypes: factual,
//! procedural, comparative and recommendation.
//!
//! # Quick Start
//!
//! ```no_run
//! use rag_category_eval::{
//!     config::Config,
//!     embedding::load_embedder,
//!     experiment::{ExperimentRunner, load_questions},
//!     llm::{LlmClient, PromptBuilder},
//!     persistence::load_store,
//!     rag::RagSystem,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(None)?;
//!     config.validate()?;
//!
//!     let store = load_store(&config.experiment.db_path, &config.retrieval.collection)?;
//!     let rag = RagSystem::new(
//!         store,
//!         load_embedder(&config.retrieval)?,
//!         LlmClient::new(config.llm.clone())?,
//!         PromptBuilder::new(config.experiment.persona.clone()),
//!         config.llm.temperature,
//!     )?;
//!
//!     let Some(questions) = load_questions(&config.experiment.questions_dir)? else {
//!         return Ok(());
//!     };
//!
//!     let results = ExperimentRunner::new(&rag, config.retrieval.top_k)
//!         .run(&config.experiment.models, &questions, None)
//!         .await?;
//!
//!     for (model, report) in &results.models {
//!         for (category, data) in report {
//!             println!("{model} {category}: {:.3}", data.average_score);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **Evaluator**: per-category heuristic scorers (the core of the crate)
//! - **Document / Chunker / VectorStore**: word-window chunks in a persisted similarity index
//! - **Embedder**: MiniLM sentence embeddings (`minilm` feature) or hashed term vectors
//! - **LlmClient**: Ollama or OpenAI-compatible generation
//! - **RagSystem**: retrieve, prompt, generate
//! - **ExperimentRunner**: every model over every question, with JSON reports

pub mod category;
pub mod chunker;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod evaluator;
pub mod experiment;
pub mod llm;
pub mod persistence;
pub mod rag;
pub mod store;

// Re-export commonly used types
pub use category::QuestionCategory;
pub use config::Config;
pub use error::{RagEvalError, Result};
pub use evaluator::{EvaluationResult, Evaluator, Scorer, evaluate};
pub use llm::{Generator, LlmClient};
pub use rag::{RagAnswer, RagSystem};
pub use store::{RetrievedChunk, Retriever, VectorStore};
