//! Retrieval-augmented answering.

use crate::category::QuestionCategory;
use crate::embedding::Embedder;
use crate::error::{RagEvalError, Result};
use crate::llm::{Generator, PromptBuilder};
use crate::store::{RetrievedChunk, Retriever, VectorStore};
use serde::{Deserialize, Serialize};

/// The outcome of one RAG query.
///
/// A failed generation is recorded in `success`/`error` rather than returned
/// as an error, so one bad model response does not abort an experiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagAnswer {
    pub question: String,
    pub question_type: QuestionCategory,
    pub model: String,
    pub retrieved_docs: Vec<RetrievedChunk>,
    pub answer: String,
    pub success: bool,
    pub error: Option<String>,
}

/// Retrieves context from a vector store and asks a model to answer.
pub struct RagSystem<G> {
    store: VectorStore,
    embedder: Box<dyn Embedder>,
    generator: G,
    prompts: PromptBuilder,
    temperature: f32,
}

impl<G: Generator> RagSystem<G> {
    /// Fails with [`RagEvalError::EmptyStore`] when the store has no chunks,
    /// and with [`RagEvalError::Embedding`] when it was built by another embedder.
    pub fn new(
        store: VectorStore,
        embedder: Box<dyn Embedder>,
        generator: G,
        prompts: PromptBuilder,
        temperature: f32,
    ) -> Result<Self> {
        if store.is_empty() {
            return Err(RagEvalError::EmptyStore(store.collection.clone()));
        }
        store.check_embedder(embedder.as_ref())?;
        tracing::info!(
            "Loaded collection '{}' with {} chunks",
            store.collection,
            store.len()
        );

        Ok(Self {
            store,
            embedder,
            generator,
            prompts,
            temperature,
        })
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    /// Retrieve the `top_k` most relevant chunks for a query.
    pub fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedChunk>> {
        Retriever::new(&self.store, self.embedder.as_ref()).retrieve(query, top_k)
    }

    /// Build the prompt for a question and its retrieved context.
    pub fn build_prompt(
        &self,
        question: &str,
        docs: &[RetrievedChunk],
        category: QuestionCategory,
    ) -> String {
        self.prompts.build(question, docs, category)
    }

    /// Retrieve, prompt and generate.
    pub async fn query(
        &self,
        question: &str,
        model: &str,
        category: QuestionCategory,
        top_k: usize,
    ) -> Result<RagAnswer> {
        let retrieved_docs = self.retrieve(question, top_k)?;
        let prompt = self.build_prompt(question, &retrieved_docs, category);

        let (answer, success, error) = match self
            .generator
            .generate(model, &prompt, self.temperature)
            .await
        {
            Ok(answer) => (answer, true, None),
            Err(e) => (String::new(), false, Some(e.to_string())),
        };

        Ok(RagAnswer {
            question: question.to_string(),
            question_type: category,
            model: model.to_string(),
            retrieved_docs,
            answer,
            success,
            error,
        })
    }
}
