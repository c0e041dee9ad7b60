//! Prompt construction for category-aware RAG answers.

use crate::category::QuestionCategory;
use crate::store::RetrievedChunk;

/// Builds the answer prompt sent to every model.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    persona: String,
}

impl PromptBuilder {
    /// `persona` names the audience, e.g. "NUS (National University of Singapore) students".
    pub fn new(persona: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
        }
    }

    /// Number and join retrieved chunks into the context block.
    pub fn context(docs: &[RetrievedChunk]) -> String {
        docs.iter()
            .enumerate()
            .map(|(i, doc)| format!("[Document {}]\n{}", i + 1, doc.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn build(
        &self,
        question: &str,
        docs: &[RetrievedChunk],
        category: QuestionCategory,
    ) -> String {
        format!(
            r#"You are a helpful assistant for {persona}.

Context:
{context}

Question: {question}

Instructions: {instruction}

Answer:"#,
            persona = self.persona,
            context = Self::context(docs),
            question = question,
            instruction = category.instruction(),
        )
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new("NUS (National University of Singapore) students")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunker::ChunkMetadata;

    fn doc(content: &str) -> RetrievedChunk {
        RetrievedChunk {
            content: content.to_string(),
            metadata: ChunkMetadata {
                source: "a.txt".to_string(),
                chunk_idx: 0,
                path: None,
            },
            distance: Some(0.1),
        }
    }

    #[test]
    fn test_context_numbers_documents() {
        let context = PromptBuilder::context(&[doc("first chunk"), doc("second chunk")]);
        assert_eq!(context, "[Document 1]\nfirst chunk\n\n[Document 2]\nsecond chunk");
    }

    #[test]
    fn test_prompt_contains_category_instruction() {
        let prompt = PromptBuilder::default().build(
            "How do I book a study room?",
            &[doc("Rooms are booked online.")],
            QuestionCategory::Procedural,
        );

        assert!(prompt.starts_with(
            "You are a helpful assistant for NUS (National University of Singapore) students."
        ));
        assert!(prompt.contains("Question: How do I book a study room?"));
        assert!(prompt.contains("Instructions: Provide a step-by-step guide."));
        assert!(prompt.ends_with("Answer:"));
    }

    #[test]
    fn test_prompt_without_context() {
        let prompt = PromptBuilder::new("visitors").build("Where?", &[], QuestionCategory::Factual);
        assert!(prompt.contains("Context:\n\n\nQuestion: Where?"));
    }
}
