//! LLM integration module.
//!
//! Provides the HTTP client used to generate answers (Ollama or any
//! OpenAI-compatible API) and the category-aware answer prompt.

mod client;
mod prompts;

pub use client::{Generator, LlmClient, Message, Role};
pub use prompts::PromptBuilder;
