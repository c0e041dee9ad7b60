//! LLM client for Ollama and OpenAI-compatible endpoints.

use crate::config::{LlmBackend, LlmConfig};
use crate::error::{RagEvalError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Produces text from a prompt with a named model.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, model: &str, prompt: &str, temperature: f32) -> Result<String>;
}

/// Message role in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A message in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Request body for Ollama's generate endpoint.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    options: GenerateOptions,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Request body for chat completion.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

/// Response from chat completion.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// API error body; Ollama sends `{"error": "..."}`, OpenAI nests a message.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiError {
    Nested { error: ApiErrorDetail },
    Flat { error: String },
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl ApiError {
    fn message(&self) -> &str {
        match self {
            ApiError::Nested { error } => &error.message,
            ApiError::Flat { error } => error,
        }
    }
}

/// HTTP client for the configured LLM backend.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
}

impl LlmClient {
    /// Create a new LLM client with the given configuration.
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Get the API endpoint URL.
    fn endpoint(&self) -> String {
        let base = self.config.api_base.trim_end_matches('/');
        match self.config.backend {
            LlmBackend::Ollama => format!("{}/api/generate", base),
            LlmBackend::OpenAi => format!("{}/v1/chat/completions", base),
        }
    }

    async fn post<T: Serialize + ?Sized>(&self, body: &T) -> Result<String> {
        let mut request = self.client.post(self.endpoint()).json(body);
        if self.config.backend == LlmBackend::OpenAi && !self.config.api_key.is_empty() {
            request = request.header("Authorization", format!("Bearer {}", self.config.api_key));
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            if let Ok(api_error) = serde_json::from_str::<ApiError>(&body) {
                return Err(RagEvalError::LlmApi(format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    api_error.message()
                )));
            }
            return Err(RagEvalError::LlmApi(format!("HTTP {}", status.as_u16())));
        }

        Ok(body)
    }

    async fn generate_ollama(&self, model: &str, prompt: &str, temperature: f32) -> Result<String> {
        let body = self
            .post(&GenerateRequest {
                model,
                prompt,
                options: GenerateOptions { temperature },
                stream: false,
            })
            .await?;

        let parsed: GenerateResponse = serde_json::from_str(&body)?;
        Ok(parsed.response)
    }

    async fn generate_chat(&self, model: &str, prompt: &str, temperature: f32) -> Result<String> {
        let body = self
            .post(&ChatCompletionRequest {
                model,
                messages: vec![Message::user(prompt)],
                max_tokens: self.config.max_tokens,
                temperature,
            })
            .await?;

        let completion: ChatCompletionResponse = serde_json::from_str(&body)?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| RagEvalError::LlmApi("No choices in response".to_string()))
    }

    /// Test connectivity to the API with one model.
    pub async fn test_connection(&self, model: &str) -> Result<()> {
        let response = self
            .generate(model, "Say 'hello' and nothing else.", 0.0)
            .await?;

        if response.to_lowercase().contains("hello") {
            Ok(())
        } else {
            Err(RagEvalError::LlmApi(format!(
                "Unexpected response: {}",
                response
            )))
        }
    }
}

#[async_trait]
impl Generator for LlmClient {
    async fn generate(&self, model: &str, prompt: &str, temperature: f32) -> Result<String> {
        tracing::debug!(model, backend = ?self.config.backend, "sending generation request");
        match self.config.backend {
            LlmBackend::Ollama => self.generate_ollama(model, prompt, temperature).await,
            LlmBackend::OpenAi => self.generate_chat(model, prompt, temperature).await,
        }
    }
}
