//! Abstractions for generating text via an OpenAI-compatible completion service.
//!
//! The completion backend is optional; when no API key is configured the
//! summarization pipeline reports the missing credential instead of calling
//! out. The bundled client issues chat-completion requests directly over
//! HTTP rather than pulling in a full SDK.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::config::Config;

/// Errors surfaced while requesting a completion.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Request never produced a response.
    #[error("Completion request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Service answered with a non-success status.
    #[error("Completion service returned {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code from the service.
        status: StatusCode,
        /// Response body, useful for debugging.
        body: String,
    },
    /// Response could not be decoded into generated text.
    #[error("Malformed completion response: {0}")]
    InvalidResponse(String),
}

/// Interface implemented by completion backends.
///
/// A single call turns a system instruction plus a user prompt into generated
/// text; the summarization pipeline issues one call per fragment and one for
/// the final reduction.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate text for the given system instruction and user prompt.
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError>;
}

/// Build a completion client when the configuration carries an API key.
pub fn get_completion_client(config: &Config) -> Option<Box<dyn CompletionClient + Send + Sync>> {
    let api_key = config.openai_api_key.clone()?;
    Some(Box::new(OpenAiCompletionClient::new(
        config.openai_base_url.clone(),
        api_key,
        config.summary_model.clone(),
        config.summary_temperature,
    )))
}

struct OpenAiCompletionClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAiCompletionClient {
    fn new(base_url: String, api_key: String, model: String, temperature: f32) -> Self {
        let http = Client::builder()
            .user_agent("docsum/completion")
            .build()
            .expect("Failed to construct reqwest::Client for completions");
        Self {
            http,
            base_url,
            api_key,
            model,
            temperature,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "temperature": self.temperature,
        });

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::UnexpectedStatus { status, body });
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|error| {
            CompletionError::InvalidResponse(format!("failed to decode completion body: {error}"))
        })?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                CompletionError::InvalidResponse(
                    "completion contained no choices or empty content".into(),
                )
            })?;

        Ok(content.trim().to_string())
    }
}
