//! OpenRouter API client for chat completions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::ModelConfig;
use crate::error::{AgentError, Result};
use crate::model::LanguageModel;

/// OpenRouter chat completions endpoint.
const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// OpenRouter API client for chat completions.
#[derive(Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: String,
}

impl OpenRouterClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Send a chat completion request.
    pub async fn chat(
        &self,
        config: &ModelConfig,
        messages: Vec<ChatMessage>,
    ) -> Result<ChatResponse> {
        let request = ChatRequest {
            model: config.model.clone(),
            messages,
            max_tokens: Some(config.max_tokens),
            temperature: Some(config.temperature),
        };

        trace!("Sending chat request: {:?}", request);

        let response = self
            .client
            .post(OPENROUTER_API_URL)
            .bearer_auth(&self.api_key)
            .header("X-Title", "Songbird")
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::ModelInvocation(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AgentError::ModelInvocation(format!(
                "OpenRouter API error {}: {}",
                status, text
            )));
        }

        let response: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::ResponseParse(format!("Failed to parse response: {}", e)))?;

        debug!(
            model = %config.model,
            tokens = response.usage.as_ref().map_or(0, |u| u.total_tokens),
            "Chat response received"
        );

        Ok(response)
    }
}

#[async_trait]
impl LanguageModel for OpenRouterClient {
    async fn complete(&self, config: &ModelConfig, messages: Vec<ChatMessage>) -> Result<String> {
        let response = self.chat(config, messages).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or_else(|| AgentError::ResponseParse("Response has no message content".into()))
    }
}

/// Chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier.
    pub model: String,

    /// Conversation messages.
    pub messages: Vec<ChatMessage>,

    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Temperature for generation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// A message in the chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender.
    pub role: String,

    /// Text content of the message.
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

/// Chat completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Completion choices.
    pub choices: Vec<ChatChoice>,

    /// Token usage information.
    pub usage: Option<ChatUsage>,
}

impl ChatResponse {
    /// Text content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

/// A completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// The generated message.
    pub message: ResponseMessage,

    /// Why generation stopped.
    pub finish_reason: Option<String>,
}

/// Message in a completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    /// Role of the sender (always "assistant").
    pub role: String,

    /// Text content.
    pub content: Option<String>,
}

/// Token usage statistics.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatUsage {
    /// Prompt tokens.
    pub prompt_tokens: u32,

    /// Completion tokens.
    pub completion_tokens: u32,

    /// Total tokens.
    pub total_tokens: u32,
}
