//! Model-backed session summarization.

use std::sync::Arc;

use async_trait::async_trait;
use songbird_memory::{MemoryError, Summarizer, Turn};
use tracing::debug;

use crate::client::ChatMessage;
use crate::config::ModelConfig;
use crate::model::LanguageModel;
use crate::prompt::{transcript, SUMMARIZER_SYSTEM_PROMPT};

/// Summarizes a closed session with a language model.
pub struct LlmSummarizer {
    model: Arc<dyn LanguageModel>,
    config: ModelConfig,
}

impl LlmSummarizer {
    /// Create a summarizer; use [`ModelConfig::summarizer`] for the usual settings.
    pub fn new(model: Arc<dyn LanguageModel>, config: ModelConfig) -> Self {
        Self { model, config }
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, turns: &[Turn]) -> songbird_memory::Result<String> {
        if turns.is_empty() {
            return Ok("No conversation recorded.".to_string());
        }

        let messages = vec![
            ChatMessage::system(SUMMARIZER_SYSTEM_PROMPT),
            ChatMessage::user(transcript(turns)),
        ];
        let summary = self
            .model
            .complete(&self.config, messages)
            .await
            .map_err(|e| MemoryError::SummarizationError(e.to_string()))?;

        debug!(turns = turns.len(), chars = summary.len(), "Summarized session");
        Ok(summary.trim().to_string())
    }
}
