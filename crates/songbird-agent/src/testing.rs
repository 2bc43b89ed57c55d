//! Scripted language model for tests and offline demos.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::client::ChatMessage;
use crate::config::ModelConfig;
use crate::error::{AgentError, Result};
use crate::model::LanguageModel;

/// A model that replays queued responses and records every call.
#[derive(Default)]
pub struct ScriptedModel {
    responses: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<(ModelConfig, Vec<ChatMessage>)>>,
}

impl ScriptedModel {
    /// Queue `responses`, returned in order.
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(|r| Ok(r.into())).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue another response.
    pub async fn push(&self, response: impl Into<String>) {
        self.responses.lock().await.push_back(Ok(response.into()));
    }

    /// Queue a failed invocation.
    pub async fn push_error(&self, error: AgentError) {
        self.responses.lock().await.push_back(Err(error));
    }

    /// Calls made so far.
    pub async fn calls(&self) -> Vec<(ModelConfig, Vec<ChatMessage>)> {
        self.calls.lock().await.clone()
    }

    /// Number of responses not yet consumed.
    pub async fn remaining(&self) -> usize {
        self.responses.lock().await.len()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, config: &ModelConfig, messages: Vec<ChatMessage>) -> Result<String> {
        self.calls.lock().await.push((config.clone(), messages));
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::ModelInvocation("script exhausted".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order() {
        let model = ScriptedModel::new(["one", "two"]);
        let config = ModelConfig::default();
        assert_eq!(model.complete(&config, vec![]).await.unwrap(), "one");
        assert_eq!(model.complete(&config, vec![]).await.unwrap(), "two");
        assert!(model.complete(&config, vec![]).await.is_err());
        assert_eq!(model.calls().await.len(), 3);
    }
}
