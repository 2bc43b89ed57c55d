//! The language model seam used by every agent role.

use async_trait::async_trait;

use crate::client::ChatMessage;
use crate::config::ModelConfig;
use crate::error::Result;

/// A chat-completion model.
///
/// Each role issues exactly one `complete` call per invocation and treats the
/// returned text as untrusted until it parses against the role's schema.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send `messages` and return the text of the first choice.
    async fn complete(&self, config: &ModelConfig, messages: Vec<ChatMessage>) -> Result<String>;
}
