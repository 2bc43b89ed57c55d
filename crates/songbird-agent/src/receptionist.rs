//! The customer-facing receptionist role.

use std::sync::Arc;

use tracing::debug;

use crate::action::ReceptionistAction;
use crate::config::ModelConfig;
use crate::context::SessionContext;
use crate::error::Result;
use crate::model::LanguageModel;
use crate::prompt::{receptionist_messages, receptionist_system_prompt};

/// Converses with the guest and decides, each call, whether to reply or delegate.
///
/// Holds no conversation state; the context is supplied per call.
pub struct Receptionist {
    model: Arc<dyn LanguageModel>,
    config: ModelConfig,
    restaurant: String,
}

impl Receptionist {
    /// Create a receptionist for `restaurant`.
    pub fn new(
        model: Arc<dyn LanguageModel>,
        config: ModelConfig,
        restaurant: impl Into<String>,
    ) -> Self {
        Self {
            model,
            config,
            restaurant: restaurant.into(),
        }
    }

    /// Restaurant the receptionist speaks for.
    pub fn restaurant(&self) -> &str {
        &self.restaurant
    }

    /// Model configuration in use.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Produce exactly one action for `user_message`.
    ///
    /// # Errors
    /// `MalformedOutput` if the model's reply is not one of the two valid
    /// shapes; `ModelInvocation` if the model could not be reached.
    pub async fn respond(
        &self,
        user_message: &str,
        ctx: &SessionContext,
    ) -> Result<ReceptionistAction> {
        let system = receptionist_system_prompt(&self.restaurant, ctx.today);
        let messages = receptionist_messages(system, ctx, user_message);

        let raw = self.model.complete(&self.config, messages).await?;
        let action = ReceptionistAction::parse(&raw)?;
        debug!(session_id = %ctx.session_id, channel = %action.channel(), "Receptionist responded");
        Ok(action)
    }
}
