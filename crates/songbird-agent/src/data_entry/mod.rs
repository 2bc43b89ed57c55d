//! Data entry worker: instruction in, tool result out.
//!
//! The worker asks its model to resolve the instruction's loose parameters
//! into intent fields, maps them onto a strict [`BookingRequest`] and calls
//! the matching gateway operation. It never produces guest-facing text.

pub mod mapping;

use std::sync::Arc;

use serde_json::{Map, Value};
use songbird_booking::{BookingRequest, GatewayError, Intent, ToolGateway, ToolResult};
use tracing::{debug, info};

use crate::action::{strip_code_fence, Instruction};
use crate::client::ChatMessage;
use crate::config::ModelConfig;
use crate::context::SessionContext;
use crate::error::{AgentError, Result};
use crate::model::LanguageModel;
use crate::prompt::{data_entry_system_prompt, transcript};

pub use mapping::{map_fields, parse_date, parse_party_size, parse_time, MissingFields};

/// Outcome of one delegation.
#[derive(Debug, Clone)]
pub struct Delegation {
    /// Intent of the instruction that was handled.
    pub intent: Intent,
    /// The request sent to the gateway.
    pub request: BookingRequest,
    /// Gateway result, unmodified.
    pub outcome: std::result::Result<ToolResult, GatewayError>,
}

impl Delegation {
    /// Tool result with gateway failures folded in as unsuccessful results.
    pub fn tool_result(&self) -> ToolResult {
        match &self.outcome {
            Ok(result) => result.clone(),
            Err(e) => ToolResult::failure(e.to_string()),
        }
    }

    /// JSON record of the request, for the data entry turn.
    pub fn record(&self) -> Value {
        serde_json::json!({
            "intent": self.intent.as_str(),
            "request": self.request.to_value(),
        })
    }
}

/// Maps instructions onto booking tool calls.
pub struct DataEntryWorker {
    model: Arc<dyn LanguageModel>,
    config: ModelConfig,
    gateway: ToolGateway,
}

impl DataEntryWorker {
    /// Create a worker.
    pub fn new(model: Arc<dyn LanguageModel>, config: ModelConfig, gateway: ToolGateway) -> Self {
        Self {
            model,
            config,
            gateway,
        }
    }

    /// Model configuration in use.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Resolve, validate and execute an instruction.
    ///
    /// # Errors
    /// `SchemaMapping` when the model output is unusable or required fields
    /// cannot be resolved. Gateway failures are not errors here; they are
    /// returned in [`Delegation::outcome`].
    pub async fn handle(
        &self,
        instruction: &Instruction,
        ctx: &SessionContext,
    ) -> Result<Delegation> {
        let request = self.build_request(instruction, ctx).await?;
        debug!(session_id = %ctx.session_id, intent = %instruction.intent, "Dispatching booking request");

        let outcome = self.gateway.dispatch(&request).await;
        info!(
            session_id = %ctx.session_id,
            intent = %instruction.intent,
            success = outcome.as_ref().map(|r| r.success).unwrap_or(false),
            "Booking tool call finished"
        );

        Ok(Delegation {
            intent: instruction.intent,
            request,
            outcome,
        })
    }

    /// Turn an instruction into a strict request without calling the gateway.
    pub async fn build_request(
        &self,
        instruction: &Instruction,
        ctx: &SessionContext,
    ) -> Result<BookingRequest> {
        let messages = self.messages(instruction, ctx);
        let raw = self.model.complete(&self.config, messages).await?;
        let fields = parse_fields(&raw, instruction.intent)?;

        // Values the model left out or garbled fall back to the receptionist's parameters.
        let sources = [&fields, &instruction.parameters];
        map_fields(instruction.intent, &sources, ctx.today).map_err(|missing| {
            AgentError::SchemaMapping {
                intent: instruction.intent.to_string(),
                reason: missing.to_string(),
                missing: missing.fields,
            }
        })
    }

    fn messages(&self, instruction: &Instruction, ctx: &SessionContext) -> Vec<ChatMessage> {
        let turns = ctx.recent.to_vec();
        let mut messages = vec![
            ChatMessage::system(data_entry_system_prompt(ctx.today)),
            ChatMessage::user(format!(
                "Conversation so far:\n{}\n\nReceptionist instruction:\n{}",
                transcript(&turns),
                instruction.to_value()
            )),
        ];
        if let Some(correction) = &ctx.correction {
            messages.push(ChatMessage::system(correction.clone()));
        }
        messages
    }
}

/// Parse `{"intent": ..., "fields": {...}}` and check it matches `expected`.
fn parse_fields(raw: &str, expected: Intent) -> Result<Map<String, Value>> {
    let unusable = |reason: String| AgentError::SchemaMapping {
        intent: expected.to_string(),
        missing: Vec::new(),
        reason,
    };

    let value: Value = serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| unusable(format!("output is not valid JSON: {e}")))?;
    let obj = value
        .as_object()
        .ok_or_else(|| unusable("output must be a JSON object".into()))?;
    if obj.len() != 2 || !obj.contains_key("intent") || !obj.contains_key("fields") {
        return Err(unusable("output must have exactly keys intent and fields".into()));
    }

    let intent = obj.get("intent").and_then(Value::as_str).unwrap_or_default();
    if intent != expected.as_str() {
        return Err(unusable(format!("output intent {intent:?} does not match {expected}")));
    }

    obj.get("fields")
        .and_then(Value::as_object)
        .cloned()
        .ok_or_else(|| unusable("fields must be an object".into()))
}
