//! Conversation orchestrator: routes each turn between the guest, the
//! receptionist and the data entry worker, and records it in memory.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, trace, warn};

use songbird_agent::{
    AgentError, DataEntryWorker, Delegation, Instruction, Receptionist, ReceptionistAction,
    SessionContext,
};
use songbird_booking::ToolResult;
use songbird_memory::{
    ContextBound, MemoryError, MemoryStore, Rehydration, Summarizer, Summary,
    TranscriptSummarizer, Turn,
};

use crate::error::Result;
use crate::policy::RetryPolicy;
use crate::state::TurnState;

/// Recent-context window used for every prompt.
pub const DEFAULT_CONTEXT_BOUND: ContextBound = ContextBound::Turns(20);

/// Messages that end the conversation.
pub const DONE_SIGNALS: [&str; 5] = ["done", "bye", "goodbye", "that's all", "end"];

/// Whether `message` is an explicit request to end the conversation.
pub fn is_done_signal(message: &str) -> bool {
    let normalized = message
        .trim()
        .trim_end_matches(['.', '!'])
        .trim()
        .to_lowercase()
        .replace('\u{2019}', "'");
    DONE_SIGNALS.contains(&normalized.as_str())
}

/// What the guest sees after one turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnReply {
    /// Text for the guest.
    pub message: String,
    /// Whether the session was closed by this turn.
    pub closed: bool,
    /// Whether the message is the generic apology.
    pub apologized: bool,
    /// Tool result produced during the turn, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_result: Option<ToolResult>,
    /// Summary stored when the session closed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
}

impl TurnReply {
    fn reply(message: impl Into<String>, tool_result: Option<ToolResult>) -> Self {
        Self {
            message: message.into(),
            closed: false,
            apologized: false,
            tool_result,
            summary: None,
        }
    }
}

/// Tracks the state machine of one turn.
struct TurnTracker<'a> {
    session_id: &'a str,
    state: TurnState,
}

impl<'a> TurnTracker<'a> {
    fn new(session_id: &'a str) -> Self {
        Self {
            session_id,
            state: TurnState::AwaitingUser,
        }
    }

    fn advance(&mut self, next: TurnState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal turn transition {} -> {}",
            self.state,
            next
        );
        trace!(session_id = %self.session_id, from = %self.state, to = %next, "Turn state");
        self.state = next;
    }
}

/// Coordinates the receptionist, the data entry worker and the memory store.
///
/// Turns of one session are processed strictly one at a time; turns of
/// different sessions run concurrently.
pub struct Orchestrator {
    memory: Arc<dyn MemoryStore>,
    receptionist: Receptionist,
    data_entry: DataEntryWorker,
    summarizer: Arc<dyn Summarizer>,
    policy: RetryPolicy,
    context_bound: ContextBound,
    today: Option<NaiveDate>,
    gates: RwLock<HashMap<String, Arc<Mutex<()>>>>,
}

impl Orchestrator {
    /// Create an orchestrator with the default retry policy and context window.
    pub fn new(
        memory: Arc<dyn MemoryStore>,
        receptionist: Receptionist,
        data_entry: DataEntryWorker,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            memory,
            receptionist,
            data_entry,
            summarizer,
            policy: RetryPolicy::default(),
            context_bound: DEFAULT_CONTEXT_BOUND,
            today: None,
            gates: RwLock::new(HashMap::new()),
        }
    }

    /// Set the retry policy for schema-level failures.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the recent-context window.
    pub fn with_context_bound(mut self, bound: ContextBound) -> Self {
        self.context_bound = bound;
        self
    }

    /// Pin the date used to resolve relative dates.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// The memory store.
    pub fn memory(&self) -> &Arc<dyn MemoryStore> {
        &self.memory
    }

    /// The retry policy in use.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Restaurant the receptionist speaks for.
    pub fn restaurant(&self) -> &str {
        self.receptionist.restaurant()
    }

    fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    async fn gate(&self, session_id: &str) -> Arc<Mutex<()>> {
        if let Some(gate) = self.gates.read().await.get(session_id) {
            return gate.clone();
        }
        self.gates
            .write()
            .await
            .entry(session_id.to_string())
            .or_default()
            .clone()
    }

    /// Drop the gate of a closed session unless another turn holds or waits on it.
    ///
    /// `gate` is the caller's handle; with the map entry that makes two references.
    async fn release_gate(&self, session_id: &str, gate: &Arc<Mutex<()>>) {
        let mut gates = self.gates.write().await;
        let unshared = Arc::strong_count(gate) <= 2;
        if unshared && gates.get(session_id).is_some_and(|held| Arc::ptr_eq(held, gate)) {
            gates.remove(session_id);
            debug!(session_id = %session_id, "Released session gate");
        }
    }

    /// Open (or re-open) a session and greet the guest.
    ///
    /// Returning guests are greeted with the summary of their last visit.
    pub async fn start(&self, session_id: &str) -> Result<String> {
        let gate = self.gate(session_id).await;
        let _turn = gate.lock().await;

        self.memory.open_session(session_id).await?;
        let session = self.memory.session(session_id).await?;

        let greeting = match self.memory.last_summary(session_id).await? {
            Some(summary) => format!(
                "Welcome back! Last time: \"{}\". How can I help you today?",
                summary.text
            ),
            None => format!(
                "Welcome to {}! How can I help you today?",
                self.receptionist.restaurant()
            ),
        };

        if session.turns().is_empty() {
            self.memory
                .append(session_id, Turn::receptionist_reply(greeting.clone()))
                .await?;
        }
        info!(session_id = %session_id, "Session started");
        Ok(greeting)
    }

    /// Process one guest message and return the reply.
    ///
    /// A closed session is re-opened. A done signal closes the session.
    ///
    /// # Errors
    /// Only memory contract errors. Agent and tool failures are recovered
    /// within the turn.
    pub async fn handle_message(&self, session_id: &str, message: &str) -> Result<TurnReply> {
        let gate = self.gate(session_id).await;
        let _turn = gate.lock().await;

        self.memory.open_session(session_id).await?;
        self.memory.append(session_id, Turn::user(message)).await?;
        debug!(session_id = %session_id, len = message.len(), "Guest message recorded");

        if is_done_signal(message) {
            let farewell = format!(
                "Thank you for choosing {}. Goodbye!",
                self.receptionist.restaurant()
            );
            self.memory
                .append(session_id, Turn::receptionist_reply(farewell.clone()))
                .await?;
            let summary = self.close(session_id).await?;
            self.release_gate(session_id, &gate).await;
            return Ok(TurnReply {
                closed: true,
                summary: Some(summary),
                ..TurnReply::reply(farewell, None)
            });
        }

        let mut tracker = TurnTracker::new(session_id);
        tracker.advance(TurnState::ReceptionistThinking);

        let instruction = match self.receptionist_step(session_id, message, None).await? {
            Some(ReceptionistAction::ToUser { message: reply }) => {
                tracker.advance(TurnState::UserReply);
                self.memory
                    .append(session_id, Turn::receptionist_reply(reply.clone()))
                    .await?;
                tracker.advance(TurnState::AwaitingUser);
                return Ok(TurnReply::reply(reply, None));
            }
            Some(ReceptionistAction::ToDataEntry { instruction }) => instruction,
            None => return self.apologize(&mut tracker, None).await,
        };

        tracker.advance(TurnState::DelegatingToDataEntry);
        self.memory
            .append(
                session_id,
                Turn::receptionist_instruction(instruction.to_value()),
            )
            .await?;

        let Some(delegation) = self.data_entry_step(session_id, &instruction).await? else {
            return self.apologize(&mut tracker, None).await;
        };

        tracker.advance(TurnState::ToolExecuting);
        let tool_result = delegation.tool_result();
        self.memory
            .append(session_id, Turn::data_entry(delegation.record()))
            .await?;
        self.memory
            .append(session_id, Turn::tool(tool_result.to_value()))
            .await?;

        tracker.advance(TurnState::ReceptionistThinking);
        match self
            .receptionist_step(session_id, message, Some(&tool_result))
            .await?
        {
            Some(ReceptionistAction::ToUser { message: reply }) => {
                tracker.advance(TurnState::UserReply);
                self.memory
                    .append(session_id, Turn::receptionist_reply(reply.clone()))
                    .await?;
                tracker.advance(TurnState::AwaitingUser);
                Ok(TurnReply::reply(reply, Some(tool_result)))
            }
            _ => self.apologize(&mut tracker, Some(tool_result)).await,
        }
    }

    /// Close a session and return its summary.
    ///
    /// # Errors
    /// `UnknownSession` or `AlreadyClosed` from the memory store.
    pub async fn end_session(&self, session_id: &str) -> Result<Summary> {
        let gate = self.gate(session_id).await;
        let _turn = gate.lock().await;
        let summary = self.close(session_id).await?;
        self.release_gate(session_id, &gate).await;
        Ok(summary)
    }

    /// Summary or recent turns for a returning guest.
    pub async fn rehydrate(&self, session_id: &str) -> Result<Rehydration> {
        Ok(self.memory.rehydrate(session_id).await?)
    }

    async fn close(&self, session_id: &str) -> Result<Summary> {
        match self
            .memory
            .close_session(session_id, self.summarizer.as_ref())
            .await
        {
            Err(MemoryError::SummarizationError(reason)) => {
                warn!(
                    session_id = %session_id,
                    error = %reason,
                    "Summarizer failed, using transcript summary"
                );
                Ok(self
                    .memory
                    .close_session(session_id, &TranscriptSummarizer)
                    .await?)
            }
            other => Ok(other?),
        }
    }

    async fn context(&self, session_id: &str) -> Result<SessionContext> {
        let recent = self
            .memory
            .recent_context(session_id, self.context_bound)
            .await?;
        let summary = self
            .memory
            .last_summary(session_id)
            .await?
            .map(|s| s.text);
        Ok(SessionContext::new(session_id, recent, self.today()).with_summary(summary))
    }

    async fn apologize(
        &self,
        tracker: &mut TurnTracker<'_>,
        tool_result: Option<ToolResult>,
    ) -> Result<TurnReply> {
        tracker.advance(TurnState::UserReply);
        let apology = self.policy.apology.clone();
        self.memory
            .append(tracker.session_id, Turn::receptionist_reply(apology.clone()))
            .await?;
        tracker.advance(TurnState::AwaitingUser);
        Ok(TurnReply {
            apologized: true,
            ..TurnReply::reply(apology, tool_result)
        })
    }

    /// Ask the receptionist, re-prompting on schema failures.
    ///
    /// With a tool result in context the reply must be `to_user`. Returns
    /// `None` once the retry budget is spent or the model is unreachable.
    async fn receptionist_step(
        &self,
        session_id: &str,
        message: &str,
        tool_result: Option<&ToolResult>,
    ) -> Result<Option<ReceptionistAction>> {
        let mut correction: Option<String> = None;
        let mut last_error = None;

        for attempt in 1..=self.policy.attempts() {
            let mut ctx = self.context(session_id).await?;
            if let Some(result) = tool_result {
                ctx = ctx.with_tool_result(result.clone());
            }
            if let Some(note) = &correction {
                ctx = ctx.with_correction(note.clone());
            }

            let outcome = match self.receptionist.respond(message, &ctx).await {
                Ok(ReceptionistAction::ToDataEntry { .. }) if tool_result.is_some() => {
                    Err(AgentError::MalformedOutput(
                        "expected a to_user reply after the booking system result".into(),
                    ))
                }
                other => other,
            };

            match outcome {
                Ok(action) => return Ok(Some(action)),
                Err(e) if e.is_schema_failure() => {
                    debug!(
                        session_id = %session_id,
                        attempt,
                        error = %e,
                        "Receptionist output rejected"
                    );
                    correction = Some(format!(
                        "Your previous reply was rejected: {e}. Answer with exactly one JSON \
                         object in one of the two allowed shapes and nothing else."
                    ));
                    last_error = Some(e);
                }
                Err(e) => {
                    warn!(
                        session_id = %session_id,
                        role = "receptionist",
                        error = %e,
                        "Model invocation failed"
                    );
                    return Ok(None);
                }
            }
        }

        if let Some(e) = last_error {
            warn!(
                session_id = %session_id,
                role = "receptionist",
                attempts = self.policy.attempts(),
                error = %e,
                "Retry budget exhausted"
            );
        }
        Ok(None)
    }

    /// Run the data entry worker, re-prompting on schema failures.
    async fn data_entry_step(
        &self,
        session_id: &str,
        instruction: &Instruction,
    ) -> Result<Option<Delegation>> {
        let mut correction: Option<String> = None;
        let mut last_error = None;

        for attempt in 1..=self.policy.attempts() {
            let mut ctx = self.context(session_id).await?;
            if let Some(note) = &correction {
                ctx = ctx.with_correction(note.clone());
            }

            match self.data_entry.handle(instruction, &ctx).await {
                Ok(delegation) => return Ok(Some(delegation)),
                Err(e) if e.is_schema_failure() => {
                    debug!(
                        session_id = %session_id,
                        attempt,
                        error = %e,
                        "Data entry output rejected"
                    );
                    correction = Some(format!(
                        "Your previous output was rejected: {e}. Output exactly one JSON object \
                         with keys intent and fields, resolving every required field from the \
                         conversation."
                    ));
                    last_error = Some(e);
                }
                Err(e) => {
                    warn!(
                        session_id = %session_id,
                        role = "data_entry",
                        error = %e,
                        "Model invocation failed"
                    );
                    return Ok(None);
                }
            }
        }

        if let Some(e) = last_error {
            warn!(
                session_id = %session_id,
                role = "data_entry",
                intent = %instruction.intent,
                attempts = self.policy.attempts(),
                error = %e,
                "Retry budget exhausted"
            );
        }
        Ok(None)
    }
}
