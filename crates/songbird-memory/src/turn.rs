//! Turn types: the append-only units of a session's history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Approximate characters per token for prompt budgeting.
pub const CHARS_PER_TOKEN: usize = 4;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// The guest.
    User,
    /// The customer-facing agent.
    Receptionist,
    /// The internal agent that maps instructions to tool calls.
    DataEntry,
    /// A booking tool result.
    Tool,
}

impl std::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Receptionist => write!(f, "receptionist"),
            Self::DataEntry => write!(f, "data_entry"),
            Self::Tool => write!(f, "tool"),
        }
    }
}

/// Routing tag on receptionist output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// A message for the guest.
    ToUser,
    /// An instruction for the data entry worker.
    ToDataEntry,
}

impl Channel {
    /// Wire name of the channel.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToUser => "to_user",
            Self::ToDataEntry => "to_data_entry",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a turn.
///
/// Serialized with an explicit `kind` tag so a structured payload that
/// happens to be a JSON string reads back as structured, not as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TurnContent {
    /// Plain text (user messages, receptionist replies).
    Text(String),
    /// Structured payload (instructions, booking requests, tool results).
    Structured(serde_json::Value),
}

impl TurnContent {
    /// Render the content as prompt text.
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Structured(value) => value.to_string(),
        }
    }

    /// Text content, if this is a text turn.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Structured(_) => None,
        }
    }
}

/// A single immutable entry in a session.
///
/// Receptionist turns always carry exactly one channel; other roles never do.
/// Fields are read-only so an appended turn cannot change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    role: TurnRole,
    content: TurnContent,
    timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    channel: Option<Channel>,
}

impl Turn {
    fn new(role: TurnRole, content: TurnContent, channel: Option<Channel>) -> Self {
        Self {
            role,
            content,
            timestamp: Utc::now(),
            channel,
        }
    }

    /// A guest message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(TurnRole::User, TurnContent::Text(text.into()), None)
    }

    /// A receptionist reply addressed to the guest.
    pub fn receptionist_reply(text: impl Into<String>) -> Self {
        Self::new(
            TurnRole::Receptionist,
            TurnContent::Text(text.into()),
            Some(Channel::ToUser),
        )
    }

    /// A receptionist instruction addressed to the data entry worker.
    pub fn receptionist_instruction(instruction: serde_json::Value) -> Self {
        Self::new(
            TurnRole::Receptionist,
            TurnContent::Structured(instruction),
            Some(Channel::ToDataEntry),
        )
    }

    /// A data entry record (intent plus the request it built).
    pub fn data_entry(payload: serde_json::Value) -> Self {
        Self::new(TurnRole::DataEntry, TurnContent::Structured(payload), None)
    }

    /// A booking tool result.
    pub fn tool(payload: serde_json::Value) -> Self {
        Self::new(TurnRole::Tool, TurnContent::Structured(payload), None)
    }

    /// Role of the producer.
    pub fn role(&self) -> TurnRole {
        self.role
    }

    /// Content of the turn.
    pub fn content(&self) -> &TurnContent {
        &self.content
    }

    /// When the turn was created.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Channel tag, present only on receptionist turns.
    pub fn channel(&self) -> Option<Channel> {
        self.channel
    }

    /// Rough token estimate used for context bounding.
    pub fn estimated_tokens(&self) -> usize {
        self.content.render().len().div_ceil(CHARS_PER_TOKEN)
    }
}
