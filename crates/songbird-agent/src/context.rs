//! Per-call context handed to the agent roles.
//!
//! Roles hold no conversation state; everything they know about a session
//! arrives in a [`SessionContext`] built by the caller from the memory store.

use chrono::NaiveDate;
use songbird_booking::ToolResult;
use songbird_memory::{RecentTurns, TurnRole};

/// Context for one receptionist or data entry invocation.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Session the call belongs to.
    pub session_id: String,
    /// Summary of the guest's previous conversation, if any.
    pub summary: Option<String>,
    /// Most recent turns, oldest first.
    pub recent: RecentTurns,
    /// Result of the tool call made this turn, if any.
    pub tool_result: Option<ToolResult>,
    /// Clarifying note appended when re-prompting after a schema failure.
    pub correction: Option<String>,
    /// Date used to resolve relative dates.
    pub today: NaiveDate,
}

impl SessionContext {
    /// Create a context over `recent` turns.
    pub fn new(session_id: impl Into<String>, recent: RecentTurns, today: NaiveDate) -> Self {
        Self {
            session_id: session_id.into(),
            summary: None,
            recent,
            tool_result: None,
            correction: None,
            today,
        }
    }

    /// Attach a long-term summary.
    pub fn with_summary(mut self, summary: Option<String>) -> Self {
        self.summary = summary;
        self
    }

    /// Fold a tool result into the context.
    pub fn with_tool_result(mut self, result: ToolResult) -> Self {
        self.tool_result = Some(result);
        self
    }

    /// Attach a clarifying note for a re-prompt.
    pub fn with_correction(mut self, correction: impl Into<String>) -> Self {
        self.correction = Some(correction.into());
        self
    }

    /// Text of the newest user turn in the window.
    pub fn last_user_message(&self) -> Option<String> {
        self.recent
            .iter()
            .rev()
            .find(|t| t.role() == TurnRole::User)
            .map(|t| t.content().render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use songbird_memory::{ContextBound, Turn};

    #[test]
    fn test_last_user_message() {
        let turns = vec![
            Turn::user("first"),
            Turn::receptionist_reply("ok"),
            Turn::user("second"),
            Turn::receptionist_reply("sure"),
        ];
        let recent = RecentTurns::select(&turns, ContextBound::Turns(10));
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let ctx = SessionContext::new("s1", recent, today);
        assert_eq!(ctx.last_user_message().as_deref(), Some("second"));
    }
}
