//! Session and summary types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::turn::Turn;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Accepting turns.
    Active,
    /// Summarized and read-only.
    Closed,
}

/// Condensed record of a closed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Summary text.
    pub text: String,
    /// Number of turns that were summarized.
    pub turn_count: usize,
    /// When the summary was produced.
    pub created_at: DateTime<Utc>,
}

impl Summary {
    /// Create a summary stamped with the current time.
    pub fn new(text: impl Into<String>, turn_count: usize) -> Self {
        Self {
            text: text.into(),
            turn_count,
            created_at: Utc::now(),
        }
    }
}

/// One conversation: an ordered turn log plus an optional summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque identifier supplied by the front-end.
    pub id: String,
    turns: Vec<Turn>,
    summary: Option<Summary>,
    status: SessionStatus,
    /// When the session was opened.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create an empty active session.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            turns: Vec::new(),
            summary: None,
            status: SessionStatus::Active,
            created_at: Utc::now(),
        }
    }

    /// Turns in append order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Summary, set once the session is closed.
    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    /// Current status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Whether the session still accepts turns.
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub(crate) fn push(&mut self, turn: Turn) -> usize {
        self.turns.push(turn);
        self.turns.len()
    }

    pub(crate) fn close(&mut self, summary: Summary) {
        self.summary = Some(summary);
        self.status = SessionStatus::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_active_and_empty() {
        let session = Session::new("guest-1");
        assert!(session.is_active());
        assert!(session.turns().is_empty());
        assert!(session.summary().is_none());
    }

    #[test]
    fn test_close_keeps_turns() {
        let mut session = Session::new("guest-1");
        session.push(Turn::user("Hi"));
        session.close(Summary::new("Said hi.", 1));

        assert_eq!(session.status(), SessionStatus::Closed);
        assert_eq!(session.turns().len(), 1);
        assert_eq!(session.summary().map(|s| s.text.as_str()), Some("Said hi."));
    }
}
