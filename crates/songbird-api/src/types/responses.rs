//! Response DTOs for the API.

use serde::Serialize;

use songbird_memory::{Rehydration, Summary, Turn};

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
}

/// Greeting returned when a session starts.
#[derive(Debug, Clone, Serialize)]
pub struct StartResponse {
    /// Greeting text.
    pub message: String,
}

/// Reply to a guest message.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Receptionist reply.
    pub response: String,
    /// Whether the message closed the session.
    pub closed: bool,
    /// Summary stored on close.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
}

/// Result of ending a session.
#[derive(Debug, Clone, Serialize)]
pub struct EndResponse {
    /// Human-readable status.
    pub message: String,
    /// Stored summary.
    pub summary: Summary,
}

/// Rehydrated memory for a session.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemoryResponse {
    /// The session's stored summary.
    Summary {
        /// Session identifier.
        session_id: String,
        /// Stored summary.
        summary: Summary,
    },
    /// The most recent turns, oldest first.
    Recent {
        /// Session identifier.
        session_id: String,
        /// Turns.
        turns: Vec<Turn>,
    },
}

impl MemoryResponse {
    /// Wrap a rehydration result.
    pub fn new(session_id: impl Into<String>, rehydration: Rehydration) -> Self {
        let session_id = session_id.into();
        match rehydration {
            Rehydration::Summary(summary) => Self::Summary {
                session_id,
                summary,
            },
            Rehydration::Recent(turns) => Self::Recent {
                session_id,
                turns: turns.to_vec(),
            },
        }
    }
}
