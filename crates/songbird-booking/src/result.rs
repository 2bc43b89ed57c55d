//! Structured tool results.

use serde::{Deserialize, Serialize};

/// What a tool call produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolPayload {
    /// Free slots (`HH:MM:SS`) on the requested date.
    Availability {
        /// Slot times.
        slots: Vec<String>,
    },
    /// A booking was created, changed or cancelled.
    Confirmation {
        /// Booking reference.
        reservation_id: String,
        /// Short description of what happened.
        status: String,
    },
    /// The call did not succeed.
    Error {
        /// What went wrong.
        detail: String,
    },
}

/// Outcome of one booking tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the booking operation succeeded.
    pub success: bool,
    /// Result data.
    pub payload: ToolPayload,
}

impl ToolResult {
    /// Successful availability lookup.
    pub fn availability(slots: Vec<String>) -> Self {
        Self {
            success: true,
            payload: ToolPayload::Availability { slots },
        }
    }

    /// Successful booking change.
    pub fn confirmation(reservation_id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            success: true,
            payload: ToolPayload::Confirmation {
                reservation_id: reservation_id.into(),
                status: status.into(),
            },
        }
    }

    /// Failed call.
    pub fn failure(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: ToolPayload::Error {
                detail: detail.into(),
            },
        }
    }

    /// JSON form for prompts and turn records.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
