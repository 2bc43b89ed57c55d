//! Error types for the tool gateway.

use thiserror::Error;

use crate::intent::Intent;

/// Errors surfaced by booking tool calls.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The booking API is unreachable or answered with an unexpected shape.
    #[error("booking tool unavailable: {0}")]
    ToolUnavailable(String),

    /// The request is incomplete for its intent.
    #[error("invalid {intent} request: {reason}")]
    ValidationError {
        /// Intent the request was sent for.
        intent: Intent,
        /// What is wrong with it.
        reason: String,
    },
}

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
