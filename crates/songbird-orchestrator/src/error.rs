//! Error types for the orchestrator.

use thiserror::Error;

/// Orchestrator-specific errors.
///
/// Conversational failures (malformed agent output, unusable instructions,
/// booking tool failures) are recovered inside the turn and never appear
/// here. Only memory contract violations reach the caller.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Memory error.
    #[error("Memory error: {0}")]
    Memory(#[from] songbird_memory::MemoryError),
}

impl OrchestratorError {
    /// Whether the error means the session identifier is unknown.
    pub fn is_unknown_session(&self) -> bool {
        matches!(self, Self::Memory(songbird_memory::MemoryError::UnknownSession(_)))
    }

    /// Whether the error means the session was already closed.
    pub fn is_already_closed(&self) -> bool {
        matches!(self, Self::Memory(songbird_memory::MemoryError::AlreadyClosed(_)))
    }
}

/// Result type for orchestrator operations.
pub type Result<T> = std::result::Result<T, OrchestratorError>;
