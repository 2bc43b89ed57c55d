//! Errors surfaced by the binary.

use thiserror::Error;

/// Start-up and front-end errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Settings(#[from] songbird_core::SettingsError),

    /// The booking client could not be built.
    #[error("booking client error: {0}")]
    Booking(#[from] songbird_booking::GatewayError),

    /// Memory store failure.
    #[error("memory error: {0}")]
    Memory(#[from] songbird_memory::MemoryError),

    /// Conversation failure.
    #[error("conversation error: {0}")]
    Orchestrator(#[from] songbird_orchestrator::OrchestratorError),

    /// Terminal input failure.
    #[error("terminal error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the binary.
pub type Result<T> = std::result::Result<T, AppError>;
