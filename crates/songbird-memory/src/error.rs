//! Error types for memory operations.

use thiserror::Error;

/// Errors that can occur during memory operations.
///
/// `UnknownSession` and `AlreadyClosed` are contract errors: they mean the
/// caller addressed a session in a way the store does not allow.
#[derive(Error, Debug)]
pub enum MemoryError {
    /// No session exists under this identifier and the store does not auto-create.
    #[error("unknown session: {0}")]
    UnknownSession(String),

    /// The session has already been closed.
    #[error("session already closed: {0}")]
    AlreadyClosed(String),

    /// The injected summarizer failed.
    #[error("summarization failed: {0}")]
    SummarizationError(String),

    /// Failed to serialize/deserialize archive records.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O error while reading or writing the archive.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for memory operations.
pub type Result<T> = std::result::Result<T, MemoryError>;
