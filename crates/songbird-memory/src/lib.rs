//! Songbird Memory - session-keyed conversation memory.
//!
//! A session is an append-only, ordered log of [`Turn`]s plus an optional
//! [`Summary`] produced when the session closes. The store hands out bounded
//! windows of recent turns for prompt building and rehydrates returning users
//! from their summary.
//!
//! # Components
//!
//! - [`MemoryStore`]: the session-keyed contract
//! - [`InMemoryStore`]: per-session locked implementation
//! - [`SummaryArchive`]: JSONL long-term record of closed sessions
//! - [`Summarizer`]: pluggable summarization, with [`TranscriptSummarizer`]
//!
//! # Example
//!
//! ```ignore
//! use songbird_memory::{ContextBound, InMemoryStore, MemoryStore, TranscriptSummarizer, Turn};
//!
//! let store = InMemoryStore::new();
//! store.append("guest-1", Turn::user("Table for 4 tonight")).await?;
//! let recent = store.recent_context("guest-1", ContextBound::Turns(10)).await?;
//! let summary = store.close_session("guest-1", &TranscriptSummarizer).await?;
//! ```

pub mod archive;
pub mod error;
pub mod in_memory;
pub mod session;
pub mod store;
pub mod summarizer;
pub mod turn;

pub use archive::{ArchiveRecord, SummaryArchive};
pub use error::{MemoryError, Result};
pub use in_memory::InMemoryStore;
pub use session::{Session, SessionStatus, Summary};
pub use store::{ContextBound, MemoryStore, RecentTurns, Rehydration, DEFAULT_REHYDRATE_TURNS};
pub use summarizer::{transcript_summary, Summarizer, TranscriptSummarizer};
pub use turn::{Channel, Turn, TurnContent, TurnRole, CHARS_PER_TOKEN};
