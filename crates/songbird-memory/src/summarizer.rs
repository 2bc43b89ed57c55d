//! Pluggable session summarization.
//!
//! The store never decides how a session is condensed; callers hand
//! `close_session` any [`Summarizer`]. [`TranscriptSummarizer`] is the
//! deterministic implementation used in tests and as an offline fallback.

use async_trait::async_trait;

use crate::error::Result;
use crate::turn::{Turn, TurnRole};

/// Maximum characters kept per line of a transcript summary.
const MAX_LINE_CHARS: usize = 100;

/// Turns a session's full turn sequence into summary text.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize the turns of a session, oldest first.
    ///
    /// The result must be derived only from `turns`.
    async fn summarize(&self, turns: &[Turn]) -> Result<String>;
}

/// Deterministic summarizer: guest requests and booking outcomes, truncated.
#[derive(Debug, Clone, Copy, Default)]
pub struct TranscriptSummarizer;

#[async_trait]
impl Summarizer for TranscriptSummarizer {
    async fn summarize(&self, turns: &[Turn]) -> Result<String> {
        Ok(transcript_summary(turns))
    }
}

/// Pure transcript summary over user and tool turns.
pub fn transcript_summary(turns: &[Turn]) -> String {
    let lines: Vec<String> = turns
        .iter()
        .filter(|t| matches!(t.role(), TurnRole::User | TurnRole::Tool))
        .map(|t| format!("{}: {}", t.role(), truncate(&t.content().render())))
        .collect();

    if lines.is_empty() {
        "No conversation recorded.".to_string()
    } else {
        lines.join("; ")
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_LINE_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX_LINE_CHARS).collect();
        format!("{head}...")
    }
}
