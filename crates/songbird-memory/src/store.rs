//! MemoryStore trait and the context types it hands out.
//!
//! Every operation is keyed by an explicit session identifier; no store
//! keeps a notion of a "current" conversation.

use std::sync::Arc;

use async_trait::async_trait;
use crate::error::Result;
use crate::session::{Session, Summary};
use crate::summarizer::Summarizer;
use crate::turn::Turn;

/// Turns returned by [`MemoryStore::rehydrate`] when no summary exists.
pub const DEFAULT_REHYDRATE_TURNS: usize = 10;

/// Upper bound on a recent-context window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextBound {
    /// At most this many turns.
    Turns(usize),
    /// At most this many estimated tokens.
    ///
    /// Turns are never cut; the newest turn is always included even when it
    /// alone exceeds the budget.
    Tokens(usize),
}

/// A bounded window of the most recent turns, oldest first.
///
/// Cheap to clone. Iteration can be restarted any number of times and always
/// yields the same finite sequence.
#[derive(Debug, Clone, Default)]
pub struct RecentTurns {
    turns: Arc<[Turn]>,
}

impl RecentTurns {
    /// Select the newest turns of `all` that fit in `bound`.
    pub fn select(all: &[Turn], bound: ContextBound) -> Self {
        let start = match bound {
            ContextBound::Turns(n) => all.len().saturating_sub(n),
            ContextBound::Tokens(budget) => {
                let mut used = 0usize;
                let mut start = all.len();
                for (idx, turn) in all.iter().enumerate().rev() {
                    let cost = turn.estimated_tokens();
                    if start < all.len() && used + cost > budget {
                        break;
                    }
                    used += cost;
                    start = idx;
                }
                start
            }
        };
        Self {
            turns: all[start..].to_vec().into(),
        }
    }

    /// Iterate the window, oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    /// Number of turns in the window.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Owned copy of the window.
    pub fn to_vec(&self) -> Vec<Turn> {
        self.turns.to_vec()
    }

    /// Newest turn in the window.
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}

impl<'a> IntoIterator for &'a RecentTurns {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// What a returning user's session resolves to.
#[derive(Debug, Clone)]
pub enum Rehydration {
    /// The session (or the previous one under this identifier) was summarized.
    Summary(Summary),
    /// No summary yet; the most recent raw turns.
    Recent(RecentTurns),
}

/// Trait for session-keyed conversation memory.
///
/// Implementations must isolate sessions: an operation on one identifier
/// never blocks on, or changes, another identifier's state.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Ensure an active session exists under `session_id`.
    ///
    /// Creates the session if absent. If the current session is closed, its
    /// summary is kept and a fresh active session takes its place. Returns `true`
    /// when a new session was started.
    async fn open_session(&self, session_id: &str) -> Result<bool>;

    /// Append a turn to the session.
    ///
    /// # Errors
    /// `UnknownSession` if the session is absent and the store does not
    /// auto-create; `AlreadyClosed` if the session is closed.
    ///
    /// # Returns
    /// The number of turns in the session after the append.
    async fn append(&self, session_id: &str, turn: Turn) -> Result<usize>;

    /// The most recent turns of the session, bounded by `bound`.
    async fn recent_context(&self, session_id: &str, bound: ContextBound) -> Result<RecentTurns>;

    /// Summarize the full turn sequence, store the summary and close the session.
    ///
    /// # Errors
    /// `AlreadyClosed` if called again on a closed session; the stored
    /// summary is left untouched.
    async fn close_session(&self, session_id: &str, summarizer: &dyn Summarizer)
        -> Result<Summary>;

    /// Summary if one exists for this identifier, else the recent raw context.
    async fn rehydrate(&self, session_id: &str) -> Result<Rehydration>;

    /// Summary of the most recent closed session under this identifier.
    ///
    /// Unlike [`MemoryStore::rehydrate`] this ignores the current session's
    /// turns and never fails for an unknown identifier.
    async fn last_summary(&self, session_id: &str) -> Result<Option<Summary>>;

    /// Snapshot of the current session.
    async fn session(&self, session_id: &str) -> Result<Session>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turns(texts: &[&str]) -> Vec<Turn> {
        texts.iter().map(|t| Turn::user(*t)).collect()
    }

    fn texts(recent: &RecentTurns) -> Vec<String> {
        recent.iter().map(|t| t.content().render()).collect()
    }

    #[test]
    fn test_turn_bound_keeps_newest() {
        let all = turns(&["a", "b", "c", "d"]);
        let recent = RecentTurns::select(&all, ContextBound::Turns(2));
        assert_eq!(texts(&recent), vec!["c", "d"]);

        let recent = RecentTurns::select(&all, ContextBound::Turns(10));
        assert_eq!(recent.len(), 4);

        let recent = RecentTurns::select(&all, ContextBound::Turns(0));
        assert!(recent.is_empty());
    }

    #[test]
    fn test_token_bound_never_splits_turns() {
        // 8 chars = 2 tokens each
        let all = turns(&["aaaaaaaa", "bbbbbbbb", "cccccccc"]);
        let recent = RecentTurns::select(&all, ContextBound::Tokens(5));
        assert_eq!(texts(&recent), vec!["bbbbbbbb", "cccccccc"]);
    }

    #[test]
    fn test_token_bound_keeps_oversized_newest_turn() {
        let all = turns(&["short", &"x".repeat(400)]);
        let recent = RecentTurns::select(&all, ContextBound::Tokens(10));
        assert_eq!(recent.len(), 1);
        assert_eq!(recent.last().map(|t| t.content().render().len()), Some(400));
    }

    #[test]
    fn test_iteration_is_restartable() {
        let all = turns(&["a", "b", "c"]);
        let recent = RecentTurns::select(&all, ContextBound::Turns(3));

        let first: Vec<_> = recent.iter().collect();
        let second: Vec<_> = (&recent).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(recent.iter().count(), 3);
    }
}
