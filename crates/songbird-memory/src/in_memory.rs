//! In-process memory store with per-session locking.
//!
//! Sessions live in a map of independently locked slots: the outer lock is
//! held only long enough to look up or insert a slot, so a slow summarizer on
//! one session never stalls another.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::archive::{ArchiveRecord, SummaryArchive};
use crate::error::{MemoryError, Result};
use crate::session::{Session, Summary};
use crate::store::{ContextBound, MemoryStore, Rehydration, RecentTurns, DEFAULT_REHYDRATE_TURNS};
use crate::summarizer::Summarizer;
use crate::turn::Turn;

/// Everything held for one session identifier.
#[derive(Debug)]
struct SessionSlot {
    current: Session,
    /// Summary of the last closed session under this identifier, or the one
    /// loaded from the archive when the slot was created. Earlier turns are
    /// dropped on reopen so a long-lived identifier does not grow.
    previous: Option<Summary>,
}

impl SessionSlot {
    fn new(session_id: &str, restored: Option<Summary>) -> Self {
        Self {
            current: Session::new(session_id),
            previous: restored,
        }
    }

    fn previous_summary(&self) -> Option<&Summary> {
        self.previous.as_ref()
    }
}

/// In-memory [`MemoryStore`] with an optional long-term archive.
pub struct InMemoryStore {
    sessions: RwLock<HashMap<String, Arc<Mutex<SessionSlot>>>>,
    auto_create: bool,
    archive: Option<SummaryArchive>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create a store that creates sessions on first append.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            auto_create: true,
            archive: None,
        }
    }

    /// Create a store that requires [`MemoryStore::open_session`] before use.
    pub fn strict() -> Self {
        Self {
            auto_create: false,
            ..Self::new()
        }
    }

    /// Persist closed sessions to `archive` and consult it for returning users.
    pub fn with_archive(mut self, archive: SummaryArchive) -> Self {
        self.archive = Some(archive);
        self
    }

    /// Whether appends create missing sessions.
    pub fn auto_create(&self) -> bool {
        self.auto_create
    }

    /// Number of session identifiers held.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn slot(&self, session_id: &str) -> Result<Arc<Mutex<SessionSlot>>> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| MemoryError::UnknownSession(session_id.to_string()))
    }

    async fn slot_or_create(&self, session_id: &str) -> Result<(Arc<Mutex<SessionSlot>>, bool)> {
        if let Ok(slot) = self.slot(session_id).await {
            return Ok((slot, false));
        }

        // Read the archive before taking the write lock.
        let restored = self.archived_summary(session_id).await?;

        let mut sessions = self.sessions.write().await;
        if let Some(slot) = sessions.get(session_id) {
            return Ok((slot.clone(), false));
        }
        let slot = Arc::new(Mutex::new(SessionSlot::new(session_id, restored)));
        sessions.insert(session_id.to_string(), slot.clone());
        info!(session_id = %session_id, "Created session");
        Ok((slot, true))
    }

    async fn archived_summary(&self, session_id: &str) -> Result<Option<Summary>> {
        match &self.archive {
            Some(archive) => archive.last_summary(session_id).await,
            None => Ok(None),
        }
    }
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    async fn open_session(&self, session_id: &str) -> Result<bool> {
        let (slot, created) = self.slot_or_create(session_id).await?;
        if created {
            return Ok(true);
        }

        let mut slot = slot.lock().await;
        if slot.current.is_active() {
            return Ok(false);
        }
        let previous = std::mem::replace(&mut slot.current, Session::new(session_id));
        if let Some(summary) = previous.summary() {
            slot.previous = Some(summary.clone());
        }
        info!(session_id = %session_id, turns = previous.turns().len(), "Reopened closed session");
        Ok(true)
    }

    async fn append(&self, session_id: &str, turn: Turn) -> Result<usize> {
        let slot = if self.auto_create {
            self.slot_or_create(session_id).await?.0
        } else {
            self.slot(session_id).await?
        };

        let mut slot = slot.lock().await;
        if !slot.current.is_active() {
            return Err(MemoryError::AlreadyClosed(session_id.to_string()));
        }
        let role = turn.role();
        let count = slot.current.push(turn);
        debug!(session_id = %session_id, role = %role, turns = count, "Appended turn");
        Ok(count)
    }

    async fn recent_context(&self, session_id: &str, bound: ContextBound) -> Result<RecentTurns> {
        let slot = self.slot(session_id).await?;
        let slot = slot.lock().await;
        Ok(RecentTurns::select(slot.current.turns(), bound))
    }

    async fn close_session(
        &self,
        session_id: &str,
        summarizer: &dyn Summarizer,
    ) -> Result<Summary> {
        let slot = self.slot(session_id).await?;
        let mut slot = slot.lock().await;
        if !slot.current.is_active() {
            return Err(MemoryError::AlreadyClosed(session_id.to_string()));
        }

        let turns = slot.current.turns();
        let text = summarizer.summarize(turns).await?;
        let summary = Summary::new(text, turns.len());

        // Archive first: a failed write leaves the session active so it can be retried.
        if let Some(archive) = &self.archive {
            let record = ArchiveRecord::new(session_id, &summary, turns);
            archive.append(&record).await?;
        }

        slot.current.close(summary.clone());
        info!(session_id = %session_id, turns = summary.turn_count, "Closed session");
        Ok(summary)
    }

    async fn rehydrate(&self, session_id: &str) -> Result<Rehydration> {
        let slot = match self.slot(session_id).await {
            Ok(slot) => slot,
            Err(MemoryError::UnknownSession(id)) => {
                return match self.archived_summary(session_id).await? {
                    Some(summary) => Ok(Rehydration::Summary(summary)),
                    None => Err(MemoryError::UnknownSession(id)),
                };
            }
            Err(e) => return Err(e),
        };

        let slot = slot.lock().await;
        if let Some(summary) = slot.current.summary() {
            return Ok(Rehydration::Summary(summary.clone()));
        }
        if slot.current.turns().is_empty() {
            if let Some(previous) = slot.previous_summary() {
                return Ok(Rehydration::Summary(previous.clone()));
            }
        }
        Ok(Rehydration::Recent(RecentTurns::select(
            slot.current.turns(),
            ContextBound::Turns(DEFAULT_REHYDRATE_TURNS),
        )))
    }

    async fn last_summary(&self, session_id: &str) -> Result<Option<Summary>> {
        let Ok(slot) = self.slot(session_id).await else {
            return self.archived_summary(session_id).await;
        };
        let slot = slot.lock().await;
        Ok(slot
            .current
            .summary()
            .or_else(|| slot.previous_summary())
            .cloned())
    }

    async fn session(&self, session_id: &str) -> Result<Session> {
        let slot = self.slot(session_id).await?;
        let slot = slot.lock().await;
        Ok(slot.current.clone())
    }
}
