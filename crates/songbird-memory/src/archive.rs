//! Long-term JSONL archive of closed sessions.
//!
//! Each closed session appends one line to `<dir>/<encoded id>_memory.jsonl`:
//!
//! ```text
//! {"closed_at":"...","session_id":"guest-1","summary":"...","turns":[...]}
//! ```
//!
//! The archive lets a returning user be recognised after a restart.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::session::{Session, Summary};
use crate::turn::Turn;

/// One archived session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    /// When the session was closed.
    pub closed_at: DateTime<Utc>,
    /// Session identifier.
    pub session_id: String,
    /// Summary text.
    pub summary: String,
    /// Full turn sequence of the session.
    pub turns: Vec<Turn>,
}

impl ArchiveRecord {
    /// Build a record for a session about to be closed with `summary`.
    pub fn new(session_id: impl Into<String>, summary: &Summary, turns: &[Turn]) -> Self {
        Self {
            closed_at: summary.created_at,
            session_id: session_id.into(),
            summary: summary.text.clone(),
            turns: turns.to_vec(),
        }
    }

    /// Build a record from a closed session. Returns `None` if it has no summary.
    pub fn from_session(session: &Session) -> Option<Self> {
        let summary = session.summary()?;
        Some(Self::new(session.id.clone(), summary, session.turns()))
    }

    /// The summary this record carries.
    pub fn to_summary(&self) -> Summary {
        Summary {
            text: self.summary.clone(),
            turn_count: self.turns.len(),
            created_at: self.closed_at,
        }
    }
}

/// Append-only JSONL archive, one file per session identifier.
#[derive(Debug, Clone)]
pub struct SummaryArchive {
    dir: PathBuf,
}

impl SummaryArchive {
    /// Open an archive rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        info!(path = %dir.display(), "Opened summary archive");
        Ok(Self { dir })
    }

    /// Archive root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the records for `session_id`.
    ///
    /// ASCII letters, digits and `-` are kept. Every other byte, `_`
    /// included, is written as `_xx` hex, so distinct ids never share a file.
    pub fn file_for(&self, session_id: &str) -> PathBuf {
        let mut safe = String::with_capacity(session_id.len());
        for byte in session_id.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                safe.push(char::from(byte));
            } else {
                safe.push_str(&format!("_{byte:02x}"));
            }
        }
        self.dir.join(format!("{safe}_memory.jsonl"))
    }

    /// Append a record as one JSON line.
    pub async fn append(&self, record: &ArchiveRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let path = self.file_for(&record.session_id);
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        debug!(session_id = %record.session_id, path = %path.display(), "Archived session");
        Ok(())
    }

    /// All records for `session_id`, oldest first. Unparsable lines are skipped.
    pub async fn records(&self, session_id: &str) -> Result<Vec<ArchiveRecord>> {
        let path = self.file_for(session_id);
        let data = match tokio::fs::read_to_string(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for (line_no, line) in data.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ArchiveRecord>(line) {
                Ok(record) if record.session_id == session_id => records.push(record),
                Ok(record) => {
                    warn!(
                        path = %path.display(),
                        line = line_no + 1,
                        found = %record.session_id,
                        "Skipping archive line for another session"
                    )
                }
                Err(e) => {
                    warn!(path = %path.display(), line = line_no + 1, error = %e, "Skipping bad archive line")
                }
            }
        }
        Ok(records)
    }

    /// Summary of the most recently archived session, if any.
    pub async fn last_summary(&self, session_id: &str) -> Result<Option<Summary>> {
        Ok(self
            .records(session_id)
            .await?
            .last()
            .map(ArchiveRecord::to_summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn closed_session(id: &str, summary: &str) -> Session {
        let mut session = Session::new(id);
        session.push(Turn::user("Book a table"));
        session.push(Turn::receptionist_reply("For how many?"));
        session.close(Summary::new(summary, 2));
        session
    }

    #[tokio::test]
    async fn test_append_and_read_back() {
        let dir = TempDir::new().unwrap();
        let archive = SummaryArchive::new(dir.path()).unwrap();

        assert!(archive.last_summary("guest").await.unwrap().is_none());

        let first = ArchiveRecord::from_session(&closed_session("guest", "first visit")).unwrap();
        let second = ArchiveRecord::from_session(&closed_session("guest", "second visit")).unwrap();
        archive.append(&first).await.unwrap();
        archive.append(&second).await.unwrap();

        let records = archive.records("guest").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].turns.len(), 2);

        let last = archive.last_summary("guest").await.unwrap().unwrap();
        assert_eq!(last.text, "second visit");
        assert_eq!(last.turn_count, 2);
    }

    #[tokio::test]
    async fn test_skips_corrupt_lines() {
        let dir = TempDir::new().unwrap();
        let archive = SummaryArchive::new(dir.path()).unwrap();
        let record = ArchiveRecord::from_session(&closed_session("guest", "ok")).unwrap();
        archive.append(&record).await.unwrap();

        let path = archive.file_for("guest");
        let mut data = std::fs::read_to_string(&path).unwrap();
        data.push_str("{not json\n");
        std::fs::write(&path, data).unwrap();

        assert_eq!(archive.records("guest").await.unwrap().len(), 1);
    }

    #[test]
    fn test_file_name_is_encoded() {
        let dir = TempDir::new().unwrap();
        let archive = SummaryArchive::new(dir.path()).unwrap();
        let path = archive.file_for("../evil id");
        assert_eq!(path.parent(), Some(dir.path()));
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("_2e_2e_2fevil_20id_memory.jsonl")
        );
        assert_eq!(
            archive.file_for("guest-1").file_name().and_then(|n| n.to_str()),
            Some("guest-1_memory.jsonl")
        );
    }

    #[test]
    fn test_similar_ids_get_distinct_files() {
        let dir = TempDir::new().unwrap();
        let archive = SummaryArchive::new(dir.path()).unwrap();
        let ids = ["alice.smith", "alice_smith", "alice@smith", "alice_2esmith"];
        let files: std::collections::HashSet<PathBuf> =
            ids.iter().map(|id| archive.file_for(id)).collect();
        assert_eq!(files.len(), ids.len());
    }

    #[tokio::test]
    async fn test_summary_does_not_leak_between_ids() {
        let dir = TempDir::new().unwrap();
        let archive = SummaryArchive::new(dir.path()).unwrap();
        let record =
            ArchiveRecord::from_session(&closed_session("alice.smith", "card ends 4242")).unwrap();
        archive.append(&record).await.unwrap();

        assert!(archive.last_summary("alice_smith").await.unwrap().is_none());
        assert_eq!(
            archive.last_summary("alice.smith").await.unwrap().unwrap().text,
            "card ends 4242"
        );
    }

    #[tokio::test]
    async fn test_records_for_other_ids_are_ignored() {
        let dir = TempDir::new().unwrap();
        let archive = SummaryArchive::new(dir.path()).unwrap();
        let stray = ArchiveRecord::from_session(&closed_session("mallory", "not yours")).unwrap();
        let line = format!("{}\n", serde_json::to_string(&stray).unwrap());
        std::fs::write(archive.file_for("guest"), line).unwrap();

        assert!(archive.records("guest").await.unwrap().is_empty());
    }

    #[test]
    fn test_open_session_has_no_record() {
        assert!(ArchiveRecord::from_session(&Session::new("x")).is_none());
    }
}
