//! JSONL file-backed audit store.
//!
//! Each audit entry is serialized as a single JSON line with a `type`
//! field, appended to the file via a buffered writer that is flushed on
//! every append (the audit trail is a durability contract, not a log).

use async_trait::async_trait;
use hive_application::ports::audit_store::{
    AuditStore, AuditStoreError, DecisionAuditEntry, VoteAuditEntry,
};
use hive_domain::SwarmId;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

/// One line of the audit file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum AuditLine {
    Vote(VoteAuditEntry),
    Decision(DecisionAuditEntry),
}

/// Append-only audit store writing one JSON object per line.
///
/// Reopening an existing file resumes the id sequence after the highest
/// id already present, so ids stay unique across restarts.
pub struct JsonlAuditStore {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    sequence: AtomicU64,
}

impl JsonlAuditStore {
    /// Open (or create) the audit file at the given path.
    ///
    /// Creates parent directories if they don't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditStoreError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| AuditStoreError::WriteFailed(e.to_string()))?;
        }

        let last_id = Self::scan_last_id(path)?;
        if last_id > 0 {
            debug!(path = %path.display(), last_id, "Resuming audit id sequence");
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| AuditStoreError::WriteFailed(e.to_string()))?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
            sequence: AtomicU64::new(last_id),
        })
    }

    /// Path of the audit file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Highest id in an existing file, or 0 for a fresh one.
    fn scan_last_id(path: &Path) -> Result<u64, AuditStoreError> {
        if !path.exists() {
            return Ok(0);
        }
        let mut last = 0;
        for line in Self::read_lines(path)? {
            last = last.max(match line {
                AuditLine::Vote(e) => e.id,
                AuditLine::Decision(e) => e.id,
            });
        }
        Ok(last)
    }

    fn read_lines(path: &Path) -> Result<Vec<AuditLine>, AuditStoreError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AuditStoreError::ReadFailed(e.to_string())),
        };
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line).map_err(|e| AuditStoreError::ReadFailed(e.to_string()))
            })
            .collect()
    }

    async fn append(&self, line: &AuditLine) -> Result<(), AuditStoreError> {
        let json = serde_json::to_string(line)
            .map_err(|e| AuditStoreError::WriteFailed(e.to_string()))?;
        let mut writer = self.writer.lock().await;
        writeln!(writer, "{json}").map_err(|e| AuditStoreError::WriteFailed(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| AuditStoreError::WriteFailed(e.to_string()))
    }

    fn next_id(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl AuditStore for JsonlAuditStore {
    async fn append_vote(
        &self,
        mut entry: VoteAuditEntry,
    ) -> Result<VoteAuditEntry, AuditStoreError> {
        entry.id = self.next_id();
        self.append(&AuditLine::Vote(entry.clone())).await?;
        Ok(entry)
    }

    async fn append_decision(
        &self,
        mut entry: DecisionAuditEntry,
    ) -> Result<DecisionAuditEntry, AuditStoreError> {
        entry.id = self.next_id();
        self.append(&AuditLine::Decision(entry.clone())).await?;
        Ok(entry)
    }

    async fn vote_history(
        &self,
        proposal_id: &str,
    ) -> Result<Vec<VoteAuditEntry>, AuditStoreError> {
        // Hold the writer lock so buffered appends are visible on disk.
        let _writer = self.writer.lock().await;
        let mut entries: Vec<_> = Self::read_lines(&self.path)?
            .into_iter()
            .filter_map(|line| match line {
                AuditLine::Vote(e) if e.proposal_id == proposal_id => Some(e),
                _ => None,
            })
            .collect();
        entries.reverse();
        Ok(entries)
    }

    async fn decision_history(
        &self,
        swarm_id: &SwarmId,
        limit: usize,
    ) -> Result<Vec<DecisionAuditEntry>, AuditStoreError> {
        let _writer = self.writer.lock().await;
        let mut entries: Vec<_> = Self::read_lines(&self.path)?
            .into_iter()
            .filter_map(|line| match line {
                AuditLine::Decision(e) if &e.swarm_id == swarm_id => Some(e),
                _ => None,
            })
            .collect();
        entries.reverse();
        entries.truncate(limit);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hive_domain::{AgentId, ConsensusAlgorithm, Outcome};
    use std::collections::HashMap;

    fn vote_entry(proposal_id: &str, agent: &str, vote: f64) -> VoteAuditEntry {
        VoteAuditEntry {
            id: 0,
            swarm_id: SwarmId::new("swarm-1"),
            proposal_id: proposal_id.to_string(),
            agent_id: AgentId::new(agent),
            vote,
            weight: 1.0,
            justification: Some("because".to_string()),
            timestamp: Utc::now(),
        }
    }

    fn decision_entry(proposal_id: &str) -> DecisionAuditEntry {
        DecisionAuditEntry {
            id: 0,
            swarm_id: SwarmId::new("swarm-1"),
            proposal_id: proposal_id.to_string(),
            topic: Some("topic".to_string()),
            outcome: Some(Outcome::Approved),
            votes: HashMap::new(),
            algorithm: ConsensusAlgorithm::Majority,
            confidence: 1.0,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_roundtrip_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlAuditStore::open(dir.path().join("audit.jsonl")).unwrap();

        store.append_vote(vote_entry("p1", "a", 1.0)).await.unwrap();
        store.append_vote(vote_entry("p1", "a", 0.0)).await.unwrap();
        store.append_decision(decision_entry("p1")).await.unwrap();

        let votes = store.vote_history("p1").await.unwrap();
        assert_eq!(votes.len(), 2);
        assert_eq!(votes[0].vote, 0.0);
        assert_eq!(votes[1].vote, 1.0);
        assert_eq!(votes[1].justification.as_deref(), Some("because"));

        let decisions = store
            .decision_history(&SwarmId::new("swarm-1"), 10)
            .await
            .unwrap();
        assert_eq!(decisions.len(), 1);
        assert_eq!(decisions[0].outcome, Some(Outcome::Approved));
    }

    #[tokio::test]
    async fn test_sequence_resumes_after_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");

        let first_id = {
            let store = JsonlAuditStore::open(&path).unwrap();
            store.append_vote(vote_entry("p1", "a", 1.0)).await.unwrap().id
        };

        let store = JsonlAuditStore::open(&path).unwrap();
        let next = store.append_vote(vote_entry("p1", "b", 1.0)).await.unwrap();
        assert!(next.id > first_id);

        // Both entries survived the reopen.
        assert_eq!(store.vote_history("p1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_swarm_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlAuditStore::open(dir.path().join("audit.jsonl")).unwrap();
        store.append_decision(decision_entry("p1")).await.unwrap();

        let other = store
            .decision_history(&SwarmId::new("other"), 10)
            .await
            .unwrap();
        assert!(other.is_empty());
    }
}
