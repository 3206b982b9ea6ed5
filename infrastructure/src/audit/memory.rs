//! In-memory audit store.

use async_trait::async_trait;
use hive_application::ports::audit_store::{
    AuditStore, AuditStoreError, DecisionAuditEntry, VoteAuditEntry,
};
use hive_domain::SwarmId;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// Audit store backed by process memory.
///
/// Suitable for embedding and tests; entries do not survive a restart.
/// Ids are assigned from a single monotonically increasing sequence shared
/// by votes and decisions, so a lower id always means an earlier append.
#[derive(Debug, Default)]
pub struct InMemoryAuditStore {
    votes: Mutex<Vec<VoteAuditEntry>>,
    decisions: Mutex<Vec<DecisionAuditEntry>>,
    sequence: AtomicU64,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl AuditStore for InMemoryAuditStore {
    async fn append_vote(
        &self,
        mut entry: VoteAuditEntry,
    ) -> Result<VoteAuditEntry, AuditStoreError> {
        entry.id = self.next_id();
        self.votes.lock().await.push(entry.clone());
        Ok(entry)
    }

    async fn append_decision(
        &self,
        mut entry: DecisionAuditEntry,
    ) -> Result<DecisionAuditEntry, AuditStoreError> {
        entry.id = self.next_id();
        self.decisions.lock().await.push(entry.clone());
        Ok(entry)
    }

    async fn vote_history(
        &self,
        proposal_id: &str,
    ) -> Result<Vec<VoteAuditEntry>, AuditStoreError> {
        let votes = self.votes.lock().await;
        let mut entries: Vec<_> = votes
            .iter()
            .filter(|e| e.proposal_id == proposal_id)
            .cloned()
            .collect();
        entries.reverse();
        Ok(entries)
    }

    async fn decision_history(
        &self,
        swarm_id: &SwarmId,
        limit: usize,
    ) -> Result<Vec<DecisionAuditEntry>, AuditStoreError> {
        let decisions = self.decisions.lock().await;
        let mut entries: Vec<_> = decisions
            .iter()
            .filter(|e| &e.swarm_id == swarm_id)
            .cloned()
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
    use hive_domain::AgentId;

    fn vote_entry(proposal_id: &str, agent: &str, vote: f64) -> VoteAuditEntry {
        VoteAuditEntry {
            id: 0,
            swarm_id: SwarmId::new("swarm-1"),
            proposal_id: proposal_id.to_string(),
            agent_id: AgentId::new(agent),
            vote,
            weight: 1.0,
            justification: None,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_monotonic() {
        let store = InMemoryAuditStore::new();
        let first = store.append_vote(vote_entry("p", "a", 1.0)).await.unwrap();
        let second = store.append_vote(vote_entry("p", "b", 0.0)).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_vote_history_newest_first_per_proposal() {
        let store = InMemoryAuditStore::new();
        store.append_vote(vote_entry("p1", "a", 1.0)).await.unwrap();
        store.append_vote(vote_entry("p2", "a", 1.0)).await.unwrap();
        store.append_vote(vote_entry("p1", "a", 0.0)).await.unwrap();

        let history = store.vote_history("p1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].vote, 0.0);
        assert_eq!(history[1].vote, 1.0);
    }
}
