//! Audit persistence port
//!
//! The engine appends one entry per vote submission (including submissions
//! that overwrite an agent's current vote) and one entry per finalized
//! decision. The trail is append-only: entries are never updated or
//! deleted, so implementations only need durable, ordered append plus
//! newest-first reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hive_domain::{AgentId, ConsensusAlgorithm, Decision, Outcome, SwarmId, VoteRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors from an audit store implementation.
#[derive(Error, Debug)]
pub enum AuditStoreError {
    #[error("Audit write failed: {0}")]
    WriteFailed(String),

    #[error("Audit read failed: {0}")]
    ReadFailed(String),
}

/// One row per `record_vote` call, including overwrites.
///
/// `id` is assigned by the store on append; the value passed in is
/// ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteAuditEntry {
    pub id: u64,
    pub swarm_id: SwarmId,
    pub proposal_id: String,
    pub agent_id: AgentId,
    pub vote: f64,
    pub weight: f64,
    pub justification: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl VoteAuditEntry {
    /// Build an entry from the vote record being applied to a proposal.
    pub fn from_record(swarm_id: SwarmId, proposal_id: impl Into<String>, record: &VoteRecord) -> Self {
        Self {
            id: 0,
            swarm_id,
            proposal_id: proposal_id.into(),
            agent_id: record.agent_id.clone(),
            vote: record.value.get(),
            weight: record.weight,
            justification: record.justification.clone(),
            timestamp: record.timestamp,
        }
    }
}

/// One row per finalized decision.
///
/// `id` is assigned by the store on append.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionAuditEntry {
    pub id: u64,
    pub swarm_id: SwarmId,
    pub proposal_id: String,
    pub topic: Option<String>,
    /// `None` when the round closed without votes.
    pub outcome: Option<Outcome>,
    /// Snapshot of the vote mapping at finalization time.
    pub votes: HashMap<AgentId, VoteRecord>,
    pub algorithm: ConsensusAlgorithm,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}

impl From<&Decision> for DecisionAuditEntry {
    fn from(decision: &Decision) -> Self {
        Self {
            id: 0,
            swarm_id: decision.swarm_id.clone(),
            proposal_id: decision.proposal_id.clone(),
            topic: decision.topic.clone(),
            outcome: decision.outcome,
            votes: decision.votes.clone(),
            algorithm: decision.algorithm,
            confidence: decision.confidence,
            created_at: decision.finalized_at,
        }
    }
}

/// Append-only audit persistence.
///
/// Implementations live in the infrastructure layer (in-memory, JSONL
/// file). History reads return entries newest-first.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Append a vote submission; returns the entry with its assigned id.
    async fn append_vote(&self, entry: VoteAuditEntry) -> Result<VoteAuditEntry, AuditStoreError>;

    /// Append a finalized decision; returns the entry with its assigned id.
    async fn append_decision(
        &self,
        entry: DecisionAuditEntry,
    ) -> Result<DecisionAuditEntry, AuditStoreError>;

    /// Every vote ever submitted for the proposal, newest-first.
    async fn vote_history(&self, proposal_id: &str)
    -> Result<Vec<VoteAuditEntry>, AuditStoreError>;

    /// Finalized decisions for the swarm, newest-first, at most `limit`.
    async fn decision_history(
        &self,
        swarm_id: &SwarmId,
        limit: usize,
    ) -> Result<Vec<DecisionAuditEntry>, AuditStoreError>;
}
