//! Decision record produced at finalization.

use crate::agent::{AgentId, SwarmId};
use crate::quorum::{ConsensusAlgorithm, Outcome, Tally};
use crate::vote::VoteRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The immutable result of one voting round.
///
/// Produced exactly once per proposal when it finalizes, persisted to the
/// audit store, and never updated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub proposal_id: String,
    pub swarm_id: SwarmId,
    /// The proposal description at the time of the vote.
    pub topic: Option<String>,
    /// `None` when the round closed without any votes.
    pub outcome: Option<Outcome>,
    pub algorithm: ConsensusAlgorithm,
    /// Approval strength in `[0, 1]`.
    pub confidence: f64,
    /// Snapshot of the current vote per agent at finalization time.
    pub votes: HashMap<AgentId, VoteRecord>,
    pub finalized_at: DateTime<Utc>,
}

impl Decision {
    /// Build the decision record from a tally and a vote snapshot.
    pub fn new(
        proposal_id: impl Into<String>,
        swarm_id: SwarmId,
        topic: Option<String>,
        algorithm: ConsensusAlgorithm,
        tally: &Tally,
        votes: HashMap<AgentId, VoteRecord>,
    ) -> Self {
        Self {
            proposal_id: proposal_id.into(),
            swarm_id,
            topic,
            outcome: tally.outcome,
            algorithm,
            confidence: tally.confidence,
            votes,
            finalized_at: Utc::now(),
        }
    }

    /// Whether the round approved the proposal.
    pub fn is_approved(&self) -> bool {
        self.outcome.is_some_and(|o| o.is_approved())
    }
}
