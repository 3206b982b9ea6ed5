//! Proposal aggregate: a single voting round and its live vote tally.

use crate::agent::AgentId;
use crate::agent::SwarmId;
use crate::error::ConsensusError;
use crate::quorum::{ConsensusAlgorithm, Tally};
use crate::vote::VoteRecord;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Default voting window when the caller does not specify one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(60_000);

/// Lifecycle state of a proposal.
///
/// `Finalized` and `Cancelled` are terminal; no further vote mutation is
/// permitted once a proposal leaves `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    Active,
    Finalized,
    Cancelled,
}

impl std::fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProposalStatus::Active => write!(f, "active"),
            ProposalStatus::Finalized => write!(f, "finalized"),
            ProposalStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Configuration for a new proposal.
///
/// # Example
///
/// ```
/// use hive_domain::{ConsensusAlgorithm, ProposalOptions};
/// use std::time::Duration;
///
/// let options = ProposalOptions::default()
///     .with_algorithm(ConsensusAlgorithm::Byzantine)
///     .with_timeout(Duration::from_secs(30))
///     .with_required_votes(5)
///     .with_description("Scale worker pool");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalOptions {
    /// Quorum rule for this round.
    pub algorithm: ConsensusAlgorithm,
    /// Voting window; the round auto-finalizes when it elapses.
    pub timeout: Duration,
    /// Optional early-finalize count. When unset, only the timer finalizes.
    pub required_votes: Option<usize>,
    /// Human-readable topic of the vote.
    pub description: Option<String>,
    /// Opaque caller metadata, carried through untouched.
    pub metadata: serde_json::Value,
}

impl Default for ProposalOptions {
    fn default() -> Self {
        Self {
            algorithm: ConsensusAlgorithm::default(),
            timeout: DEFAULT_TIMEOUT,
            required_votes: None,
            description: None,
            metadata: serde_json::Value::Null,
        }
    }
}

impl ProposalOptions {
    pub fn with_algorithm(mut self, algorithm: ConsensusAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_required_votes(mut self, required: usize) -> Self {
        self.required_votes = Some(required);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A single voting round.
///
/// Holds the *current* vote per agent (a later vote from the same agent
/// replaces the earlier one); the append-only audit trail of every
/// submission lives in the audit store, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub proposal_id: String,
    pub swarm_id: SwarmId,
    pub algorithm: ConsensusAlgorithm,
    pub timeout: Duration,
    pub required_votes: Option<usize>,
    pub description: Option<String>,
    pub metadata: serde_json::Value,
    /// Current vote per agent.
    pub votes: HashMap<AgentId, VoteRecord>,
    pub status: ProposalStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Proposal {
    /// Create an active proposal from the given options.
    pub fn new(
        swarm_id: impl Into<SwarmId>,
        proposal_id: impl Into<String>,
        options: ProposalOptions,
    ) -> Self {
        let created_at = Utc::now();
        // Saturate instead of overflowing chrono's datetime range when the
        // window is absurdly large.
        let expires_at = TimeDelta::from_std(options.timeout)
            .ok()
            .and_then(|delta| created_at.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            proposal_id: proposal_id.into(),
            swarm_id: swarm_id.into(),
            algorithm: options.algorithm,
            timeout: options.timeout,
            required_votes: options.required_votes,
            description: options.description,
            metadata: options.metadata,
            votes: HashMap::new(),
            status: ProposalStatus::Active,
            created_at,
            expires_at,
        }
    }

    /// Whether the proposal still accepts votes.
    pub fn is_active(&self) -> bool {
        self.status == ProposalStatus::Active
    }

    /// Time left in the voting window, floored at zero.
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).to_std().unwrap_or(Duration::ZERO)
    }

    /// Number of agents with a current vote.
    pub fn votes_received(&self) -> usize {
        self.votes.len()
    }

    /// Whether the early-finalize count is configured and met.
    pub fn quorum_met(&self) -> bool {
        self.required_votes
            .is_some_and(|required| self.votes.len() >= required)
    }

    /// Upsert an agent's current vote.
    ///
    /// Replaces any earlier vote from the same agent. Fails with
    /// `ProposalNotActive` once the proposal has left the active state.
    pub fn record_vote(&mut self, record: VoteRecord) -> Result<(), ConsensusError> {
        if !self.is_active() {
            return Err(ConsensusError::ProposalNotActive(self.proposal_id.clone()));
        }
        self.votes.insert(record.agent_id.clone(), record);
        Ok(())
    }

    /// Transition `Active -> Finalized`.
    ///
    /// This is the single guard behind the finalize-once invariant: exactly
    /// one caller observes `Active` and performs the transition, every
    /// other caller gets `AlreadyFinalized`.
    pub fn finalize(&mut self) -> Result<(), ConsensusError> {
        if !self.is_active() {
            return Err(ConsensusError::AlreadyFinalized(self.proposal_id.clone()));
        }
        self.status = ProposalStatus::Finalized;
        Ok(())
    }

    /// Evaluate the current vote set under this proposal's algorithm.
    pub fn tally(&self) -> Tally {
        let ballots: Vec<VoteRecord> = self.votes.values().cloned().collect();
        self.algorithm.evaluate(&ballots)
    }
}
