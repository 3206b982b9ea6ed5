//! Consensus engine use case
//!
//! Owns the active-proposal registry, drives the timeout timers, and
//! enforces the finalize-once invariant. Roster membership is not a
//! concern here; that lives in the vote-collection session.

use crate::ports::audit_store::{
    AuditStore, AuditStoreError, DecisionAuditEntry, VoteAuditEntry,
};
use chrono::{DateTime, Utc};
use hive_domain::{
    AgentId, ConsensusAlgorithm, ConsensusError, Decision, Outcome, Proposal, ProposalOptions,
    ProposalStatus, SwarmId, TallyDetails, VoteRecord, VoteValue,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors from engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Consensus(#[from] ConsensusError),

    #[error("Audit store error: {0}")]
    Audit(#[from] AuditStoreError),
}

impl EngineError {
    /// Whether this error means the proposal was already finalized (or
    /// removed) by a competing trigger, as opposed to a genuine failure.
    pub fn is_settled(&self) -> bool {
        matches!(self, EngineError::Consensus(e) if e.is_settled())
    }
}

/// Per-vote options supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct VoteOptions {
    /// Weight for this vote; `None` means the default of 1.0.
    pub weight: Option<f64>,
    /// Free-text reasoning behind the vote.
    pub justification: Option<String>,
}

impl VoteOptions {
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_justification(mut self, justification: impl Into<String>) -> Self {
        self.justification = Some(justification.into());
        self
    }
}

/// Result of `record_vote`.
#[derive(Debug, Clone)]
pub enum VoteOutcome {
    /// The vote was applied; the proposal is still collecting.
    Pending {
        votes_received: usize,
        required_votes: Option<usize>,
    },
    /// This vote met the required count and finalized the proposal
    /// synchronously.
    Finalized(FinalizedDecision),
}

impl VoteOutcome {
    /// The finalized decision, if this vote closed the round.
    pub fn finalized(&self) -> Option<&FinalizedDecision> {
        match self {
            VoteOutcome::Finalized(decision) => Some(decision),
            VoteOutcome::Pending { .. } => None,
        }
    }
}

/// Result of finalizing a proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizedDecision {
    pub proposal_id: String,
    pub algorithm: ConsensusAlgorithm,
    /// `None` when the round closed without votes.
    pub outcome: Option<Outcome>,
    pub confidence: f64,
    pub details: TallyDetails,
    pub votes_count: usize,
    pub finalized_at: DateTime<Utc>,
}

/// Read-only snapshot of a proposal's state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalStatusView {
    pub proposal_id: String,
    pub swarm_id: SwarmId,
    pub algorithm: ConsensusAlgorithm,
    pub status: ProposalStatus,
    pub description: Option<String>,
    pub votes_received: usize,
    pub required_votes: Option<usize>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub time_remaining: Duration,
}

impl ProposalStatusView {
    fn from_proposal(proposal: &Proposal, now: DateTime<Utc>) -> Self {
        Self {
            proposal_id: proposal.proposal_id.clone(),
            swarm_id: proposal.swarm_id.clone(),
            algorithm: proposal.algorithm,
            status: proposal.status,
            description: proposal.description.clone(),
            votes_received: proposal.votes_received(),
            required_votes: proposal.required_votes,
            created_at: proposal.created_at,
            expires_at: proposal.expires_at,
            time_remaining: proposal.time_remaining(now),
        }
    }
}

struct EngineInner {
    /// Active proposals only; entries are removed at finalization, so a
    /// lookup after finalize reports not-found rather than finalized.
    proposals: RwLock<HashMap<String, Proposal>>,
    store: Arc<dyn AuditStore>,
    shutdown: CancellationToken,
}

/// The consensus engine: proposal lifecycle, quorum evaluation, and the
/// finalize-once guarantee.
///
/// Cheap to clone; all clones share the same registry and audit store.
///
/// Every finalize trigger (deadline timer, required-votes reached, manual
/// call) funnels through the same write-locked check-and-transition, so
/// exactly one of them computes the decision and the rest fail with
/// `AlreadyFinalized` or `ProposalNotFound`.
#[derive(Clone)]
pub struct ConsensusEngine {
    inner: Arc<EngineInner>,
}

impl ConsensusEngine {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                proposals: RwLock::new(HashMap::new()),
                store,
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Open a new voting round and arm its deadline timer.
    ///
    /// The id must not collide with a currently active proposal; an id
    /// used by an already-finalized round may be reused and starts a
    /// fresh proposal.
    pub async fn create_proposal(
        &self,
        swarm_id: impl Into<SwarmId>,
        proposal_id: impl Into<String>,
        options: ProposalOptions,
    ) -> Result<ProposalStatusView, EngineError> {
        let proposal_id = proposal_id.into();
        let timeout = options.timeout;

        let view = {
            let mut proposals = self.inner.proposals.write().await;
            if proposals.contains_key(&proposal_id) {
                return Err(ConsensusError::DuplicateProposal(proposal_id).into());
            }
            let proposal = Proposal::new(swarm_id, proposal_id.clone(), options);
            let view = ProposalStatusView::from_proposal(&proposal, Utc::now());
            proposals.insert(proposal_id.clone(), proposal);
            view
        };

        info!(
            proposal_id = %view.proposal_id,
            swarm_id = %view.swarm_id,
            algorithm = %view.algorithm,
            timeout_ms = timeout.as_millis() as u64,
            "Proposal created"
        );

        self.arm_deadline(proposal_id, timeout);
        Ok(view)
    }

    /// Spawn the timer that finalizes the proposal at its deadline if no
    /// other trigger got there first.
    fn arm_deadline(&self, proposal_id: String, timeout: Duration) {
        let engine = self.clone();
        let cancel = self.inner.shutdown.child_token();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(timeout) => {
                    match engine.finalize_voting(&proposal_id).await {
                        Ok(decision) => {
                            info!(
                                proposal_id = %proposal_id,
                                outcome = ?decision.outcome,
                                "Proposal finalized by timeout"
                            );
                        }
                        Err(e) if e.is_settled() => {
                            debug!(proposal_id = %proposal_id, "Deadline timer found proposal already settled");
                        }
                        Err(e) => {
                            // No synchronous caller exists on this path.
                            warn!(proposal_id = %proposal_id, error = %e, "Timeout finalization failed");
                        }
                    }
                }
            }
        });
    }

    /// Record (or replace) an agent's vote.
    ///
    /// The audit entry is appended before the live mapping is touched, and
    /// both happen under the registry write lock: a failed append leaves
    /// the mapping unchanged, and audit order equals application order.
    ///
    /// When this vote meets the proposal's `required_votes`, finalization
    /// runs synchronously and the caller receives the decision instead of
    /// a pending summary.
    pub async fn record_vote(
        &self,
        proposal_id: &str,
        agent_id: impl Into<AgentId>,
        value: f64,
        options: VoteOptions,
    ) -> Result<VoteOutcome, EngineError> {
        let value = VoteValue::new(value)?;

        let mut proposals = self.inner.proposals.write().await;
        let proposal = proposals
            .get_mut(proposal_id)
            .ok_or_else(|| ConsensusError::ProposalNotFound(proposal_id.to_string()))?;
        if !proposal.is_active() {
            return Err(ConsensusError::ProposalNotActive(proposal_id.to_string()).into());
        }

        let mut record = VoteRecord::new(agent_id, value).with_weight(options.weight.unwrap_or(1.0));
        if let Some(justification) = options.justification {
            record = record.with_justification(justification);
        }

        let entry =
            VoteAuditEntry::from_record(proposal.swarm_id.clone(), proposal_id, &record);
        self.inner.store.append_vote(entry).await?;

        debug!(
            proposal_id = %proposal_id,
            agent_id = %record.agent_id,
            value = record.value.get(),
            weight = record.weight,
            "Vote recorded"
        );

        proposal.record_vote(record)?;
        let votes_received = proposal.votes_received();
        let required_votes = proposal.required_votes;
        let quorum_met = proposal.quorum_met();

        if quorum_met {
            let decision =
                Self::finalize_locked(&mut proposals, proposal_id, &self.inner.store).await?;
            return Ok(VoteOutcome::Finalized(decision));
        }

        Ok(VoteOutcome::Pending {
            votes_received,
            required_votes,
        })
    }

    /// Finalize the round: compute the decision, persist it, and remove
    /// the proposal from the active set.
    ///
    /// First caller to observe the proposal active wins; all others get
    /// `AlreadyFinalized` (still present, no longer active) or
    /// `ProposalNotFound` (already removed).
    pub async fn finalize_voting(
        &self,
        proposal_id: &str,
    ) -> Result<FinalizedDecision, EngineError> {
        let mut proposals = self.inner.proposals.write().await;
        Self::finalize_locked(&mut proposals, proposal_id, &self.inner.store).await
    }

    /// The finalize critical section. Callers must hold the registry
    /// write lock.
    async fn finalize_locked(
        proposals: &mut HashMap<String, Proposal>,
        proposal_id: &str,
        store: &Arc<dyn AuditStore>,
    ) -> Result<FinalizedDecision, EngineError> {
        let proposal = proposals
            .get_mut(proposal_id)
            .ok_or_else(|| ConsensusError::ProposalNotFound(proposal_id.to_string()))?;

        // The status transition is the finalize-once guard.
        proposal.finalize()?;

        let tally = proposal.tally();
        let decision = Decision::new(
            proposal_id,
            proposal.swarm_id.clone(),
            proposal.description.clone(),
            proposal.algorithm,
            &tally,
            proposal.votes.clone(),
        );

        // If this append fails the proposal stays in the map marked
        // finalized: late voters get ProposalNotActive, late finalizers
        // get AlreadyFinalized, and no unrecorded decision leaks out.
        store
            .append_decision(DecisionAuditEntry::from(&decision))
            .await?;
        proposals.remove(proposal_id);

        info!(
            proposal_id = %proposal_id,
            outcome = ?decision.outcome,
            confidence = decision.confidence,
            votes = decision.votes.len(),
            "Proposal finalized"
        );

        Ok(FinalizedDecision {
            proposal_id: proposal_id.to_string(),
            algorithm: decision.algorithm,
            outcome: decision.outcome,
            confidence: decision.confidence,
            details: tally.details,
            votes_count: decision.votes.len(),
            finalized_at: decision.finalized_at,
        })
    }

    /// Snapshot of one active proposal.
    pub async fn get_proposal_status(
        &self,
        proposal_id: &str,
    ) -> Result<ProposalStatusView, EngineError> {
        let proposals = self.inner.proposals.read().await;
        let proposal = proposals
            .get(proposal_id)
            .ok_or_else(|| ConsensusError::ProposalNotFound(proposal_id.to_string()))?;
        Ok(ProposalStatusView::from_proposal(proposal, Utc::now()))
    }

    /// Snapshots of every active proposal.
    pub async fn get_active_proposals(&self) -> Vec<ProposalStatusView> {
        let now = Utc::now();
        let proposals = self.inner.proposals.read().await;
        proposals
            .values()
            .map(|p| ProposalStatusView::from_proposal(p, now))
            .collect()
    }

    /// Every vote ever submitted for the proposal, newest-first.
    pub async fn get_vote_history(
        &self,
        proposal_id: &str,
    ) -> Result<Vec<VoteAuditEntry>, EngineError> {
        Ok(self.inner.store.vote_history(proposal_id).await?)
    }

    /// Finalized decisions for the swarm, newest-first.
    pub async fn get_decision_history(
        &self,
        swarm_id: &SwarmId,
        limit: usize,
    ) -> Result<Vec<DecisionAuditEntry>, EngineError> {
        Ok(self.inner.store.decision_history(swarm_id, limit).await?)
    }

    /// Stop all pending deadline timers. In-flight finalizations complete.
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::audit_store::AuditStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use tokio::sync::Mutex;

    /// In-memory audit store test double with a failure switch.
    struct TestStore {
        votes: Mutex<Vec<VoteAuditEntry>>,
        decisions: Mutex<Vec<DecisionAuditEntry>>,
        sequence: AtomicU64,
        fail_writes: AtomicBool,
    }

    impl TestStore {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                votes: Mutex::new(Vec::new()),
                decisions: Mutex::new(Vec::new()),
                sequence: AtomicU64::new(1),
                fail_writes: AtomicBool::new(false),
            })
        }
    }

    #[async_trait]
    impl AuditStore for TestStore {
        async fn append_vote(
            &self,
            mut entry: VoteAuditEntry,
        ) -> Result<VoteAuditEntry, AuditStoreError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(AuditStoreError::WriteFailed("store offline".to_string()));
            }
            entry.id = self.sequence.fetch_add(1, Ordering::SeqCst);
            self.votes.lock().await.push(entry.clone());
            Ok(entry)
        }

        async fn append_decision(
            &self,
            mut entry: DecisionAuditEntry,
        ) -> Result<DecisionAuditEntry, AuditStoreError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(AuditStoreError::WriteFailed("store offline".to_string()));
            }
            entry.id = self.sequence.fetch_add(1, Ordering::SeqCst);
            self.decisions.lock().await.push(entry.clone());
            Ok(entry)
        }

        async fn vote_history(
            &self,
            proposal_id: &str,
        ) -> Result<Vec<VoteAuditEntry>, AuditStoreError> {
            let mut entries: Vec<_> = self
                .votes
                .lock()
                .await
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
            let mut entries: Vec<_> = self
                .decisions
                .lock()
                .await
                .iter()
                .filter(|e| &e.swarm_id == swarm_id)
                .cloned()
                .collect();
            entries.reverse();
            entries.truncate(limit);
            Ok(entries)
        }
    }

    fn engine_with_store() -> (ConsensusEngine, Arc<TestStore>) {
        let store = TestStore::new();
        (ConsensusEngine::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_create_proposal_defaults() {
        let (engine, _store) = engine_with_store();
        let view = engine
            .create_proposal("swarm-1", "prop-1", ProposalOptions::default())
            .await
            .unwrap();

        assert_eq!(view.algorithm, ConsensusAlgorithm::Majority);
        assert_eq!(view.status, ProposalStatus::Active);
        assert_eq!(view.votes_received, 0);
        assert!(view.time_remaining <= Duration::from_millis(60_000));
    }

    #[tokio::test]
    async fn test_duplicate_active_id_rejected() {
        let (engine, _store) = engine_with_store();
        engine
            .create_proposal("swarm-1", "prop-1", ProposalOptions::default())
            .await
            .unwrap();

        let err = engine
            .create_proposal("swarm-1", "prop-1", ProposalOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Consensus(ConsensusError::DuplicateProposal(_))
        ));
    }

    #[tokio::test]
    async fn test_id_reuse_after_finalize() {
        let (engine, _store) = engine_with_store();
        engine
            .create_proposal("swarm-1", "prop-1", ProposalOptions::default())
            .await
            .unwrap();
        engine.finalize_voting("prop-1").await.unwrap();

        // The id is free again once the first round settled.
        assert!(
            engine
                .create_proposal("swarm-1", "prop-1", ProposalOptions::default())
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_vote_out_of_range_rejected() {
        let (engine, _store) = engine_with_store();
        engine
            .create_proposal("swarm-1", "prop-1", ProposalOptions::default())
            .await
            .unwrap();

        for bad in [-0.1, 1.5] {
            let err = engine
                .record_vote("prop-1", "a", bad, VoteOptions::default())
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                EngineError::Consensus(ConsensusError::InvalidVote(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_vote_on_unknown_proposal() {
        let (engine, _store) = engine_with_store();
        let err = engine
            .record_vote("nope", "a", 1.0, VoteOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Consensus(ConsensusError::ProposalNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_required_votes_finalizes_synchronously() {
        let (engine, _store) = engine_with_store();
        engine
            .create_proposal(
                "swarm-1",
                "prop-1",
                ProposalOptions::default().with_required_votes(2),
            )
            .await
            .unwrap();

        let first = engine
            .record_vote("prop-1", "a", 1.0, VoteOptions::default())
            .await
            .unwrap();
        assert!(first.finalized().is_none());

        let second = engine
            .record_vote("prop-1", "b", 1.0, VoteOptions::default())
            .await
            .unwrap();
        let decision = second.finalized().expect("second vote should finalize");
        assert_eq!(decision.outcome, Some(Outcome::Approved));
        assert_eq!(decision.votes_count, 2);

        // The proposal is gone from the active set.
        assert!(engine.get_proposal_status("prop-1").await.is_err());
    }

    #[tokio::test]
    async fn test_second_finalize_fails() {
        let (engine, _store) = engine_with_store();
        engine
            .create_proposal("swarm-1", "prop-1", ProposalOptions::default())
            .await
            .unwrap();

        engine.finalize_voting("prop-1").await.unwrap();
        let err = engine.finalize_voting("prop-1").await.unwrap_err();
        assert!(err.is_settled());
    }

    #[tokio::test]
    async fn test_vote_after_finalize_fails() {
        let (engine, _store) = engine_with_store();
        engine
            .create_proposal("swarm-1", "prop-1", ProposalOptions::default())
            .await
            .unwrap();
        engine.finalize_voting("prop-1").await.unwrap();

        let err = engine
            .record_vote("prop-1", "a", 1.0, VoteOptions::default())
            .await
            .unwrap_err();
        // Finalization removed the proposal entirely.
        assert!(matches!(
            err,
            EngineError::Consensus(ConsensusError::ProposalNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_round_finalizes_with_no_outcome() {
        let (engine, _store) = engine_with_store();
        engine
            .create_proposal("swarm-1", "prop-1", ProposalOptions::default())
            .await
            .unwrap();

        let decision = engine.finalize_voting("prop-1").await.unwrap();
        assert_eq!(decision.outcome, None);
        assert_eq!(decision.confidence, 0.0);
        assert_eq!(decision.votes_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_finalizes_with_partial_votes() {
        let (engine, store) = engine_with_store();
        engine
            .create_proposal(
                "swarm-1",
                "prop-1",
                ProposalOptions::default()
                    .with_timeout(Duration::from_millis(100))
                    .with_required_votes(5),
            )
            .await
            .unwrap();

        engine
            .record_vote("prop-1", "a", 1.0, VoteOptions::default())
            .await
            .unwrap();
        engine
            .record_vote("prop-1", "b", 0.0, VoteOptions::default())
            .await
            .unwrap();

        // Let the deadline timer fire.
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(engine.get_proposal_status("prop-1").await.is_err());
        let decisions = store.decisions.lock().await;
        assert_eq!(decisions.len(), 1);
        // 1 yes of 2 votes is not a majority.
        assert_eq!(decisions[0].outcome, Some(Outcome::Rejected));
        assert_eq!(decisions[0].votes.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quorum_beats_timer() {
        let (engine, store) = engine_with_store();
        engine
            .create_proposal(
                "swarm-1",
                "prop-1",
                ProposalOptions::default()
                    .with_timeout(Duration::from_secs(60))
                    .with_required_votes(1),
            )
            .await
            .unwrap();

        let outcome = engine
            .record_vote("prop-1", "a", 1.0, VoteOptions::default())
            .await
            .unwrap();
        assert!(outcome.finalized().is_some());

        // The timer still fires later but must not write a second decision.
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(store.decisions.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_revote_overwrites_mapping_but_audits_both() {
        let (engine, store) = engine_with_store();
        engine
            .create_proposal("swarm-1", "prop-1", ProposalOptions::default())
            .await
            .unwrap();

        engine
            .record_vote("prop-1", "a", 1.0, VoteOptions::default())
            .await
            .unwrap();
        engine
            .record_vote("prop-1", "a", 0.0, VoteOptions::default())
            .await
            .unwrap();

        let status = engine.get_proposal_status("prop-1").await.unwrap();
        assert_eq!(status.votes_received, 1);

        let history = engine.get_vote_history("prop-1").await.unwrap();
        assert_eq!(history.len(), 2);
        // Newest-first: the overwrite comes back first.
        assert_eq!(history[0].vote, 0.0);
        assert_eq!(history[1].vote, 1.0);

        // The replaced value decides the round.
        let decision = engine.finalize_voting("prop-1").await.unwrap();
        assert_eq!(decision.outcome, Some(Outcome::Rejected));
        assert_eq!(store.votes.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_audit_write_leaves_mapping_untouched() {
        let (engine, store) = engine_with_store();
        engine
            .create_proposal("swarm-1", "prop-1", ProposalOptions::default())
            .await
            .unwrap();

        store.fail_writes.store(true, Ordering::SeqCst);
        let err = engine
            .record_vote("prop-1", "a", 1.0, VoteOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Audit(_)));

        // Audit-first: the rejected vote never reached the live mapping.
        let status = engine.get_proposal_status("prop-1").await.unwrap();
        assert_eq!(status.votes_received, 0);
    }

    #[tokio::test]
    async fn test_concurrent_finalize_single_decision() {
        let (engine, store) = engine_with_store();
        engine
            .create_proposal("swarm-1", "prop-1", ProposalOptions::default())
            .await
            .unwrap();
        engine
            .record_vote("prop-1", "a", 1.0, VoteOptions::default())
            .await
            .unwrap();

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..8 {
            let engine = engine.clone();
            tasks.spawn(async move { engine.finalize_voting("prop-1").await });
        }

        let mut winners = 0;
        while let Some(result) = tasks.join_next().await {
            match result.unwrap() {
                Ok(_) => winners += 1,
                Err(e) => assert!(e.is_settled()),
            }
        }
        assert_eq!(winners, 1);
        assert_eq!(store.decisions.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_decision_history_limit_and_order() {
        let (engine, _store) = engine_with_store();
        for i in 0..3 {
            let id = format!("prop-{i}");
            engine
                .create_proposal("swarm-1", &id, ProposalOptions::default())
                .await
                .unwrap();
            engine
                .record_vote(&id, "a", 1.0, VoteOptions::default())
                .await
                .unwrap();
            engine.finalize_voting(&id).await.unwrap();
        }

        let history = engine
            .get_decision_history(&SwarmId::new("swarm-1"), 2)
            .await
            .unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].proposal_id, "prop-2");
        assert_eq!(history[1].proposal_id, "prop-1");
    }
}
