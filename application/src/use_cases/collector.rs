//! Vote-collection session use case
//!
//! Wraps an engine proposal with a fixed agent roster: tracks which roster
//! members have voted, enforces that only roster members may vote, drives
//! finalization on full coverage or timeout, and emits lifecycle events
//! for external observers.
//!
//! The engine's finalize-once guard stays the single source of truth: the
//! session always goes through the engine and tolerates losing a finalize
//! race to the engine's own deadline timer.

use crate::ports::agent_notifier::{AgentNotifier, NoNotifier};
use crate::ports::observer::{NoObserver, SessionEvent, SessionObserver};
use crate::ports::weight_resolver::{FixedWeight, VoteWeightResolver};
use crate::use_cases::engine::{ConsensusEngine, EngineError, VoteOptions, VoteOutcome};
use hive_domain::{
    AgentId, ConsensusAlgorithm, ConsensusError, DEFAULT_TIMEOUT, Outcome, ProposalOptions,
    SwarmId, TallyDetails,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default interval between progress checks.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// Configuration for a collection session.
#[derive(Debug, Clone)]
pub struct CollectionOptions {
    /// Quorum rule for the underlying proposal.
    pub algorithm: ConsensusAlgorithm,
    /// Voting window shared by the session and the engine proposal.
    pub timeout: Duration,
    /// Resolve per-agent weights through the weight resolver port instead
    /// of the default 1.0.
    pub auto_weighting: bool,
    /// Human-readable topic of the vote.
    pub description: Option<String>,
    /// Opaque caller metadata, carried through to the proposal.
    pub metadata: serde_json::Value,
    /// Interval between progress checks.
    pub progress_interval: Duration,
}

impl Default for CollectionOptions {
    fn default() -> Self {
        Self {
            algorithm: ConsensusAlgorithm::default(),
            timeout: DEFAULT_TIMEOUT,
            auto_weighting: false,
            description: None,
            metadata: serde_json::Value::Null,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl CollectionOptions {
    pub fn with_algorithm(mut self, algorithm: ConsensusAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_auto_weighting(mut self) -> Self {
        self.auto_weighting = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }
}

/// Returned by `start_collection`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionStarted {
    pub proposal_id: String,
    pub status: SessionStatus,
    /// Number of roster members expected to vote.
    pub agents_to_vote: usize,
    pub timeout: Duration,
}

/// Lifecycle state of a collection session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Collecting,
    Finalized,
    Cancelled,
}

/// Read-only snapshot of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatusView {
    pub proposal_id: String,
    pub swarm_id: SwarmId,
    pub status: SessionStatus,
    pub votes_received: usize,
    pub total_agents: usize,
    pub time_remaining: Duration,
    pub auto_weighting: bool,
}

struct Session {
    swarm_id: SwarmId,
    /// Fixed at session start; never grows.
    roster: HashSet<AgentId>,
    /// Roster members that have voted at least once. Re-voting does not
    /// grow this set.
    voted: HashSet<AgentId>,
    auto_weighting: bool,
    started_at: Instant,
    timeout: Duration,
    status: SessionStatus,
}

impl Session {
    fn time_remaining(&self) -> Duration {
        self.timeout.saturating_sub(self.started_at.elapsed())
    }
}

/// Vote-collection sessions over a shared consensus engine.
///
/// Cheap to clone; all clones share the same session registry.
#[derive(Clone)]
pub struct VoteCollector {
    engine: ConsensusEngine,
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    observer: Arc<dyn SessionObserver>,
    weights: Arc<dyn VoteWeightResolver>,
    notifier: Arc<dyn AgentNotifier>,
    shutdown: CancellationToken,
}

impl VoteCollector {
    pub fn new(engine: ConsensusEngine) -> Self {
        Self {
            engine,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            observer: Arc::new(NoObserver),
            weights: Arc::new(FixedWeight::default()),
            notifier: Arc::new(NoNotifier),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_weight_resolver(mut self, weights: Arc<dyn VoteWeightResolver>) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn AgentNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Open a collection session: create the engine proposal with
    /// `required_votes = roster size`, notify the roster, and start the
    /// periodic progress check.
    pub async fn start_collection(
        &self,
        swarm_id: impl Into<SwarmId>,
        proposal_id: impl Into<String>,
        roster: Vec<AgentId>,
        options: CollectionOptions,
    ) -> Result<CollectionStarted, EngineError> {
        let swarm_id = swarm_id.into();
        let proposal_id = proposal_id.into();
        let roster: HashSet<AgentId> = roster.into_iter().collect();
        if roster.is_empty() {
            return Err(ConsensusError::EmptyRoster.into());
        }

        let mut proposal_options = ProposalOptions::default()
            .with_algorithm(options.algorithm)
            .with_timeout(options.timeout)
            .with_required_votes(roster.len())
            .with_metadata(options.metadata.clone());
        if let Some(description) = &options.description {
            proposal_options = proposal_options.with_description(description.clone());
        }

        self.engine
            .create_proposal(swarm_id.clone(), proposal_id.clone(), proposal_options)
            .await?;

        {
            let mut sessions = self.sessions.write().await;
            sessions.insert(
                proposal_id.clone(),
                Session {
                    swarm_id: swarm_id.clone(),
                    roster: roster.clone(),
                    voted: HashSet::new(),
                    auto_weighting: options.auto_weighting,
                    started_at: Instant::now(),
                    timeout: options.timeout,
                    status: SessionStatus::Collecting,
                },
            );
        }

        info!(
            proposal_id = %proposal_id,
            swarm_id = %swarm_id,
            roster = roster.len(),
            algorithm = %options.algorithm,
            "Vote collection started"
        );

        self.notify_roster(swarm_id, proposal_id.clone(), roster.iter().cloned().collect());
        self.spawn_progress_check(proposal_id.clone(), options.progress_interval);

        Ok(CollectionStarted {
            proposal_id,
            status: SessionStatus::Collecting,
            agents_to_vote: roster.len(),
            timeout: options.timeout,
        })
    }

    /// Fire-and-forget vote requests to every roster member.
    fn notify_roster(&self, swarm_id: SwarmId, proposal_id: String, roster: Vec<AgentId>) {
        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            for agent_id in &roster {
                if let Err(e) = notifier
                    .notify_vote_requested(&swarm_id, &proposal_id, agent_id)
                    .await
                {
                    warn!(
                        proposal_id = %proposal_id,
                        agent_id = %agent_id,
                        error = %e,
                        "Vote request notification failed"
                    );
                }
            }
        });
    }

    fn spawn_progress_check(&self, proposal_id: String, interval: Duration) {
        let collector = self.clone();
        let cancel = self.shutdown.child_token();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker.tick().await; // first tick completes immediately
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                if !collector.progress_tick(&proposal_id).await {
                    break;
                }
            }
        });
    }

    /// One progress check. Returns false once the session is gone or has
    /// been driven to finalization.
    async fn progress_tick(&self, proposal_id: &str) -> bool {
        let (expired, event) = {
            let sessions = self.sessions.read().await;
            let Some(session) = sessions.get(proposal_id) else {
                return false;
            };
            if session.status != SessionStatus::Collecting {
                return false;
            }
            let expired = session.started_at.elapsed() >= session.timeout;
            let event = SessionEvent::Progress {
                proposal_id: proposal_id.to_string(),
                votes_received: session.voted.len(),
                total_agents: session.roster.len(),
                time_remaining: session.time_remaining(),
            };
            (expired, event)
        };

        if expired {
            // Partial coverage is valid at timeout; the algorithms operate
            // over however many votes arrived.
            self.finalize_session(proposal_id).await;
            false
        } else {
            self.observer.on_event(event);
            true
        }
    }

    /// Submit a roster member's vote.
    ///
    /// Roster membership is enforced here and only here; the engine has no
    /// notion of rosters. Re-voting replaces the agent's current vote in
    /// the engine and appends a fresh audit entry, but does not grow the
    /// coverage set.
    pub async fn submit_vote(
        &self,
        proposal_id: &str,
        agent_id: impl Into<AgentId>,
        value: f64,
        justification: Option<String>,
    ) -> Result<VoteOutcome, EngineError> {
        let agent_id = agent_id.into();

        let (swarm_id, auto_weighting) = {
            let sessions = self.sessions.read().await;
            let session = sessions
                .get(proposal_id)
                .ok_or_else(|| ConsensusError::SessionNotFound(proposal_id.to_string()))?;
            if !session.roster.contains(&agent_id) {
                return Err(ConsensusError::UnauthorizedVoter {
                    proposal: proposal_id.to_string(),
                    agent: agent_id.to_string(),
                }
                .into());
            }
            (session.swarm_id.clone(), session.auto_weighting)
        };

        let weight = if auto_weighting {
            self.weights.resolve(&swarm_id, &agent_id).await
        } else {
            1.0
        };

        let mut options = VoteOptions::default().with_weight(weight);
        if let Some(justification) = justification {
            options = options.with_justification(justification);
        }

        let outcome = self
            .engine
            .record_vote(proposal_id, agent_id.clone(), value, options)
            .await?;

        // Build the event under the lock, emit it after: a slow observer
        // must not stall other session operations.
        let (event, full_coverage) = {
            let mut sessions = self.sessions.write().await;
            let Some(session) = sessions.get_mut(proposal_id) else {
                // Session cancelled while the vote was in flight; the
                // engine already accepted it.
                return Ok(outcome);
            };
            session.voted.insert(agent_id.clone());
            let event = SessionEvent::VoteReceived {
                proposal_id: proposal_id.to_string(),
                agent_id: agent_id.clone(),
                vote: value,
                weight,
                votes_received: session.voted.len(),
                total_agents: session.roster.len(),
            };
            (event, session.voted.len() == session.roster.len())
        };
        self.observer.on_event(event);

        match &outcome {
            VoteOutcome::Finalized(decision) => {
                // The engine finalized inside record_vote (required votes
                // reached); complete the session from that decision rather
                // than issuing a second finalize that would always lose.
                debug!(proposal_id = %proposal_id, "Session completed by required-votes quorum");
                self.complete_session(
                    proposal_id,
                    decision.outcome,
                    decision.confidence,
                    decision.details.clone(),
                )
                .await;
            }
            VoteOutcome::Pending { .. } if full_coverage => {
                self.finalize_session(proposal_id).await;
            }
            VoteOutcome::Pending { .. } => {}
        }

        Ok(outcome)
    }

    /// Finalize through the engine. Triggered by full roster coverage or
    /// by the session timeout; the `Collecting -> Finalized` transition
    /// guards against double entry.
    async fn finalize_session(&self, proposal_id: &str) {
        {
            let mut sessions = self.sessions.write().await;
            let Some(session) = sessions.get_mut(proposal_id) else {
                return;
            };
            if session.status != SessionStatus::Collecting {
                return;
            }
            session.status = SessionStatus::Finalized;
        }

        match self.engine.finalize_voting(proposal_id).await {
            Ok(decision) => {
                self.complete_session(
                    proposal_id,
                    decision.outcome,
                    decision.confidence,
                    decision.details,
                )
                .await;
            }
            Err(e) => {
                // Typically the engine's deadline timer won the race. Not
                // fatal to the session's bookkeeping: report and withdraw.
                warn!(proposal_id = %proposal_id, error = %e, "Session finalize rejected by engine");
                self.observer.on_event(SessionEvent::Error {
                    proposal_id: proposal_id.to_string(),
                    error: e.to_string(),
                });
                self.sessions.write().await.remove(proposal_id);
            }
        }
    }

    /// Emit `Completed` and drop the session.
    async fn complete_session(
        &self,
        proposal_id: &str,
        outcome: Option<Outcome>,
        confidence: f64,
        details: TallyDetails,
    ) {
        let Some(session) = self.sessions.write().await.remove(proposal_id) else {
            return;
        };
        self.observer.on_event(SessionEvent::Completed {
            proposal_id: proposal_id.to_string(),
            outcome,
            confidence,
            details,
            votes_received: session.voted.len(),
            total_agents: session.roster.len(),
        });
    }

    /// Cancel the session immediately.
    ///
    /// Deliberately leaves the underlying engine proposal (and its
    /// deadline timer) running: it will still auto-finalize and write a
    /// decision nobody is listening for.
    pub async fn cancel_session(&self, proposal_id: &str) -> Result<(), EngineError> {
        let mut sessions = self.sessions.write().await;
        sessions
            .remove(proposal_id)
            .ok_or_else(|| ConsensusError::SessionNotFound(proposal_id.to_string()))?;
        drop(sessions);

        info!(proposal_id = %proposal_id, "Vote collection cancelled");
        self.observer.on_event(SessionEvent::Cancelled {
            proposal_id: proposal_id.to_string(),
        });
        Ok(())
    }

    /// Snapshot of one session.
    pub async fn get_status(&self, proposal_id: &str) -> Result<SessionStatusView, EngineError> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(proposal_id)
            .ok_or_else(|| ConsensusError::SessionNotFound(proposal_id.to_string()))?;
        Ok(SessionStatusView {
            proposal_id: proposal_id.to_string(),
            swarm_id: session.swarm_id.clone(),
            status: session.status,
            votes_received: session.voted.len(),
            total_agents: session.roster.len(),
            time_remaining: session.time_remaining(),
            auto_weighting: session.auto_weighting,
        })
    }

    /// The engine shared by these sessions.
    pub fn engine(&self) -> &ConsensusEngine {
        &self.engine
    }

    /// Stop the progress checks. Session state is left in place.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
