//! Roster notification port
//!
//! When a collection session opens, each roster member is told that a vote
//! is requested. Delivery is fire-and-forget from the session's
//! perspective: failures are logged, never propagated.

use async_trait::async_trait;
use hive_domain::{AgentId, SwarmId};

/// Notifies agents that a proposal is open for voting.
#[async_trait]
pub trait AgentNotifier: Send + Sync {
    /// Ask one agent to vote on a proposal.
    ///
    /// Errors are the implementation's own; the session logs and ignores
    /// them.
    async fn notify_vote_requested(
        &self,
        swarm_id: &SwarmId,
        proposal_id: &str,
        agent_id: &AgentId,
    ) -> Result<(), String>;
}

/// No-op notifier for when agents poll for proposals themselves.
pub struct NoNotifier;

#[async_trait]
impl AgentNotifier for NoNotifier {
    async fn notify_vote_requested(
        &self,
        _swarm_id: &SwarmId,
        _proposal_id: &str,
        _agent_id: &AgentId,
    ) -> Result<(), String> {
        Ok(())
    }
}
