//! Vote weight resolution port
//!
//! The engine never derives a vote weight itself; when a session runs with
//! auto-weighting, the weight for each voter is looked up through this
//! port (e.g. from a role registry where a queen outweighs workers).

use async_trait::async_trait;
use hive_domain::{AgentId, SwarmId};

/// Resolves the vote weight for an agent.
#[async_trait]
pub trait VoteWeightResolver: Send + Sync {
    /// Weight for the agent's vote (≥ 0).
    async fn resolve(&self, swarm_id: &SwarmId, agent_id: &AgentId) -> f64;
}

/// Resolver that gives every agent the same fixed weight.
///
/// `FixedWeight::default()` is the plain one-agent-one-vote case.
pub struct FixedWeight(pub f64);

impl Default for FixedWeight {
    fn default() -> Self {
        Self(1.0)
    }
}

#[async_trait]
impl VoteWeightResolver for FixedWeight {
    async fn resolve(&self, _swarm_id: &SwarmId, _agent_id: &AgentId) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_weight_default() {
        let resolver = FixedWeight::default();
        let weight = resolver
            .resolve(&SwarmId::new("s"), &AgentId::new("a"))
            .await;
        assert_eq!(weight, 1.0);
    }
}
