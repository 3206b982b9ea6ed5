//! Scripted voting scenarios loaded from TOML files
//!
//! A scenario describes one voting round end to end: the swarm, the agents
//! expected to vote, the quorum algorithm, and the votes to replay. The
//! `run` subcommand feeds it through a real collector and engine.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, bail};
use serde::Deserialize;

use hive_domain::ConsensusAlgorithm;

/// A complete voting round described in a TOML file.
///
/// ```toml
/// swarm_id = "alpha"
/// proposal_id = "scale-up"
/// description = "Scale worker pool to 8"
/// algorithm = "weighted"
/// roster = ["queen", "worker-1", "worker-2"]
///
/// [[votes]]
/// agent = "queen"
/// value = 0.9
/// weight = 3.0
/// justification = "load is climbing"
///
/// [[votes]]
/// agent = "worker-1"
/// approve = false
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub swarm_id: String,
    pub proposal_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub algorithm: ConsensusAlgorithm,
    /// Agents expected to vote. Votes from agents outside the roster are
    /// rejected by the collector, mirroring live operation.
    pub roster: Vec<String>,
    /// Voting window in milliseconds. The round ends early once every
    /// roster agent has voted.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub votes: Vec<ScenarioVote>,
}

fn default_timeout_ms() -> u64 {
    10_000
}

/// One scripted vote. Either `value` (a score in [0.0, 1.0]) or `approve`
/// (a plain boolean) must be set, not both.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioVote {
    pub agent: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub approve: Option<bool>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub justification: Option<String>,
}

impl Scenario {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = toml::from_str(&raw)
            .with_context(|| format!("failed to parse scenario file {}", path.display()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Agent weights declared in the scenario, for the weighted algorithm.
    pub fn weights(&self) -> HashMap<String, f64> {
        self.votes
            .iter()
            .filter_map(|v| v.weight.map(|w| (v.agent.clone(), w)))
            .collect()
    }

    pub fn has_weights(&self) -> bool {
        self.votes.iter().any(|v| v.weight.is_some())
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.roster.is_empty() {
            bail!("scenario roster is empty");
        }
        for vote in &self.votes {
            vote.vote_value().with_context(|| format!("vote by {}", vote.agent))?;
            if !self.roster.iter().any(|a| a == &vote.agent) {
                bail!("vote by {} but agent is not in the roster", vote.agent);
            }
        }
        Ok(())
    }
}

impl ScenarioVote {
    /// Normalizes the scripted vote to a score: `approve = true` becomes
    /// 1.0 and `approve = false` becomes 0.0.
    pub fn vote_value(&self) -> anyhow::Result<f64> {
        match (self.value, self.approve) {
            (Some(v), None) => Ok(v),
            (None, Some(b)) => Ok(if b { 1.0 } else { 0.0 }),
            (Some(_), Some(_)) => bail!("set either `value` or `approve`, not both"),
            (None, None) => bail!("missing `value` or `approve`"),
        }
    }
}
