//! Vote primitives for consensus decision making
//!
//! A vote carries a continuous "yes-ness" in `[0, 1]`; callers voting with a
//! plain boolean map it to `1.0` / `0.0` before it reaches the domain.

use crate::agent::AgentId;
use crate::error::ConsensusError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A vote value in the range `[0, 1]`.
///
/// Values strictly greater than `0.5` count as "yes" under every quorum
/// algorithm; exactly `0.5` never does.
///
/// # Example
///
/// ```
/// use hive_domain::VoteValue;
///
/// let yes = VoteValue::new(1.0).unwrap();
/// assert!(yes.is_yes());
///
/// let abstain = VoteValue::new(0.5).unwrap();
/// assert!(!abstain.is_yes());
///
/// assert!(VoteValue::new(1.2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteValue(f64);

impl VoteValue {
    /// Create a vote value, rejecting anything outside `[0, 1]`.
    pub fn new(value: f64) -> Result<Self, ConsensusError> {
        if !(0.0..=1.0).contains(&value) || value.is_nan() {
            return Err(ConsensusError::InvalidVote(value));
        }
        Ok(Self(value))
    }

    /// A full-strength approval (`1.0`).
    pub fn yes() -> Self {
        Self(1.0)
    }

    /// A full-strength rejection (`0.0`).
    pub fn no() -> Self {
        Self(0.0)
    }

    /// Map a boolean vote to `1.0` / `0.0`.
    pub fn from_bool(approved: bool) -> Self {
        if approved { Self::yes() } else { Self::no() }
    }

    /// The raw value.
    pub fn get(&self) -> f64 {
        self.0
    }

    /// Whether this vote counts as "yes" (strictly above `0.5`).
    pub fn is_yes(&self) -> bool {
        self.0 > 0.5
    }
}

/// An agent's current vote on a proposal.
///
/// The live vote mapping holds exactly one record per agent; a later vote
/// from the same agent replaces the earlier one there. The audit trail, in
/// contrast, keeps every submission ever made.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRecord {
    /// The voting agent.
    pub agent_id: AgentId,
    /// Vote value in `[0, 1]`.
    pub value: VoteValue,
    /// Vote weight (≥ 0, default 1.0). Supplied by the caller; the engine
    /// never derives it.
    pub weight: f64,
    /// Optional free-text reasoning behind the vote.
    pub justification: Option<String>,
    /// When this vote was recorded.
    pub timestamp: DateTime<Utc>,
}

impl VoteRecord {
    /// Create a vote record with the default weight of 1.0.
    pub fn new(agent_id: impl Into<AgentId>, value: VoteValue) -> Self {
        Self {
            agent_id: agent_id.into(),
            value,
            weight: 1.0,
            justification: None,
            timestamp: Utc::now(),
        }
    }

    /// Set the vote weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight.max(0.0);
        self
    }

    /// Attach a justification.
    pub fn with_justification(mut self, justification: impl Into<String>) -> Self {
        self.justification = Some(justification.into());
        self
    }

    /// Whether this vote counts as "yes".
    pub fn is_yes(&self) -> bool {
        self.value.is_yes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_value_range() {
        assert!(VoteValue::new(0.0).is_ok());
        assert!(VoteValue::new(1.0).is_ok());
        assert!(VoteValue::new(0.5).is_ok());
        assert!(VoteValue::new(-0.1).is_err());
        assert!(VoteValue::new(1.1).is_err());
        assert!(VoteValue::new(f64::NAN).is_err());
    }

    #[test]
    fn test_half_is_not_yes() {
        assert!(!VoteValue::new(0.5).unwrap().is_yes());
        assert!(VoteValue::new(0.51).unwrap().is_yes());
        assert!(!VoteValue::new(0.49).unwrap().is_yes());
    }

    #[test]
    fn test_from_bool() {
        assert_eq!(VoteValue::from_bool(true).get(), 1.0);
        assert_eq!(VoteValue::from_bool(false).get(), 0.0);
    }

    #[test]
    fn test_vote_record_builders() {
        let record = VoteRecord::new("queen", VoteValue::yes())
            .with_weight(3.0)
            .with_justification("Strategic priority");

        assert_eq!(record.agent_id.as_str(), "queen");
        assert_eq!(record.weight, 3.0);
        assert!(record.is_yes());
        assert_eq!(record.justification.as_deref(), Some("Strategic priority"));
    }

    #[test]
    fn test_negative_weight_clamped() {
        let record = VoteRecord::new("w", VoteValue::no()).with_weight(-2.0);
        assert_eq!(record.weight, 0.0);
    }
}
