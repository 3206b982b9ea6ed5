//! Tally types: the outcome of evaluating a vote set under a quorum rule.

use serde::{Deserialize, Serialize};

/// Outcome of a finalized voting round.
///
/// A round with no votes at all finalizes with no outcome (`None` at the
/// [`Tally`] level), which is distinct from an explicit rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The proposal met its quorum rule.
    Approved,
    /// The proposal failed its quorum rule.
    Rejected,
}

impl Outcome {
    /// Check if the outcome is approved.
    pub fn is_approved(&self) -> bool {
        matches!(self, Outcome::Approved)
    }

    /// Build an outcome from a pass/fail flag.
    pub fn from_passed(passed: bool) -> Self {
        if passed {
            Outcome::Approved
        } else {
            Outcome::Rejected
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Approved => write!(f, "approved"),
            Outcome::Rejected => write!(f, "rejected"),
        }
    }
}

/// Algorithm-specific evidence behind a tally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "lowercase")]
pub enum TallyDetails {
    /// Simple majority: yes votes vs. total voters.
    Majority { yes_votes: usize, total_votes: usize },
    /// Byzantine supermajority: threshold is `ceil(total * 2/3)`.
    Byzantine {
        threshold: usize,
        yes_votes: usize,
        total_votes: usize,
        met: bool,
    },
    /// Weight-adjusted: sum of yes weights vs. sum of all weights.
    Weighted { weighted_yes: f64, total_weight: f64 },
}

/// Result of evaluating the current vote set under a quorum algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    /// `None` when no votes were cast.
    pub outcome: Option<Outcome>,
    /// Approval strength in `[0, 1]` (yes share of votes or weight).
    pub confidence: f64,
    /// Algorithm-specific evidence.
    pub details: TallyDetails,
}

impl Tally {
    /// Whether the tally approved the proposal.
    pub fn is_approved(&self) -> bool {
        self.outcome.is_some_and(|o| o.is_approved())
    }
}
