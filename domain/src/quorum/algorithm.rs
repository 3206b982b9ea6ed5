//! Quorum algorithms for consensus determination
//!
//! Three rules are supported, all treating "yes" identically as a vote
//! value strictly greater than `0.5`:
//!
//! - `Majority`: more than half of the voters say yes (default)
//! - `Byzantine`: at least `ceil(total * 2/3)` voters say yes
//! - `Weighted`: more than half of the total vote weight says yes

use super::tally::{Outcome, Tally, TallyDetails};
use crate::vote::VoteRecord;
use serde::{Deserialize, Serialize};

/// Quorum rule used to decide a voting round.
///
/// # Example
///
/// ```
/// use hive_domain::{ConsensusAlgorithm, VoteRecord, VoteValue};
///
/// let votes: Vec<VoteRecord> = [1.0, 1.0, 1.0, 0.0, 0.0]
///     .iter()
///     .enumerate()
///     .map(|(i, &v)| VoteRecord::new(format!("agent-{i}"), VoteValue::new(v).unwrap()))
///     .collect();
///
/// let tally = ConsensusAlgorithm::Majority.evaluate(&votes);
/// assert!(tally.is_approved()); // 3/5 > 50%
/// assert_eq!(tally.confidence, 0.6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusAlgorithm {
    /// Strictly more than half of the voters must approve.
    #[default]
    Majority,
    /// At least a two-thirds supermajority (`ceil(total * 2/3)`) must approve.
    Byzantine,
    /// Strictly more than half of the total vote weight must approve.
    Weighted,
}

impl ConsensusAlgorithm {
    /// Evaluate the current vote set under this rule.
    ///
    /// An empty vote set yields no outcome and zero confidence for every
    /// algorithm.
    pub fn evaluate(&self, votes: &[VoteRecord]) -> Tally {
        if votes.is_empty() {
            return Tally {
                outcome: None,
                confidence: 0.0,
                details: self.empty_details(),
            };
        }

        let total = votes.len();
        let yes = votes.iter().filter(|v| v.is_yes()).count();

        match self {
            ConsensusAlgorithm::Majority => {
                let ratio = yes as f64 / total as f64;
                Tally {
                    outcome: Some(Outcome::from_passed(ratio > 0.5)),
                    confidence: ratio,
                    details: TallyDetails::Majority {
                        yes_votes: yes,
                        total_votes: total,
                    },
                }
            }
            ConsensusAlgorithm::Byzantine => {
                let threshold = (total as f64 * 2.0 / 3.0).ceil() as usize;
                let met = yes >= threshold;
                Tally {
                    outcome: Some(Outcome::from_passed(met)),
                    confidence: yes as f64 / total as f64,
                    details: TallyDetails::Byzantine {
                        threshold,
                        yes_votes: yes,
                        total_votes: total,
                        met,
                    },
                }
            }
            ConsensusAlgorithm::Weighted => {
                let total_weight: f64 = votes.iter().map(|v| v.weight).sum();
                let weighted_yes: f64 =
                    votes.iter().filter(|v| v.is_yes()).map(|v| v.weight).sum();
                let ratio = if total_weight > 0.0 {
                    weighted_yes / total_weight
                } else {
                    0.0
                };
                Tally {
                    outcome: Some(Outcome::from_passed(ratio > 0.5)),
                    confidence: ratio,
                    details: TallyDetails::Weighted {
                        weighted_yes,
                        total_weight,
                    },
                }
            }
        }
    }

    fn empty_details(&self) -> TallyDetails {
        match self {
            ConsensusAlgorithm::Majority => TallyDetails::Majority {
                yes_votes: 0,
                total_votes: 0,
            },
            ConsensusAlgorithm::Byzantine => TallyDetails::Byzantine {
                threshold: 0,
                yes_votes: 0,
                total_votes: 0,
                met: false,
            },
            ConsensusAlgorithm::Weighted => TallyDetails::Weighted {
                weighted_yes: 0.0,
                total_weight: 0.0,
            },
        }
    }

    /// Short identifier used in audit records and config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsensusAlgorithm::Majority => "majority",
            ConsensusAlgorithm::Byzantine => "byzantine",
            ConsensusAlgorithm::Weighted => "weighted",
        }
    }
}

impl std::fmt::Display for ConsensusAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ConsensusAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "majority" => Ok(ConsensusAlgorithm::Majority),
            "byzantine" => Ok(ConsensusAlgorithm::Byzantine),
            "weighted" => Ok(ConsensusAlgorithm::Weighted),
            _ => Err(format!(
                "Unknown consensus algorithm: {}. Valid: majority, byzantine, weighted",
                s
            )),
        }
    }
}
