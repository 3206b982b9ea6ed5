//! Quorum consensus domain
//!
//! This module contains the rules used to turn a set of agent votes into a
//! collective decision.
//!
//! # Core Concepts
//!
//! ## Quorum Algorithm
//! Each proposal is configured with one of three algorithms: simple
//! majority, Byzantine two-thirds supermajority, or weight-adjusted
//! majority. All three read a vote value strictly above `0.5` as "yes".
//!
//! ## Tally
//! Evaluating the current vote set under an algorithm produces a [`Tally`]:
//! an optional outcome (a round with no votes has none), a confidence in
//! `[0, 1]`, and algorithm-specific evidence such as the Byzantine
//! threshold.

pub mod algorithm;
pub mod tally;

// Re-export main types
pub use algorithm::ConsensusAlgorithm;
pub use tally::{Outcome, Tally, TallyDetails};
