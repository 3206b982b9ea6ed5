//! Domain layer for hive-consensus
//!
//! This crate contains the core business logic for swarm decision making:
//! proposals, vote records, quorum algorithms, and finalized decisions.
//! It has no dependencies on infrastructure or transport concerns.
//!
//! # Core Concepts
//!
//! ## Proposal
//!
//! One voting round: a fixed quorum algorithm, a bounded time window, and
//! a live per-agent vote mapping. A later vote from the same agent replaces
//! the earlier one in the mapping; the append-only audit trail (owned by
//! the application layer's audit store port) keeps every submission.
//!
//! ## Quorum
//!
//! Three algorithms decide a round: simple majority (> 50% of voters),
//! Byzantine supermajority (≥ 2/3 of voters), and weight-adjusted majority
//! (> 50% of total vote weight). All of them read a vote value strictly
//! above `0.5` as "yes".

pub mod agent;
pub mod decision;
pub mod error;
pub mod proposal;
pub mod quorum;
pub mod vote;

// Re-export commonly used types
pub use agent::{AgentId, SwarmId};
pub use decision::Decision;
pub use error::ConsensusError;
pub use proposal::{DEFAULT_TIMEOUT, Proposal, ProposalOptions, ProposalStatus};
pub use quorum::{ConsensusAlgorithm, Outcome, Tally, TallyDetails};
pub use vote::{VoteRecord, VoteValue};
