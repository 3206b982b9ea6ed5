//! Use cases: the consensus engine and the vote-collection session layer.

pub mod collector;
pub mod engine;

pub use collector::{
    CollectionOptions, CollectionStarted, DEFAULT_PROGRESS_INTERVAL, SessionStatus,
    SessionStatusView, VoteCollector,
};
pub use engine::{
    ConsensusEngine, EngineError, FinalizedDecision, ProposalStatusView, VoteOptions, VoteOutcome,
};
