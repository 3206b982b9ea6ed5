//! Application layer for hive-consensus
//!
//! This crate contains the two use cases of the decision subsystem (the
//! consensus engine and the vote-collection session layer) plus the port
//! definitions implemented by outer layers (audit persistence, session
//! event observation, weight resolution, roster notification).
//!
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    AgentNotifier, AuditStore, AuditStoreError, DecisionAuditEntry, FixedWeight, NoNotifier,
    NoObserver, SessionEvent, SessionObserver, VoteAuditEntry, VoteWeightResolver,
};
pub use use_cases::{
    CollectionOptions, CollectionStarted, ConsensusEngine, EngineError, FinalizedDecision,
    ProposalStatusView, SessionStatus, SessionStatusView, VoteCollector, VoteOptions, VoteOutcome,
};
