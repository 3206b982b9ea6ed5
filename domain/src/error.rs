//! Domain error types

use thiserror::Error;

/// Errors raised by the consensus domain and surfaced unchanged to callers.
///
/// Each variant is specific enough for an external layer to translate into
/// a precise error message; none of them are retried internally.
#[derive(Error, Debug)]
pub enum ConsensusError {
    /// The proposal id is unknown or was already removed at finalization.
    #[error("Proposal not found: {0}")]
    ProposalNotFound(String),

    /// The proposal exists but is no longer accepting votes.
    #[error("Proposal {0} is not active")]
    ProposalNotActive(String),

    /// A concurrent finalize won the race for this proposal.
    #[error("Proposal {0} was already finalized")]
    AlreadyFinalized(String),

    /// Vote value outside the [0, 1] range.
    #[error("Invalid vote value {0} (must be between 0 and 1)")]
    InvalidVote(f64),

    /// A proposal id was reused while the original is still active.
    #[error("Proposal {0} already exists")]
    DuplicateProposal(String),

    /// No collection session exists for the given proposal id.
    #[error("No vote collection session for proposal {0}")]
    SessionNotFound(String),

    /// The agent is not a member of the session's roster.
    #[error("Agent {agent} is not authorized to vote on proposal {proposal}")]
    UnauthorizedVoter { proposal: String, agent: String },

    /// A roster with no members cannot collect votes.
    #[error("Vote collection requires a non-empty roster")]
    EmptyRoster,
}

impl ConsensusError {
    /// Check whether this error means the proposal is already settled,
    /// i.e. a finalize attempt lost the race rather than genuinely failed.
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            ConsensusError::AlreadyFinalized(_) | ConsensusError::ProposalNotFound(_)
        )
    }
}
