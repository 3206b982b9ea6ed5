//! Session event port
//!
//! Lifecycle events emitted by a vote-collection session for external
//! observers (dashboards, notification senders). Implementations live
//! outside the application layer; `NoObserver` is the default when nobody
//! is listening.

use hive_domain::{AgentId, Outcome, TallyDetails};
use std::time::Duration;

/// Events emitted by a vote-collection session.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A roster member's vote was accepted by the engine.
    VoteReceived {
        proposal_id: String,
        agent_id: AgentId,
        vote: f64,
        weight: f64,
        votes_received: usize,
        total_agents: usize,
    },
    /// Periodic coverage report while the session is still collecting.
    Progress {
        proposal_id: String,
        votes_received: usize,
        total_agents: usize,
        time_remaining: Duration,
    },
    /// The round finalized and produced a decision.
    Completed {
        proposal_id: String,
        outcome: Option<Outcome>,
        confidence: f64,
        details: TallyDetails,
        votes_received: usize,
        total_agents: usize,
    },
    /// A finalize attempt failed (e.g. the engine's timer won the race).
    Error { proposal_id: String, error: String },
    /// The session was cancelled before finalizing.
    Cancelled { proposal_id: String },
}

/// Observer for session lifecycle events.
///
/// Callbacks must not block; heavy consumers should hand events off to
/// their own channel.
pub trait SessionObserver: Send + Sync {
    fn on_event(&self, event: SessionEvent);
}

/// No-op observer for when event reporting is not needed.
pub struct NoObserver;

impl SessionObserver for NoObserver {
    fn on_event(&self, _event: SessionEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Test observer that records every event it sees.
    pub struct RecordingObserver(pub Mutex<Vec<SessionEvent>>);

    impl SessionObserver for RecordingObserver {
        fn on_event(&self, event: SessionEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    #[test]
    fn test_no_observer_ignores_events() {
        // Just exercises the default impl.
        NoObserver.on_event(SessionEvent::Cancelled {
            proposal_id: "p".to_string(),
        });
    }

    #[test]
    fn test_recording_observer_collects() {
        let observer = RecordingObserver(Mutex::new(Vec::new()));
        observer.on_event(SessionEvent::Cancelled {
            proposal_id: "p".to_string(),
        });
        assert_eq!(observer.0.lock().unwrap().len(), 1);
    }
}
