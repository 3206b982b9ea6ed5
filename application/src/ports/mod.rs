//! Port definitions (interfaces to be implemented by outer layers)

pub mod agent_notifier;
pub mod audit_store;
pub mod observer;
pub mod weight_resolver;

pub use agent_notifier::{AgentNotifier, NoNotifier};
pub use audit_store::{AuditStore, AuditStoreError, DecisionAuditEntry, VoteAuditEntry};
pub use observer::{NoObserver, SessionEvent, SessionObserver};
pub use weight_resolver::{FixedWeight, VoteWeightResolver};
