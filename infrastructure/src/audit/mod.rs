//! Audit store adapters implementing the application layer's port.

pub mod jsonl;
pub mod memory;

pub use jsonl::JsonlAuditStore;
pub use memory::InMemoryAuditStore;
