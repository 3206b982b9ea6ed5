//! Infrastructure layer for hive-consensus
//!
//! Adapters implementing the application layer's ports: audit persistence
//! (in-memory and JSONL file) and configuration loading.

pub mod audit;
pub mod config;

// Re-export commonly used types
pub use audit::{InMemoryAuditStore, JsonlAuditStore};
pub use config::{ConfigLoader, FileConfig};
