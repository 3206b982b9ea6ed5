//! Configuration loading (TOML files merged through figment).

pub mod file_config;
pub mod loader;

pub use file_config::{
    ConfigValidationError, FileAuditConfig, FileConfig, FileConsensusConfig,
};
pub use loader::ConfigLoader;
