//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use hive_domain::ConsensusAlgorithm;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("timeout_ms cannot be 0")]
    InvalidTimeout,

    #[error("progress_interval_ms cannot be 0")]
    InvalidProgressInterval,
}

/// Raw consensus configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConsensusConfig {
    /// Default quorum algorithm for new proposals
    pub algorithm: ConsensusAlgorithm,
    /// Default voting window in milliseconds
    pub timeout_ms: u64,
    /// Interval between session progress checks in milliseconds
    pub progress_interval_ms: u64,
}

impl Default for FileConsensusConfig {
    fn default() -> Self {
        Self {
            algorithm: ConsensusAlgorithm::Majority,
            timeout_ms: 60_000,
            progress_interval_ms: 1_000,
        }
    }
}

/// Raw audit configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAuditConfig {
    /// Path of the JSONL audit file; `None` keeps the trail in memory
    pub log_path: Option<PathBuf>,
}

/// Complete configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub consensus: FileConsensusConfig,
    pub audit: FileAuditConfig,
}

impl FileConfig {
    /// Validate the loaded configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.consensus.timeout_ms == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.consensus.progress_interval_ms == 0 {
            return Err(ConfigValidationError::InvalidProgressInterval);
        }
        Ok(())
    }

    /// Default voting window as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.consensus.timeout_ms)
    }

    /// Progress check interval as a `Duration`.
    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.consensus.progress_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileConfig::default();
        assert_eq!(config.consensus.algorithm, ConsensusAlgorithm::Majority);
        assert_eq!(config.timeout(), Duration::from_millis(60_000));
        assert_eq!(config.progress_interval(), Duration::from_secs(1));
        assert!(config.audit.log_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: FileConfig = toml::from_str(
            r#"
            [consensus]
            algorithm = "byzantine"
            timeout_ms = 5000
            "#,
        )
        .unwrap();

        assert_eq!(config.consensus.algorithm, ConsensusAlgorithm::Byzantine);
        assert_eq!(config.consensus.timeout_ms, 5000);
        // Unspecified keys fall back to defaults.
        assert_eq!(config.consensus.progress_interval_ms, 1_000);
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = FileConfig::default();
        config.consensus.timeout_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidTimeout)
        ));
    }
}
