//! Engine configuration.
//!
//! Deserializable from any serde format; missing fields take defaults.
//!
//! ```
//! use lob_core::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! assert_eq!(config.snapshot_depth, 10);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("snapshot_depth must be at least 1")]
    ZeroSnapshotDepth,
}

/// Tunables for books and book workers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Orders pre-allocated per book side
    pub order_capacity: usize,

    /// Levels per side published in worker snapshots
    pub snapshot_depth: usize,

    /// Bound of each worker's command queue; 0 means unbounded
    pub queue_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            order_capacity: 10_000,
            snapshot_depth: 10,
            queue_capacity: 0,
        }
    }
}

impl EngineConfig {
    /// Reject settings no book can run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.snapshot_depth == 0 {
            return Err(ConfigError::ZeroSnapshotDepth);
        }
        Ok(())
    }
}
