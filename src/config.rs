//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::time::Duration;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Memory budget as a capacity string, e.g. "64MB"
    pub max_memory: String,
    /// Seconds between background expiry sweeps
    pub reclaim_interval_secs: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_MEMORY` - Memory budget (default: "64MB")
    /// - `CACHE_RECLAIM_INTERVAL` - Sweep period in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            max_memory: env::var("CACHE_MAX_MEMORY")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.max_memory),
            reclaim_interval_secs: env::var("CACHE_RECLAIM_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.reclaim_interval_secs),
        }
    }

    /// Returns the sweep period as a Duration.
    pub fn reclaim_interval(&self) -> Duration {
        Duration::from_secs(self.reclaim_interval_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_memory: "64MB".to_string(),
            reclaim_interval_secs: 1,
        }
    }
}
