//! Snapshot cache configuration

use serde::Deserialize;
use std::time::Duration;

/// Cache configuration
///
/// # Example
///
/// ```toml
/// [cache]
/// ttl = "30s"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    /// How long loaded tables are served before re-reading the store
    /// Default: 30s
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30),
        }
    }
}
