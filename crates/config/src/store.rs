//! Snapshot store configuration
//!
//! Where the channel and video snapshot tables live.

use serde::Deserialize;

/// Default connection URL
pub const DEFAULT_STORE_URL: &str = "postgres://postgres@localhost:5432/youtube_dashboard";

/// Store backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// PostgreSQL (production)
    Postgres,
    /// SQLite file (local)
    Sqlite,
}

/// Store configuration
///
/// If `backend` is not set it is inferred from the URL scheme.
///
/// # Example
///
/// ```toml
/// [store]
/// url = "postgres://dashboard@db:5432/youtube_dashboard"
/// channel_table = "channel_stats"
/// video_table = "video_stats"
/// order_column = "fetched_at"
///
/// # Or a local SQLite file
/// [store]
/// url = "sqlite://data/stats.db"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend type
    /// Default: inferred from url
    pub backend: Option<StoreBackend>,

    /// Connection URL
    /// Default: "postgres://postgres@localhost:5432/youtube_dashboard"
    pub url: String,

    /// Channel snapshot table
    /// Default: "channel_stats"
    pub channel_table: String,

    /// Video snapshot table
    /// Default: "video_stats"
    pub video_table: String,

    /// Column both tables are ordered by
    /// Default: "fetched_at"
    pub order_column: String,

    /// Connection pool size
    /// Default: 4
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: None,
            url: DEFAULT_STORE_URL.to_string(),
            channel_table: "channel_stats".to_string(),
            video_table: "video_stats".to_string(),
            order_column: "fetched_at".to_string(),
            max_connections: 4,
        }
    }
}

impl StoreConfig {
    /// Get the effective backend
    ///
    /// `sqlite:` URLs select SQLite, everything else PostgreSQL.
    pub fn effective_backend(&self) -> StoreBackend {
        self.backend.unwrap_or_else(|| {
            if self.url.starts_with("sqlite:") {
                StoreBackend::Sqlite
            } else {
                StoreBackend::Postgres
            }
        })
    }
}
