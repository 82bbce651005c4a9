//! vidstats Query - snapshot table access
//!
//! Provides a unified interface for reading the channel and video snapshot
//! tables from:
//! - **PostgreSQL**: Production store
//! - **SQLite**: Local files and tests
//!
//! # Usage
//!
//! ```ignore
//! use vidstats_query::{QueryConfig, QueryEngine, SnapshotCache, SnapshotSource, TableNames};
//!
//! let engine = QueryEngine::connect(&QueryConfig::postgres("postgres://localhost/stats")).await?;
//! let source = SnapshotSource::new(engine.backend(), TableNames::default())?;
//!
//! let cache = SnapshotCache::new(Duration::from_secs(30));
//! let tables = cache.get_or_load(&source).await?;
//! println!("videos: {}", tables.videos.row_count);
//! ```

pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod result;
pub mod source;

// Re-exports
pub use backend::postgres::PostgresBackend;
pub use backend::sqlite::SqliteBackend;
pub use backend::{QueryBackend, validate_identifier, validate_sql};
pub use cache::{CacheStats, DEFAULT_TTL, SnapshotCache};
pub use config::{QueryBackendType, QueryConfig};
pub use error::QueryError;
pub use result::{Column, DataType, QueryResult};
pub use source::{SnapshotSource, SnapshotTables, TableNames};

use std::sync::Arc;

/// Query engine that routes queries to the configured backend
#[derive(Clone)]
pub struct QueryEngine {
    backend: Arc<dyn QueryBackend>,
}

impl QueryEngine {
    /// Create a new query engine with a specific backend
    pub fn new(backend: impl QueryBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Connect the backend described by `config`
    pub async fn connect(config: &QueryConfig) -> Result<Self, QueryError> {
        match config.effective_backend()? {
            QueryBackendType::Postgres => {
                let backend = PostgresBackend::connect(&config.url, config.max_connections).await?;
                Ok(Self::new(backend))
            }
            QueryBackendType::Sqlite => {
                let backend = SqliteBackend::connect(&config.url, config.max_connections).await?;
                Ok(Self::new(backend))
            }
        }
    }

    /// Shared handle to the backend
    pub fn backend(&self) -> Arc<dyn QueryBackend> {
        Arc::clone(&self.backend)
    }

    /// Execute a SQL query
    pub async fn query(&self, sql: &str) -> Result<QueryResult, QueryError> {
        self.backend.execute(sql).await
    }

    /// Check if the backend is healthy
    pub async fn health_check(&self) -> Result<(), QueryError> {
        self.backend.health_check().await
    }

    /// Get the backend name
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }
}

/// Output format for tabular results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// ASCII table format (default)
    #[default]
    Table,
    /// JSON
    Json,
    /// CSV format
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("unknown format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_format_display_roundtrip() {
        for format in [OutputFormat::Table, OutputFormat::Json, OutputFormat::Csv] {
            assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), format);
        }
    }

    #[tokio::test]
    async fn test_engine_over_sqlite_source() {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::query(
            "CREATE TABLE channel_stats (subscribers INTEGER, total_views INTEGER, total_videos INTEGER, fetched_at TEXT)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO channel_stats VALUES (10, 1000, 4, '2024-02-01 00:00:00'), (12, 1500, 5, '2024-01-01 00:00:00')",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("CREATE TABLE video_stats (title TEXT, views INTEGER, fetched_at TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO video_stats VALUES ('old', 5, '2024-01-01 00:00:00'), ('new', 7, '2024-03-01 00:00:00')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let engine = QueryEngine::new(SqliteBackend::from_pool(pool));
        assert_eq!(engine.backend_name(), "sqlite");
        engine.health_check().await.unwrap();

        let counted = engine
            .query("SELECT COUNT(*) AS n FROM video_stats")
            .await
            .unwrap();
        assert_eq!(counted.rows[0][0], serde_json::json!(2));
        assert!(engine.query("DROP TABLE video_stats").await.is_err());

        let source = SnapshotSource::new(engine.backend(), TableNames::default()).unwrap();
        let tables = source.load().await.unwrap();

        // Channel history oldest first, videos newest first
        let ts = tables.channel_history.column_index("fetched_at").unwrap();
        assert_eq!(
            tables.channel_history.rows[0][ts],
            serde_json::json!("2024-01-01 00:00:00")
        );
        let title = tables.videos.column_index("title").unwrap();
        assert_eq!(tables.videos.rows[0][title], serde_json::json!("new"));
    }
}
