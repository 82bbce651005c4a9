//! Snapshot table acquisition
//!
//! The two reads the dashboard needs: channel history (oldest first) and
//! video snapshots (newest first).

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::backend::{QueryBackend, validate_identifier};
use crate::error::QueryError;
use crate::result::QueryResult;

/// Names of the snapshot tables and their ordering column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableNames {
    /// Channel snapshot table
    pub channel_table: String,
    /// Video snapshot table
    pub video_table: String,
    /// Timestamp column both tables are ordered by
    pub order_column: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            channel_table: "channel_stats".to_string(),
            video_table: "video_stats".to_string(),
            order_column: "fetched_at".to_string(),
        }
    }
}

impl TableNames {
    /// Check every name is a plain identifier
    pub fn validate(&self) -> Result<(), QueryError> {
        validate_identifier(&self.channel_table)?;
        validate_identifier(&self.video_table)?;
        validate_identifier(&self.order_column)?;
        Ok(())
    }

    /// SQL for the channel history read
    pub fn channel_history_sql(&self) -> String {
        format!(
            "SELECT * FROM {} ORDER BY {} ASC",
            self.channel_table, self.order_column
        )
    }

    /// SQL for the video snapshot read
    pub fn videos_sql(&self) -> String {
        format!(
            "SELECT * FROM {} ORDER BY {} DESC",
            self.video_table, self.order_column
        )
    }
}

/// Raw tables from one acquisition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotTables {
    /// Channel snapshots, ascending by time
    pub channel_history: QueryResult,
    /// Video snapshots, descending by time
    pub videos: QueryResult,
}

/// Reads snapshot tables from a query backend
#[derive(Clone)]
pub struct SnapshotSource {
    backend: Arc<dyn QueryBackend>,
    tables: TableNames,
}

impl std::fmt::Debug for SnapshotSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotSource")
            .field("backend", &self.backend.name())
            .field("tables", &self.tables)
            .finish()
    }
}

impl SnapshotSource {
    /// Create a source over a backend
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentifier` if a table or column name is not a plain
    /// SQL identifier.
    pub fn new(backend: Arc<dyn QueryBackend>, tables: TableNames) -> Result<Self, QueryError> {
        tables.validate()?;
        Ok(Self { backend, tables })
    }

    /// Table names in use
    pub fn tables(&self) -> &TableNames {
        &self.tables
    }

    /// Backend name
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Check the backend is reachable
    pub async fn health_check(&self) -> Result<(), QueryError> {
        self.backend.health_check().await
    }

    /// Read both tables
    pub async fn load(&self) -> Result<SnapshotTables, QueryError> {
        let channel_history = self
            .backend
            .execute(&self.tables.channel_history_sql())
            .await?;
        let videos = self.backend.execute(&self.tables.videos_sql()).await?;

        tracing::info!(
            backend = self.backend.name(),
            channel_rows = channel_history.row_count,
            video_rows = videos.row_count,
            "loaded snapshot tables"
        );

        Ok(SnapshotTables {
            channel_history,
            videos,
        })
    }
}
