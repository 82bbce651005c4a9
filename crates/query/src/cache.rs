//! Snapshot cache - bounded-staleness memoization of table reads
//!
//! Owned by whoever presents the metrics, and placed in front of
//! [`SnapshotSource`]. The metrics engine never sees it.
//!
//! # Design
//!
//! - One entry (the last successful load) behind an async mutex, so callers
//!   racing on a stale entry trigger a single store read
//! - Failed loads are not cached
//! - `invalidate()` drops the entry for manual refresh
//! - Staleness uses `tokio::time::Instant`, so tests can pause the clock

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::QueryError;
use crate::source::{SnapshotSource, SnapshotTables};

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;

/// Default staleness window
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// Cache statistics
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Lookups served from the cached entry
    pub hits: AtomicU64,

    /// Lookups that went to the store
    pub misses: AtomicU64,

    /// Explicit invalidations
    pub invalidations: AtomicU64,
}

impl CacheStats {
    /// Get hit rate (0.0 - 1.0)
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let total = hits + self.misses.load(Ordering::Relaxed);
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    loaded_at: Instant,
    tables: Arc<SnapshotTables>,
}

/// Time-to-live cache for snapshot tables
#[derive(Debug)]
pub struct SnapshotCache {
    ttl: Duration,
    entry: Mutex<Option<CacheEntry>>,
    stats: CacheStats,
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl SnapshotCache {
    /// Create an empty cache with the given staleness window
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: Mutex::new(None),
            stats: CacheStats::default(),
        }
    }

    /// Staleness window
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Return the cached tables, reading from `source` when stale or empty
    pub async fn get_or_load(
        &self,
        source: &SnapshotSource,
    ) -> Result<Arc<SnapshotTables>, QueryError> {
        self.get_or_load_with(|| source.load()).await
    }

    /// Return the cached tables, calling `load` when stale or empty
    pub async fn get_or_load_with<F, Fut>(&self, load: F) -> Result<Arc<SnapshotTables>, QueryError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SnapshotTables, QueryError>>,
    {
        let mut entry = self.entry.lock().await;

        if let Some(cached) = entry.as_ref()
            && cached.loaded_at.elapsed() < self.ttl
        {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(&cached.tables));
        }

        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(ttl_ms = self.ttl.as_millis() as u64, "snapshot cache miss, loading");

        let tables = Arc::new(load().await?);
        *entry = Some(CacheEntry {
            loaded_at: Instant::now(),
            tables: Arc::clone(&tables),
        });

        Ok(tables)
    }

    /// Drop the cached entry; the next lookup reads from the store
    pub async fn invalidate(&self) {
        let mut entry = self.entry.lock().await;
        if entry.take().is_some() {
            tracing::debug!("snapshot cache invalidated");
        }
        self.stats.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    /// Whether a cached entry exists and is within the TTL
    pub async fn is_fresh(&self) -> bool {
        self.entry
            .lock()
            .await
            .as_ref()
            .is_some_and(|e| e.loaded_at.elapsed() < self.ttl)
    }
}
