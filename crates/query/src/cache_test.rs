//! Tests for the snapshot cache

use super::*;
use std::sync::atomic::AtomicUsize;

use crate::result::{Column, DataType, QueryResult};

// =============================================================================
// Test Helpers
// =============================================================================

fn tables_with_views(views: i64) -> SnapshotTables {
    SnapshotTables {
        channel_history: QueryResult::empty(),
        videos: QueryResult::new(
            vec![Column::new("views", DataType::Int64, true)],
            vec![vec![serde_json::json!(views)]],
            0,
        ),
    }
}

async fn load_counting(
    cache: &SnapshotCache,
    calls: &AtomicUsize,
) -> Result<Arc<SnapshotTables>, QueryError> {
    cache
        .get_or_load_with(|| async {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(tables_with_views(n as i64))
        })
        .await
}

// =============================================================================
// Staleness
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_hit_within_ttl() {
    let cache = SnapshotCache::new(Duration::from_secs(30));
    let calls = AtomicUsize::new(0);

    let first = load_counting(&cache, &calls).await.unwrap();
    tokio::time::advance(Duration::from_secs(29)).await;
    let second = load_counting(&cache, &calls).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.stats().hits.load(Ordering::Relaxed), 1);
    assert_eq!(cache.stats().misses.load(Ordering::Relaxed), 1);
}

#[tokio::test(start_paused = true)]
async fn test_reload_after_ttl() {
    let cache = SnapshotCache::new(Duration::from_secs(30));
    let calls = AtomicUsize::new(0);

    load_counting(&cache, &calls).await.unwrap();
    tokio::time::advance(Duration::from_secs(31)).await;
    assert!(!cache.is_fresh().await);

    let reloaded = load_counting(&cache, &calls).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(reloaded.videos.rows[0][0], serde_json::json!(2));
}

#[tokio::test(start_paused = true)]
async fn test_invalidate_forces_reload() {
    let cache = SnapshotCache::new(Duration::from_secs(300));
    let calls = AtomicUsize::new(0);

    load_counting(&cache, &calls).await.unwrap();
    assert!(cache.is_fresh().await);

    cache.invalidate().await;
    assert!(!cache.is_fresh().await);

    load_counting(&cache, &calls).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(cache.stats().invalidations.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn test_failed_load_not_cached() {
    let cache = SnapshotCache::default();

    let err = cache
        .get_or_load_with(|| async { Err(QueryError::Connection("refused".to_string())) })
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::Connection(_)));
    assert!(!cache.is_fresh().await);

    let calls = AtomicUsize::new(0);
    load_counting(&cache, &calls).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_zero_ttl_never_hits() {
    let cache = SnapshotCache::new(Duration::ZERO);
    let calls = AtomicUsize::new(0);

    load_counting(&cache, &calls).await.unwrap();
    load_counting(&cache, &calls).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(cache.stats().hit_rate(), 0.0);
}

#[test]
fn test_hit_rate_empty() {
    let stats = CacheStats::default();
    assert_eq!(stats.hit_rate(), 0.0);
}
