//! Tests for the full metrics pipeline

use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::json;
use vidstats_query::{Column, DataType, QueryResult, SnapshotTables};

use crate::filter::{DateColumn, DedupPolicy, EngagementFilter, Granularity};
use crate::metrics::{DashboardInput, Kpi, MetricsEngine};
use crate::snapshot::{ChannelSnapshot, VideoSnapshot};

fn video(title: &str, views: u64, likes: u64, comments: u64) -> VideoSnapshot {
    VideoSnapshot {
        title: Some(title.to_string()),
        view_count: views,
        like_count: likes,
        comment_count: comments,
        ..Default::default()
    }
}

fn table(columns: &[&str], rows: Vec<Vec<serde_json::Value>>) -> QueryResult {
    QueryResult::new(
        columns
            .iter()
            .map(|c| Column::new(*c, DataType::Unknown, true))
            .collect(),
        rows,
        0,
    )
}

#[test]
fn test_two_video_scenario() {
    let input = DashboardInput::new(Vec::new(), vec![video("A", 100, 10, 5), video("B", 0, 0, 0)]);
    let filter = EngagementFilter::new().with_top_n(1);

    let metrics = MetricsEngine::new().compute(&input, &filter);

    let rates: Vec<f64> = metrics.videos.iter().map(|r| r.engagement_rate).collect();
    assert!((rates[0] - 0.15).abs() < 1e-12);
    assert_eq!(rates[1], 0.0);

    assert_eq!(metrics.rankings.by_views.len(), 1);
    assert_eq!(metrics.rankings.by_views[0].video.display_title(), "A");
    assert_eq!(metrics.rollups.total_views, 100);
}

#[test]
fn test_empty_inputs() {
    let metrics = MetricsEngine::new().compute(&DashboardInput::default(), &EngagementFilter::new());

    assert!(metrics.videos.is_empty());
    assert!(metrics.rankings.by_views.is_empty());
    assert!(metrics.rankings.by_engagement.is_empty());
    assert!(metrics.rankings.by_likes.is_empty());
    assert!(metrics.rankings.by_dislikes.is_empty());
    assert_eq!(metrics.rollups.total_views, 0);
    assert_eq!(metrics.rollups.mean_engagement_rate, 0.0);
    assert!(metrics.rollups.most_viewed.is_none());
    assert!(metrics.latest_snapshot.is_none());
    assert_eq!(metrics.channel.subscribers, Kpi::Unavailable);
    assert_eq!(metrics.channel.avg_views_per_video, Kpi::Unavailable);
    assert!(metrics.subscriber_growth.is_empty());
    assert!(metrics.date_column.is_none());
    assert!(metrics.date_bounds.is_none());
    assert!(!metrics.date_filter_applied);
}

#[test]
fn test_pipeline_is_idempotent() {
    let day = |d| Some(Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap());
    let input = DashboardInput::new(
        vec![
            ChannelSnapshot {
                subscriber_count: Some(10),
                total_view_count: Some(400),
                total_video_count: Some(4),
                captured_at: day(1),
            },
            ChannelSnapshot {
                subscriber_count: Some(15),
                total_view_count: Some(600),
                total_video_count: Some(5),
                captured_at: day(20),
            },
        ],
        vec![
            VideoSnapshot {
                published_at: day(3),
                ..video("A", 50, 5, 1)
            },
            VideoSnapshot {
                published_at: day(12),
                ..video("B", 70, 2, 2)
            },
        ],
    );
    let filter = EngagementFilter::new()
        .with_dates(
            NaiveDate::from_ymd_opt(2024, 1, 1),
            NaiveDate::from_ymd_opt(2024, 1, 10),
        )
        .unwrap();
    let engine = MetricsEngine::new().with_granularity(Granularity::Monthly);

    let first = engine.compute(&input, &filter);
    let second = engine.compute(&input, &filter);
    assert_eq!(first, second);

    assert!(first.date_filter_applied);
    assert_eq!(first.date_column, Some(DateColumn::PublishedAt));
    assert_eq!(first.videos.len(), 1);
    assert_eq!(first.channel.subscribers, Kpi::Available(15));
    assert_eq!(first.channel.avg_views_per_video, Kpi::Available(120.0));
    assert_eq!(first.subscriber_growth.len(), 1);
    assert_eq!(first.subscriber_growth.points[0].value, 15);
}

#[test]
fn test_date_filter_falls_back_to_fetched_at() {
    let at = |d| Some(Utc.with_ymd_and_hms(2024, 2, d, 8, 0, 0).unwrap());
    let input = DashboardInput::new(
        Vec::new(),
        vec![
            VideoSnapshot {
                fetched_at: at(1),
                ..video("early", 1, 0, 0)
            },
            VideoSnapshot {
                fetched_at: at(20),
                ..video("late", 2, 0, 0)
            },
        ],
    );
    let day = NaiveDate::from_ymd_opt(2024, 2, 20);
    let filter = EngagementFilter::new().with_dates(day, day).unwrap();

    let metrics = MetricsEngine::new().compute(&input, &filter);
    assert_eq!(metrics.date_column, Some(DateColumn::FetchedAt));
    assert_eq!(metrics.videos.len(), 1);
    assert_eq!(metrics.videos[0].video.display_title(), "late");
    let bounds = metrics.date_bounds.unwrap();
    assert_eq!(bounds.start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    assert_eq!(bounds.end, NaiveDate::from_ymd_opt(2024, 2, 20).unwrap());
}

#[test]
fn test_date_filter_without_dates_keeps_everything() {
    let input = DashboardInput::new(Vec::new(), vec![video("A", 1, 0, 0), video("B", 2, 0, 0)]);
    let day = NaiveDate::from_ymd_opt(2024, 2, 20);
    let filter = EngagementFilter::new().with_dates(day, day).unwrap();

    let metrics = MetricsEngine::new().compute(&input, &filter);
    assert!(metrics.date_column.is_none());
    assert!(!metrics.date_filter_applied);
    assert_eq!(metrics.videos.len(), 2);
}

#[test]
fn test_latest_per_video_dedup() {
    let at = |d| Some(Utc.with_ymd_and_hms(2024, 3, d, 0, 0, 0).unwrap());
    let poll = |id: &str, views, d| VideoSnapshot {
        video_id: Some(id.to_string()),
        view_count: views,
        fetched_at: at(d),
        ..Default::default()
    };
    let input = DashboardInput::new(
        Vec::new(),
        vec![poll("a", 100, 1), poll("a", 150, 2), poll("b", 40, 2)],
    );

    let all = MetricsEngine::new().compute(&input, &EngagementFilter::new());
    assert_eq!(all.rollups.total_views, 290);

    let latest = MetricsEngine::new().compute(
        &input,
        &EngagementFilter::new().with_dedup(DedupPolicy::LatestPerVideo),
    );
    assert_eq!(latest.rollups.total_views, 190);
    assert_eq!(latest.videos.len(), 2);
}

#[test]
fn test_input_from_tables() {
    let tables = SnapshotTables {
        channel_history: table(
            &["subscribers", "total_views", "total_videos", "fetched_at"],
            vec![vec![json!(42), json!(900), json!(0), json!("2024-01-01 00:00:00")]],
        ),
        videos: table(
            &["title", "views", "likes"],
            vec![vec![json!("A"), json!(100), json!(10)]],
        ),
    };

    let input = DashboardInput::from_tables(&tables);
    let metrics = MetricsEngine::new().compute(&input, &EngagementFilter::new());

    assert_eq!(metrics.channel.subscribers, Kpi::Available(42));
    assert_eq!(metrics.channel.avg_views_per_video, Kpi::Available(900.0));
    // comments column is missing, so only likes count
    assert!((metrics.videos[0].engagement_rate - 0.1).abs() < 1e-12);
    assert_eq!(metrics.rollups.total_comments, 0);
}

#[test]
fn test_metrics_serialize() {
    let input = DashboardInput::new(Vec::new(), vec![video("A", 10, 1, 0)]);
    let metrics = MetricsEngine::new().compute(&input, &EngagementFilter::new());

    let json = serde_json::to_value(&metrics).unwrap();
    assert_eq!(json["rollups"]["total_views"], 10);
    assert_eq!(json["rankings"]["by_views"][0]["title"], "A");
    assert!(json["channel"]["subscribers"].is_null());
    assert!(json["date_column"].is_null());
}

#[test]
fn test_decimal_store_cells_keep_their_values() {
    // NUMERIC columns arrive as whole integers or floats
    let numeric = |name: &str| Column::new(name, DataType::Float64, true);
    let tables = SnapshotTables {
        channel_history: QueryResult::new(
            vec![numeric("subscribers"), numeric("total_views")],
            vec![vec![json!(1200), json!(5000)]],
            0,
        ),
        videos: QueryResult::new(
            vec![
                Column::new("video_id", DataType::String, true),
                numeric("views"),
                numeric("likes"),
                numeric("comments"),
            ],
            vec![vec![json!("v1"), json!(100), json!(10.0), json!(5)]],
            0,
        ),
    };

    let metrics =
        MetricsEngine::new().compute(&DashboardInput::from_tables(&tables), &EngagementFilter::new());

    assert_eq!(metrics.rollups.total_views, 100);
    assert!((metrics.videos[0].engagement_rate - 0.15).abs() < 1e-12);
    assert_eq!(metrics.channel.subscribers, Kpi::Available(1200));
    assert_eq!(metrics.channel.total_views, Kpi::Available(5000));
}
