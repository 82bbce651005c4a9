//! Vidstats Analytics Engine
//!
//! Channel and video snapshot metrics for the dashboard.
//!
//! # Overview
//!
//! This crate turns the two snapshot tables read by `vidstats-query` into
//! the figures a dashboard shows. It includes:
//!
//! - **Snapshots**: Typed records with defined defaults for missing data
//! - **Filters**: Date ranges, ranking sizes, dedup policy
//! - **Metrics**: Engagement rate, rankings, rollups, channel KPIs
//! - **Time Series**: Subscriber growth
//!
//! Everything here is synchronous and total.
//!
//! # Usage
//!
//! ```ignore
//! use vidstats_analytics::{DashboardInput, EngagementFilter, MetricsEngine, TimeRange};
//!
//! let input = DashboardInput::from_tables(&tables);
//! let filter = EngagementFilter::new()
//!     .with_time_range(TimeRange::parse("30d")?)
//!     .with_top_n(10);
//!
//! let metrics = MetricsEngine::new().compute(&input, &filter);
//! println!("{} views", metrics.rollups.total_views);
//! ```

pub mod error;
pub mod filter;
pub mod metrics;
pub mod snapshot;
pub mod timerange;
pub mod timeseries;

#[cfg(test)]
mod engine_test;
#[cfg(test)]
mod timerange_test;

// Re-exports for convenience
pub use error::{AnalyticsError, Result};
pub use filter::{
    DEFAULT_DISTRIBUTION_LIMIT, DEFAULT_TOP_N, DateBounds, DateColumn, DateFilterOutcome,
    DedupPolicy, EngagementFilter, Granularity, MAX_TOP_N, date_bounds, deduplicate,
    filter_by_date, select_date_column,
};
pub use metrics::{
    ChannelKpis, DashboardInput, DashboardMetrics, DerivedVideoRow, Kpi, MetricsEngine,
    RankField, Rankings, Rollups, channel_kpis, compute_engagement_rate, latest_snapshot,
    subscriber_growth, top_n,
};
pub use snapshot::{ChannelSnapshot, VideoSnapshot, coerce_numeric_defaults};
pub use timerange::TimeRange;
pub use timeseries::{TimeSeriesData, TimeSeriesPoint};
