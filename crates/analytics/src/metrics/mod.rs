//! Metrics engine for dashboard analytics
//!
//! Provides the metrics organized by concern:
//!
//! - **engagement**: per-row engagement rate
//! - **ranking**: top-N rankings by views, engagement, likes, dislikes
//! - **rollups**: sums, mean engagement, highlight rows
//! - **channel**: channel KPIs from the latest snapshot
//! - **growth**: subscriber growth series
//!
//! The engine holds no state and never fails: empty tables, missing
//! columns and zero denominators all have defined results.

pub mod channel;
pub mod engagement;
pub mod growth;
pub mod ranking;
pub mod rollups;

// Re-exports for convenience
pub use channel::{ChannelKpis, Kpi, channel_kpis, latest_snapshot};
pub use engagement::{DerivedVideoRow, compute_engagement_rate, engagement_rate};
pub use growth::subscriber_growth;
pub use ranking::{RankField, Rankings, top_n};
pub use rollups::{Rollups, rollups};

use serde::{Deserialize, Serialize};
use vidstats_query::SnapshotTables;

use crate::filter::{
    DateBounds, DateColumn, EngagementFilter, Granularity, date_bounds, deduplicate,
    filter_by_date, select_date_column,
};
use crate::snapshot::{ChannelSnapshot, VideoSnapshot, channel_history, coerce_numeric_defaults};
use crate::timeseries::TimeSeriesData;

/// The two engine inputs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardInput {
    /// Channel snapshots, ascending by time
    pub channel_history: Vec<ChannelSnapshot>,
    /// Video snapshots
    pub videos: Vec<VideoSnapshot>,
}

impl DashboardInput {
    /// Create input from typed records
    pub fn new(channel_history: Vec<ChannelSnapshot>, videos: Vec<VideoSnapshot>) -> Self {
        Self {
            channel_history,
            videos,
        }
    }

    /// Build typed records from the raw store tables
    pub fn from_tables(tables: &SnapshotTables) -> Self {
        Self {
            channel_history: channel_history(&tables.channel_history),
            videos: coerce_numeric_defaults(&tables.videos),
        }
    }
}

/// Everything the presentation layer shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    /// Column the date filter ran on (None = date control disabled)
    pub date_column: Option<DateColumn>,
    /// Extent of the date column before filtering
    pub date_bounds: Option<DateBounds>,
    /// True when a date range was applied
    pub date_filter_applied: bool,
    /// Filtered video table with engagement rates
    pub videos: Vec<DerivedVideoRow>,
    /// Ranked subsets of `videos`
    pub rankings: Rankings,
    /// Rollups over `videos`
    pub rollups: Rollups,
    /// Latest channel snapshot
    pub latest_snapshot: Option<ChannelSnapshot>,
    /// Channel KPIs from the latest snapshot
    pub channel: ChannelKpis,
    /// Subscriber count over time
    pub subscriber_growth: TimeSeriesData,
}

/// Metrics engine
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsEngine {
    granularity: Granularity,
}

impl MetricsEngine {
    /// Create an engine with snapshot-granularity growth
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the growth series granularity
    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Run the full pipeline
    ///
    /// dedup, date column selection, date filter, engagement rate,
    /// rankings, rollups, channel KPIs, growth series. Inputs are not
    /// modified.
    pub fn compute(&self, input: &DashboardInput, filter: &EngagementFilter) -> DashboardMetrics {
        let videos = deduplicate(&input.videos, filter.dedup);

        let column = select_date_column(&videos);
        let bounds = column.and_then(|c| date_bounds(&videos, c));
        let outcome = filter_by_date(&videos, filter.time_range.as_ref(), column);

        let rows = compute_engagement_rate(&outcome.rows);
        let rankings = Rankings::compute(&rows, filter.top_n, filter.distribution_limit);
        let rollups = rollups(&rows);

        let latest = latest_snapshot(&input.channel_history);
        let channel = channel_kpis(latest);

        DashboardMetrics {
            date_column: outcome.column,
            date_bounds: bounds,
            date_filter_applied: outcome.applied,
            videos: rows,
            rankings,
            rollups,
            latest_snapshot: latest.cloned(),
            channel,
            subscriber_growth: subscriber_growth(&input.channel_history, self.granularity),
        }
    }
}
