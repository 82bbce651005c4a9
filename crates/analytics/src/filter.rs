//! Engagement filter parameters and row selection
//!
//! A filter selects which video snapshots feed the metrics: an optional
//! inclusive date range, the ranking size, and how repeated polls of the
//! same video are treated.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};
use crate::snapshot::VideoSnapshot;
use crate::timerange::TimeRange;

/// Maximum ranking size
pub const MAX_TOP_N: usize = 1000;

/// Default ranking size for views and engagement rankings
pub const DEFAULT_TOP_N: usize = 10;

/// Default size of the likes and dislikes distributions
pub const DEFAULT_DISTRIBUTION_LIMIT: usize = 10;

/// Parameters for one metrics computation
#[derive(Debug, Clone, PartialEq)]
pub struct EngagementFilter {
    /// Inclusive date range (None = no filtering)
    pub time_range: Option<TimeRange>,
    /// Size of the views and engagement rankings (1..=MAX_TOP_N)
    pub top_n: usize,
    /// Size of the likes and dislikes rankings (1..=MAX_TOP_N)
    pub distribution_limit: usize,
    /// Treatment of repeated snapshots of one video
    pub dedup: DedupPolicy,
}

impl Default for EngagementFilter {
    fn default() -> Self {
        Self {
            time_range: None,
            top_n: DEFAULT_TOP_N,
            distribution_limit: DEFAULT_DISTRIBUTION_LIMIT,
            dedup: DedupPolicy::default(),
        }
    }
}

impl EngagementFilter {
    /// Create a filter with defaults and no date range
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the date range
    pub fn with_time_range(mut self, range: TimeRange) -> Self {
        self.time_range = Some(range);
        self
    }

    /// Set the date range from optional bounds
    ///
    /// Filtering only applies when both are given. Fails if `end` is
    /// before `start`.
    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        self.time_range = TimeRange::from_bounds(start, end)?;
        Ok(self)
    }

    /// Set the ranking size (clamped to 1..=MAX_TOP_N)
    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = n.clamp(1, MAX_TOP_N);
        self
    }

    /// Set the likes/dislikes ranking size (clamped to 1..=MAX_TOP_N)
    pub fn with_distribution_limit(mut self, n: usize) -> Self {
        self.distribution_limit = n.clamp(1, MAX_TOP_N);
        self
    }

    /// Set the dedup policy
    pub fn with_dedup(mut self, dedup: DedupPolicy) -> Self {
        self.dedup = dedup;
        self
    }

    /// Check if a date range is set
    pub fn has_date_range(&self) -> bool {
        self.time_range.is_some()
    }
}

/// Timestamp field used for date filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateColumn {
    /// Publication time
    PublishedAt,
    /// Poll time
    FetchedAt,
}

impl DateColumn {
    /// Column name
    pub fn name(&self) -> &'static str {
        match self {
            Self::PublishedAt => "published_at",
            Self::FetchedAt => "fetched_at",
        }
    }

    /// Read this column from a snapshot
    pub fn get(&self, video: &VideoSnapshot) -> Option<DateTime<Utc>> {
        match self {
            Self::PublishedAt => video.published_at,
            Self::FetchedAt => video.fetched_at,
        }
    }
}

impl std::fmt::Display for DateColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Pick the column to filter on
///
/// `published_at` if at least one row has it, else `fetched_at` if at least
/// one row has it, else `None` (date filtering unavailable).
pub fn select_date_column(videos: &[VideoSnapshot]) -> Option<DateColumn> {
    [DateColumn::PublishedAt, DateColumn::FetchedAt]
        .into_iter()
        .find(|column| videos.iter().any(|v| column.get(v).is_some()))
}

/// Result of [`filter_by_date`]
#[derive(Debug, Clone, PartialEq)]
pub struct DateFilterOutcome {
    /// Selected rows, in input order
    pub rows: Vec<VideoSnapshot>,
    /// Column the filter ran on
    pub column: Option<DateColumn>,
    /// False when the column is absent or entirely null
    pub control_enabled: bool,
    /// True when a range was actually applied
    pub applied: bool,
}

/// Keep the rows whose date column falls inside `range`
///
/// Without a range the input is returned unchanged. If the column is
/// missing or null for every row the input is also returned unchanged and
/// the outcome reports the date control as disabled. Otherwise rows with a
/// null timestamp are dropped.
pub fn filter_by_date(
    videos: &[VideoSnapshot],
    range: Option<&TimeRange>,
    column: Option<DateColumn>,
) -> DateFilterOutcome {
    let column = column.filter(|c| videos.iter().any(|v| c.get(v).is_some()));

    let (Some(range), Some(col)) = (range, column) else {
        return DateFilterOutcome {
            rows: videos.to_vec(),
            column,
            control_enabled: column.is_some(),
            applied: false,
        };
    };

    let rows = videos
        .iter()
        .filter(|v| col.get(v).is_some_and(|ts| range.contains(ts)))
        .cloned()
        .collect();

    DateFilterOutcome {
        rows,
        column,
        control_enabled: true,
        applied: true,
    }
}

/// Calendar extent of a date column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
    /// Earliest date
    pub start: NaiveDate,
    /// Latest date
    pub end: NaiveDate,
}

/// Min and max calendar dates of `column`, or `None` if nothing is set
pub fn date_bounds(videos: &[VideoSnapshot], column: DateColumn) -> Option<DateBounds> {
    let mut dates = videos.iter().filter_map(|v| column.get(v));
    let first = dates.next()?;
    let (min, max) = dates.fold((first, first), |(min, max), ts| (min.min(ts), max.max(ts)));

    Some(DateBounds {
        start: min.date_naive(),
        end: max.date_naive(),
    })
}

/// Treatment of repeated snapshots of the same video
///
/// Deserializes from any name [`DedupPolicy::parse`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum DedupPolicy {
    /// Every poll row counts
    #[default]
    AllSnapshots,
    /// One row per video, the most recently fetched
    LatestPerVideo,
}

impl DedupPolicy {
    /// Parse policy from string
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" | "all_snapshots" | "none" => Ok(Self::AllSnapshots),
            "latest" | "latest_per_video" => Ok(Self::LatestPerVideo),
            _ => Err(AnalyticsError::InvalidDedupPolicy(s.to_string())),
        }
    }

    /// Short name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllSnapshots => "all",
            Self::LatestPerVideo => "latest",
        }
    }
}

impl TryFrom<String> for DedupPolicy {
    type Error = AnalyticsError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

/// Apply a dedup policy, preserving input order
///
/// `LatestPerVideo` keeps, for each video key (ID, else title), the row
/// with the greatest `fetched_at`; the first such row wins ties. Rows
/// without a key are all kept.
pub fn deduplicate(videos: &[VideoSnapshot], policy: DedupPolicy) -> Vec<VideoSnapshot> {
    match policy {
        DedupPolicy::AllSnapshots => videos.to_vec(),
        DedupPolicy::LatestPerVideo => {
            let mut best: HashMap<&str, usize> = HashMap::new();
            for (idx, video) in videos.iter().enumerate() {
                let Some(key) = video.video_key() else {
                    continue;
                };
                best.entry(key)
                    .and_modify(|current| {
                        // None orders before any timestamp
                        if video.fetched_at > videos[*current].fetched_at {
                            *current = idx;
                        }
                    })
                    .or_insert(idx);
            }

            videos
                .iter()
                .enumerate()
                .filter(|(idx, video)| {
                    video
                        .video_key()
                        .is_none_or(|key| best.get(key) == Some(idx))
                })
                .map(|(_, video)| video.clone())
                .collect()
        }
    }
}

/// Granularity of the subscriber growth series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One point per channel snapshot
    #[default]
    Snapshot,
    /// Last snapshot of each calendar month
    Monthly,
}

impl Granularity {
    /// Parse granularity from string
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "snapshot" | "snapshots" | "raw" => Ok(Self::Snapshot),
            "monthly" | "month" => Ok(Self::Monthly),
            _ => Err(AnalyticsError::InvalidGranularity(s.to_string())),
        }
    }
}
