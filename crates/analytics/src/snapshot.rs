//! Typed snapshot records
//!
//! Store reads arrive as [`QueryResult`] tables whose schema is not
//! guaranteed: columns may be missing, renamed, or hold the wrong type.
//! Records are built here with defined defaults so nothing downstream has to
//! check for fields.
//!
//! Video counts default to zero. Channel fields default to `None`, since a
//! missing subscriber count is "unavailable", not zero.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vidstats_query::QueryResult;

/// Column aliases for video snapshot fields
const VIDEO_ID_COLUMNS: &[&str] = &["video_id"];
const TITLE_COLUMNS: &[&str] = &["title"];
const VIEW_COLUMNS: &[&str] = &["view_count", "views"];
const LIKE_COLUMNS: &[&str] = &["like_count", "likes"];
const DISLIKE_COLUMNS: &[&str] = &["dislike_count", "dislikes"];
const COMMENT_COLUMNS: &[&str] = &["comment_count", "comments"];
const PUBLISHED_COLUMNS: &[&str] = &["published_at"];
const FETCHED_COLUMNS: &[&str] = &["fetched_at", "captured_at"];

/// Column aliases for channel snapshot fields
const SUBSCRIBER_COLUMNS: &[&str] = &["subscriber_count", "subscribers"];
const TOTAL_VIEW_COLUMNS: &[&str] = &["total_view_count", "total_views"];
const TOTAL_VIDEO_COLUMNS: &[&str] = &["total_video_count", "total_videos"];
const CAPTURED_COLUMNS: &[&str] = &["captured_at", "fetched_at"];

/// One observation of a channel's totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSnapshot {
    /// Subscriber count
    pub subscriber_count: Option<u64>,
    /// Lifetime views across all videos
    pub total_view_count: Option<u64>,
    /// Number of published videos
    pub total_video_count: Option<u64>,
    /// When the snapshot was taken
    pub captured_at: Option<DateTime<Utc>>,
}

/// One observation of a video's counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSnapshot {
    /// Platform video ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    /// Video title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Views
    pub view_count: u64,
    /// Likes
    pub like_count: u64,
    /// Dislikes
    pub dislike_count: u64,
    /// Comments
    pub comment_count: u64,
    /// Publication time
    pub published_at: Option<DateTime<Utc>>,
    /// When the counters were polled
    pub fetched_at: Option<DateTime<Utc>>,
}

impl VideoSnapshot {
    /// Key identifying the video across polls: video ID, else title
    pub fn video_key(&self) -> Option<&str> {
        self.video_id.as_deref().or(self.title.as_deref())
    }

    /// Title for display, falling back to the video ID
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.video_id.as_deref())
            .unwrap_or("N/A")
    }
}

/// Resolved column positions for a table, `None` where the column is absent
struct ColumnMap<const N: usize>([Option<usize>; N]);

impl<const N: usize> ColumnMap<N> {
    fn resolve(table: &QueryResult, aliases: [&[&str]; N]) -> Self {
        Self(aliases.map(|names| names.iter().find_map(|name| table.column_index(name))))
    }

    fn cell<'a>(&self, row: &'a [Value], field: usize) -> Option<&'a Value> {
        self.0[field].and_then(|idx| row.get(idx))
    }
}

/// Build video records, coercing the four counters to numeric defaults
///
/// For each of views, likes, dislikes and comments: a column missing from
/// the schema counts as zero for every row, and a null or non-numeric cell
/// counts as zero. Every record therefore carries well-defined counts.
pub fn coerce_numeric_defaults(table: &QueryResult) -> Vec<VideoSnapshot> {
    let map = ColumnMap::resolve(
        table,
        [
            VIDEO_ID_COLUMNS,
            TITLE_COLUMNS,
            VIEW_COLUMNS,
            LIKE_COLUMNS,
            DISLIKE_COLUMNS,
            COMMENT_COLUMNS,
            PUBLISHED_COLUMNS,
            FETCHED_COLUMNS,
        ],
    );

    table
        .rows
        .iter()
        .map(|row| VideoSnapshot {
            video_id: map.cell(row, 0).and_then(text_value),
            title: map.cell(row, 1).and_then(text_value),
            view_count: coerce_count(map.cell(row, 2)),
            like_count: coerce_count(map.cell(row, 3)),
            dislike_count: coerce_count(map.cell(row, 4)),
            comment_count: coerce_count(map.cell(row, 5)),
            published_at: map.cell(row, 6).and_then(parse_timestamp),
            fetched_at: map.cell(row, 7).and_then(parse_timestamp),
        })
        .collect()
}

/// Build channel records; missing or unparseable fields stay `None`
pub fn channel_history(table: &QueryResult) -> Vec<ChannelSnapshot> {
    let map = ColumnMap::resolve(
        table,
        [
            SUBSCRIBER_COLUMNS,
            TOTAL_VIEW_COLUMNS,
            TOTAL_VIDEO_COLUMNS,
            CAPTURED_COLUMNS,
        ],
    );

    table
        .rows
        .iter()
        .map(|row| ChannelSnapshot {
            subscriber_count: map.cell(row, 0).and_then(parse_count),
            total_view_count: map.cell(row, 1).and_then(parse_count),
            total_video_count: map.cell(row, 2).and_then(parse_count),
            captured_at: map.cell(row, 3).and_then(parse_timestamp),
        })
        .collect()
}

/// Coerce a cell to a count, zero when missing or not numeric
pub fn coerce_count(value: Option<&Value>) -> u64 {
    value.and_then(parse_count).unwrap_or(0)
}

/// Parse a cell as a non-negative count
///
/// Integers pass through, negatives clamp to zero, finite floats truncate
/// toward zero, numeric strings are parsed. Anything else is `None`.
pub fn parse_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Some(u)
            } else if n.as_i64().is_some() {
                // Only negative integers fail as_u64
                Some(0)
            } else {
                n.as_f64().and_then(float_count)
            }
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                Some(i.max(0) as u64)
            } else if let Ok(u) = s.parse::<u64>() {
                Some(u)
            } else {
                s.parse::<f64>().ok().and_then(float_count)
            }
        }
        _ => None,
    }
}

fn float_count(f: f64) -> Option<u64> {
    if !f.is_finite() {
        return None;
    }
    // `as` saturates at u64::MAX and maps negatives to 0
    Some(f.trunc() as u64)
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse a cell as a UTC timestamp
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.f]`, `YYYY-MM-DDTHH:MM:SS[.f]`
/// and `YYYY-MM-DD` strings (naive values are UTC), or integer epoch
/// milliseconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp_str(s.trim()),
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    // PostgreSQL text output of timestamptz: "2024-01-15 10:00:00+00"
    if let Ok(ts) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(ts.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(crate::timerange::start_of_day)
}
