//! Time series data types
//!
//! Counter series over time, such as subscriber counts, with summary
//! statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single data point in a time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Time of this point
    pub date: DateTime<Utc>,
    /// Observed value
    pub value: u64,
}

impl TimeSeriesPoint {
    /// Create a new point
    pub fn new(date: DateTime<Utc>, value: u64) -> Self {
        Self { date, value }
    }
}

/// Time series data with aggregated statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesData {
    /// Data points in chronological order
    pub points: Vec<TimeSeriesPoint>,
    /// Minimum value
    pub min: u64,
    /// Maximum value
    pub max: u64,
    /// Average value
    pub avg: f64,
    /// Last value minus first value
    pub net_change: i64,
}

impl TimeSeriesData {
    /// Create empty time series
    pub fn empty() -> Self {
        Self::from_points(Vec::new())
    }

    /// Create time series from points, calculating stats
    pub fn from_points(points: Vec<TimeSeriesPoint>) -> Self {
        let stats = calculate_stats(&points);
        Self {
            points,
            min: stats.min,
            max: stats.max,
            avg: stats.avg,
            net_change: stats.net_change,
        }
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Most recent point
    pub fn last(&self) -> Option<&TimeSeriesPoint> {
        self.points.last()
    }
}

impl Default for TimeSeriesData {
    fn default() -> Self {
        Self::empty()
    }
}

/// Statistics for a set of points
struct Stats {
    min: u64,
    max: u64,
    avg: f64,
    net_change: i64,
}

fn calculate_stats(points: &[TimeSeriesPoint]) -> Stats {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Stats {
            min: 0,
            max: 0,
            avg: 0.0,
            net_change: 0,
        };
    };

    let min = points.iter().map(|p| p.value).min().unwrap_or(0);
    let max = points.iter().map(|p| p.value).max().unwrap_or(0);
    let total: f64 = points.iter().map(|p| p.value as f64).sum();
    let avg = total / points.len() as f64;

    let net_change = if last.value >= first.value {
        i64::try_from(last.value - first.value).unwrap_or(i64::MAX)
    } else {
        i64::try_from(first.value - last.value).map_or(i64::MIN, |d| -d)
    };

    Stats {
        min,
        max,
        avg,
        net_change,
    }
}
