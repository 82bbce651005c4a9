//! Time range parsing and calculations
//!
//! Supports predefined ranges (7d, 30d, ytd) and custom date ranges.
//! Date bounds are inclusive: a range ending on a date runs through
//! 23:59:59 of that day.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::error::{AnalyticsError, Result};

/// An inclusive time range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    /// Start of the range (inclusive)
    pub start: DateTime<Utc>,
    /// End of the range (inclusive)
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Create a new time range
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end < start {
            return Err(AnalyticsError::InvalidTimeRange(
                "end must be after start".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Range covering whole calendar days, `start` 00:00:00 through `end` 23:59:59
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(AnalyticsError::InvalidTimeRange(format!(
                "end date {} is before start date {}",
                end, start
            )));
        }
        Ok(Self {
            start: start_of_day(start),
            end: end_of_day(end),
        })
    }

    /// Range from optional date bounds
    ///
    /// Filtering only applies when both bounds are present, so a missing
    /// bound yields `Ok(None)`.
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Option<Self>> {
        match (start, end) {
            (Some(start), Some(end)) => Self::from_dates(start, end).map(Some),
            _ => Ok(None),
        }
    }

    /// A single calendar day
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: start_of_day(date),
            end: end_of_day(date),
        }
    }

    /// Parse a time range string relative to now
    ///
    /// Supported formats:
    /// - Relative: `24h`, `7d`, `30d`, `4w`
    /// - Predefined: `today`, `yesterday`, `mtd`, `ytd`
    /// - Custom: `2024-01-01,2024-01-31`
    pub fn parse(s: &str) -> Result<Self> {
        Self::parse_at(s, Utc::now())
    }

    /// Parse a time range string relative to `now`
    pub fn parse_at(s: &str, now: DateTime<Utc>) -> Result<Self> {
        let s = s.trim().to_lowercase();

        if let Some(range) = Self::parse_predefined(&s, now) {
            return Ok(range);
        }

        if let Some(range) = Self::parse_relative(&s, now) {
            return Ok(range);
        }

        if let Some(range) = Self::parse_custom(&s)? {
            return Ok(range);
        }

        Err(AnalyticsError::InvalidTimeRange(format!(
            "unknown time range format: {}",
            s
        )))
    }

    /// Check whether a timestamp falls inside the range (both ends inclusive)
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts <= self.end
    }

    /// Get the duration of this range
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Get the number of calendar days in this range (inclusive)
    ///
    /// For example, Jan 1 to Jan 7 returns 7.
    pub fn days(&self) -> i64 {
        self.duration().num_days() + 1
    }

    /// First calendar day of the range
    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Last calendar day of the range
    pub fn end_date(&self) -> NaiveDate {
        self.end.date_naive()
    }
}

impl TimeRange {
    fn parse_predefined(s: &str, now: DateTime<Utc>) -> Option<Self> {
        let today = now.date_naive();

        match s {
            "today" => Some(Self::single_day(today)),
            "yesterday" => today.pred_opt().map(Self::single_day),
            "mtd" => today.with_day(1).map(|first| Self {
                start: start_of_day(first),
                end: end_of_day(today),
            }),
            "ytd" => NaiveDate::from_ymd_opt(today.year(), 1, 1).map(|first| Self {
                start: start_of_day(first),
                end: end_of_day(today),
            }),
            _ => None,
        }
    }

    fn parse_relative(s: &str, now: DateTime<Utc>) -> Option<Self> {
        let (num, unit) = extract_num_unit(s)?;

        let duration = match unit {
            'h' => Duration::hours(num),
            'd' => Duration::days(num - 1), // 7d means today + 6 previous days = 7 days total
            'w' => Duration::weeks(num) - Duration::days(1),
            _ => return None,
        };

        Some(Self {
            start: start_of_day((now - duration).date_naive()),
            end: end_of_day(now.date_naive()),
        })
    }

    fn parse_custom(s: &str) -> Result<Option<Self>> {
        // Format: 2024-01-01,2024-01-31
        let Some((start, end)) = s.split_once(',') else {
            return Ok(None);
        };

        let start_date = parse_date(start.trim())?;
        let end_date = parse_date(end.trim())?;

        Self::from_dates(start_date, end_date).map(Some)
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        AnalyticsError::InvalidTimeRange(format!("invalid date format: {} (use YYYY-MM-DD)", s))
    })
}

fn extract_num_unit(s: &str) -> Option<(i64, char)> {
    let unit = s.chars().last()?;
    if !unit.is_ascii_alphabetic() {
        return None;
    }

    let num: i64 = s[..s.len() - 1].parse().ok()?;
    if num <= 0 || num > 100_000 {
        return None;
    }

    Some((num, unit))
}

pub(crate) fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

pub(crate) fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(23, 59, 59)
        .map(|t| t.and_utc())
        .unwrap_or_else(|| start_of_day(date))
}
