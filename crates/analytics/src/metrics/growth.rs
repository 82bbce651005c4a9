//! Subscriber growth series
//!
//! Built from channel history. Snapshots missing either the timestamp or
//! the subscriber count are skipped.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::filter::Granularity;
use crate::snapshot::ChannelSnapshot;
use crate::timerange::start_of_day;
use crate::timeseries::{TimeSeriesData, TimeSeriesPoint};

/// Subscriber count over time
///
/// - `Snapshot`: one point per snapshot, chronological
/// - `Monthly`: the last snapshot of each calendar month, dated the first
///   of that month
pub fn subscriber_growth(history: &[ChannelSnapshot], granularity: Granularity) -> TimeSeriesData {
    let mut observed: Vec<(DateTime<Utc>, u64)> = history
        .iter()
        .filter_map(|s| Some((s.captured_at?, s.subscriber_count?)))
        .collect();
    // Stable, so equal timestamps keep history order
    observed.sort_by_key(|(at, _)| *at);

    let points = match granularity {
        Granularity::Snapshot => observed
            .into_iter()
            .map(|(at, subs)| TimeSeriesPoint::new(at, subs))
            .collect(),
        Granularity::Monthly => {
            let mut months: BTreeMap<NaiveDate, u64> = BTreeMap::new();
            for (at, subs) in observed {
                if let Some(first) = at.date_naive().with_day(1) {
                    // Later observations overwrite earlier ones
                    months.insert(first, subs);
                }
            }
            months
                .into_iter()
                .map(|(month, subs)| TimeSeriesPoint::new(start_of_day(month), subs))
                .collect()
        }
    };

    TimeSeriesData::from_points(points)
}
