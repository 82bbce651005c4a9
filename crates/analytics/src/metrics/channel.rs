//! Channel KPIs from the latest channel snapshot

use serde::{Deserialize, Serialize};

use crate::snapshot::ChannelSnapshot;

/// A KPI value, or unavailable when the source field is missing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Kpi<T> {
    /// Value present
    Available(T),
    /// Source field missing or unparseable
    Unavailable,
}

impl<T> Kpi<T> {
    /// Check if available
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// Get the value, if available
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Available(v) => Some(v),
            Self::Unavailable => None,
        }
    }

    /// Map an available value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Kpi<U> {
        match self {
            Self::Available(v) => Kpi::Available(f(v)),
            Self::Unavailable => Kpi::Unavailable,
        }
    }
}

impl<T> From<Option<T>> for Kpi<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unavailable, Self::Available)
    }
}

impl<T> Default for Kpi<T> {
    fn default() -> Self {
        Self::Unavailable
    }
}

/// Headline channel figures
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelKpis {
    /// Subscriber count
    pub subscribers: Kpi<u64>,
    /// Lifetime views
    pub total_views: Kpi<u64>,
    /// Published videos
    pub total_videos: Kpi<u64>,
    /// `total_views / max(total_videos, 1)`
    pub avg_views_per_video: Kpi<f64>,
}

/// Compute KPIs; every field is unavailable without a snapshot
pub fn channel_kpis(latest: Option<&ChannelSnapshot>) -> ChannelKpis {
    let Some(snapshot) = latest else {
        return ChannelKpis::default();
    };

    let avg_views_per_video = match (snapshot.total_view_count, snapshot.total_video_count) {
        (Some(views), Some(videos)) => Kpi::Available(views as f64 / videos.max(1) as f64),
        _ => Kpi::Unavailable,
    };

    ChannelKpis {
        subscribers: snapshot.subscriber_count.into(),
        total_views: snapshot.total_view_count.into(),
        total_videos: snapshot.total_video_count.into(),
        avg_views_per_video,
    }
}

/// The snapshot with the greatest `captured_at`
///
/// Later rows win ties. When no row carries a timestamp the last row is
/// taken, since history is stored in ascending order.
pub fn latest_snapshot(history: &[ChannelSnapshot]) -> Option<&ChannelSnapshot> {
    history.iter().fold(None, |best, snapshot| match best {
        // None orders before any timestamp
        Some(current) if snapshot.captured_at < current.captured_at => Some(current),
        _ => Some(snapshot),
    })
}
