//! Engagement rate
//!
//! `(likes + comments) / views` per video row, 0 for unviewed videos.

use serde::{Deserialize, Serialize};

use crate::snapshot::VideoSnapshot;

/// A video snapshot with its engagement rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedVideoRow {
    /// Source snapshot
    #[serde(flatten)]
    pub video: VideoSnapshot,
    /// `(likes + comments) / views`, always finite and non-negative
    pub engagement_rate: f64,
}

impl DerivedVideoRow {
    /// Derive the row for one snapshot
    pub fn from_snapshot(video: VideoSnapshot) -> Self {
        let engagement_rate = engagement_rate(&video);
        Self {
            video,
            engagement_rate,
        }
    }
}

/// Engagement rate of a single snapshot
pub fn engagement_rate(video: &VideoSnapshot) -> f64 {
    if video.view_count == 0 {
        return 0.0;
    }
    let interactions = video.like_count.saturating_add(video.comment_count);
    interactions as f64 / video.view_count as f64
}

/// Augment each row with its engagement rate, preserving order
pub fn compute_engagement_rate(videos: &[VideoSnapshot]) -> Vec<DerivedVideoRow> {
    videos
        .iter()
        .cloned()
        .map(DerivedVideoRow::from_snapshot)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(views: u64, likes: u64, comments: u64) -> VideoSnapshot {
        VideoSnapshot {
            view_count: views,
            like_count: likes,
            comment_count: comments,
            ..Default::default()
        }
    }

    #[test]
    fn test_engagement_rate() {
        assert!((engagement_rate(&video(100, 10, 5)) - 0.15).abs() < 1e-12);
        assert_eq!(engagement_rate(&video(0, 10, 5)), 0.0);
        assert_eq!(engagement_rate(&video(0, 0, 0)), 0.0);
    }

    #[test]
    fn test_engagement_rate_is_finite() {
        let extremes = [
            video(1, u64::MAX, u64::MAX),
            video(u64::MAX, 0, 0),
            video(u64::MAX, u64::MAX, 1),
            video(0, u64::MAX, u64::MAX),
        ];
        for v in &extremes {
            let rate = engagement_rate(v);
            assert!(rate.is_finite());
            assert!(rate >= 0.0);
        }
    }

    #[test]
    fn test_compute_preserves_order() {
        let videos = vec![video(10, 1, 0), video(0, 3, 3), video(4, 1, 1)];
        let rows = compute_engagement_rate(&videos);

        let rates: Vec<f64> = rows.iter().map(|r| r.engagement_rate).collect();
        assert_eq!(rates, vec![0.1, 0.0, 0.5]);
        assert_eq!(rows[2].video, videos[2]);
    }

    #[test]
    fn test_row_serializes_flat() {
        let row = DerivedVideoRow::from_snapshot(VideoSnapshot {
            title: Some("A".to_string()),
            view_count: 100,
            like_count: 10,
            comment_count: 5,
            ..Default::default()
        });

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["title"], "A");
        assert_eq!(json["view_count"], 100);
        assert!(json.get("video").is_none());
    }
}
