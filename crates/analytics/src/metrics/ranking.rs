//! Top-N rankings
//!
//! Stable descending sort: rows with equal keys keep their input order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};
use crate::metrics::engagement::DerivedVideoRow;

/// Field a ranking sorts by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankField {
    /// View count
    Views,
    /// Engagement rate
    EngagementRate,
    /// Like count
    Likes,
    /// Dislike count
    Dislikes,
    /// Comment count
    Comments,
}

impl RankField {
    /// Parse rank field from string
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "views" | "view_count" => Ok(Self::Views),
            "engagement" | "engagement_rate" => Ok(Self::EngagementRate),
            "likes" | "like_count" => Ok(Self::Likes),
            "dislikes" | "dislike_count" => Ok(Self::Dislikes),
            "comments" | "comment_count" => Ok(Self::Comments),
            _ => Err(AnalyticsError::InvalidRankField(s.to_string())),
        }
    }

    fn compare(&self, a: &DerivedVideoRow, b: &DerivedVideoRow) -> Ordering {
        match self {
            Self::Views => a.video.view_count.cmp(&b.video.view_count),
            Self::EngagementRate => a.engagement_rate.total_cmp(&b.engagement_rate),
            Self::Likes => a.video.like_count.cmp(&b.video.like_count),
            Self::Dislikes => a.video.dislike_count.cmp(&b.video.dislike_count),
            Self::Comments => a.video.comment_count.cmp(&b.video.comment_count),
        }
    }
}

/// The `n` rows with the largest `field`, largest first
///
/// `n` is clamped to the number of rows.
pub fn top_n(rows: &[DerivedVideoRow], field: RankField, n: usize) -> Vec<DerivedVideoRow> {
    let mut ranked: Vec<&DerivedVideoRow> = rows.iter().collect();
    ranked.sort_by(|a, b| field.compare(b, a));
    ranked.into_iter().take(n).cloned().collect()
}

/// The four dashboard rankings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rankings {
    /// Top by views
    pub by_views: Vec<DerivedVideoRow>,
    /// Top by engagement rate
    pub by_engagement: Vec<DerivedVideoRow>,
    /// Likes distribution
    pub by_likes: Vec<DerivedVideoRow>,
    /// Dislikes distribution
    pub by_dislikes: Vec<DerivedVideoRow>,
}

impl Rankings {
    /// Rank rows; views and engagement take `top_n`, likes and dislikes
    /// take `distribution_limit`
    pub fn compute(rows: &[DerivedVideoRow], top_n_count: usize, distribution_limit: usize) -> Self {
        Self {
            by_views: top_n(rows, RankField::Views, top_n_count),
            by_engagement: top_n(rows, RankField::EngagementRate, top_n_count),
            by_likes: top_n(rows, RankField::Likes, distribution_limit),
            by_dislikes: top_n(rows, RankField::Dislikes, distribution_limit),
        }
    }
}
