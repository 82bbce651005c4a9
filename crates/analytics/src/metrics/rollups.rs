//! Aggregate rollups over the filtered video table

use serde::{Deserialize, Serialize};

use crate::metrics::engagement::DerivedVideoRow;

/// Sums, mean engagement and highlight rows
///
/// Highlights are `None` for an empty table; substituting another table
/// is left to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rollups {
    /// Sum of views
    pub total_views: u64,
    /// Sum of likes
    pub total_likes: u64,
    /// Sum of dislikes
    pub total_dislikes: u64,
    /// Sum of comments
    pub total_comments: u64,
    /// Mean engagement rate (0 for an empty table)
    pub mean_engagement_rate: f64,
    /// Row with the most views
    pub most_viewed: Option<DerivedVideoRow>,
    /// Row with the most likes
    pub most_liked: Option<DerivedVideoRow>,
    /// Row with the most dislikes
    pub most_disliked: Option<DerivedVideoRow>,
}

/// Compute rollups; sums saturate and argmax ties go to the first row
pub fn rollups(rows: &[DerivedVideoRow]) -> Rollups {
    let mut totals = Rollups::default();
    let mut engagement_sum = 0.0;

    for row in rows {
        totals.total_views = totals.total_views.saturating_add(row.video.view_count);
        totals.total_likes = totals.total_likes.saturating_add(row.video.like_count);
        totals.total_dislikes = totals.total_dislikes.saturating_add(row.video.dislike_count);
        totals.total_comments = totals.total_comments.saturating_add(row.video.comment_count);
        engagement_sum += row.engagement_rate;
    }

    if !rows.is_empty() {
        totals.mean_engagement_rate = engagement_sum / rows.len() as f64;
    }

    totals.most_viewed = argmax(rows, |r| r.video.view_count).cloned();
    totals.most_liked = argmax(rows, |r| r.video.like_count).cloned();
    totals.most_disliked = argmax(rows, |r| r.video.dislike_count).cloned();
    totals
}

/// First row with the maximum key
fn argmax<F>(rows: &[DerivedVideoRow], key: F) -> Option<&DerivedVideoRow>
where
    F: Fn(&DerivedVideoRow) -> u64,
{
    let mut best: Option<(&DerivedVideoRow, u64)> = None;
    for row in rows {
        let value = key(row);
        match best {
            Some((_, max)) if value <= max => {}
            _ => best = Some((row, value)),
        }
    }
    best.map(|(row, _)| row)
}
