//! Analytics error types
//!
//! Only parameter parsing can fail. The metrics pipeline itself is total.

use thiserror::Error;

/// Analytics errors
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Invalid time range
    #[error("invalid time range: {0}")]
    InvalidTimeRange(String),

    /// Invalid granularity
    #[error("invalid granularity: {0}")]
    InvalidGranularity(String),

    /// Invalid deduplication policy
    #[error("invalid dedup policy: {0}")]
    InvalidDedupPolicy(String),

    /// Invalid ranking field
    #[error("invalid rank field: {0}")]
    InvalidRankField(String),
}

/// Result type for analytics operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;
