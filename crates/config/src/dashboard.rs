//! Dashboard defaults
//!
//! Values used when the command line does not override them.

use serde::Deserialize;
use vidstats_analytics::DedupPolicy;

/// Dashboard configuration
///
/// # Example
///
/// ```toml
/// [dashboard]
/// top_n = 10
/// distribution_limit = 10
/// dedup = "all"
/// default_range = "30d"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Size of the views and engagement rankings (1..=1000)
    /// Default: 10
    pub top_n: usize,

    /// Size of the likes and dislikes rankings (1..=1000)
    /// Default: 10
    pub distribution_limit: usize,

    /// Snapshot dedup policy ("all" or "latest")
    /// Default: "all"
    pub dedup: DedupPolicy,

    /// Date range applied when none is given (e.g. "30d", "ytd")
    /// Default: none
    pub default_range: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            distribution_limit: 10,
            dedup: DedupPolicy::AllSnapshots,
            default_range: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.top_n, 10);
        assert_eq!(config.distribution_limit, 10);
        assert_eq!(config.dedup, DedupPolicy::AllSnapshots);
        assert!(config.default_range.is_none());
    }

    #[test]
    fn test_deserialize_partial() {
        let toml = r#"
top_n = 25
default_range = "ytd"
"#;
        let config: DashboardConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.top_n, 25);
        assert_eq!(config.distribution_limit, 10);
        assert_eq!(config.default_range.as_deref(), Some("ytd"));
    }

    #[test]
    fn test_dedup_accepts_every_policy_name() {
        for (name, expected) in [
            ("all", DedupPolicy::AllSnapshots),
            ("none", DedupPolicy::AllSnapshots),
            ("all_snapshots", DedupPolicy::AllSnapshots),
            ("LATEST", DedupPolicy::LatestPerVideo),
            ("latest_per_video", DedupPolicy::LatestPerVideo),
        ] {
            let config: DashboardConfig =
                toml::from_str(&format!("dedup = \"{}\"", name)).unwrap();
            assert_eq!(config.dedup, expected, "{}", name);
            assert_eq!(DedupPolicy::parse(name).unwrap(), expected);
        }
    }

    #[test]
    fn test_dedup_rejects_unknown_policy() {
        let err = toml::from_str::<DashboardConfig>("dedup = \"newest\"").unwrap_err();
        assert!(err.to_string().contains("newest"));
    }
}
