//! Configuration validation
//!
//! Validates config consistency:
//! - Store URL and table names are present
//! - Pool size and cache TTL are non-zero
//! - Ranking sizes are within bounds
//! - The default range parses

use vidstats_analytics::{MAX_TOP_N, TimeRange};

use crate::Config;
use crate::error::{ConfigError, Result};

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_store(config)?;
    validate_cache(config)?;
    validate_dashboard(config)?;
    Ok(())
}

fn validate_store(config: &Config) -> Result<()> {
    let store = &config.store;

    for (field, value) in [
        ("url", &store.url),
        ("channel_table", &store.channel_table),
        ("video_table", &store.video_table),
        ("order_column", &store.order_column),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::missing_field("store", field));
        }
    }

    if store.max_connections == 0 {
        return Err(ConfigError::invalid_value(
            "store",
            "max_connections",
            "must be at least 1",
        ));
    }

    Ok(())
}

fn validate_cache(config: &Config) -> Result<()> {
    if config.cache.ttl.is_zero() {
        return Err(ConfigError::invalid_value(
            "cache",
            "ttl",
            "must be greater than zero",
        ));
    }
    Ok(())
}

fn validate_dashboard(config: &Config) -> Result<()> {
    let dashboard = &config.dashboard;

    for (field, value) in [
        ("top_n", dashboard.top_n),
        ("distribution_limit", dashboard.distribution_limit),
    ] {
        if !(1..=MAX_TOP_N).contains(&value) {
            return Err(ConfigError::invalid_value(
                "dashboard",
                field,
                format!("must be between 1 and {}", MAX_TOP_N),
            ));
        }
    }

    if let Some(ref range) = dashboard.default_range
        && let Err(e) = TimeRange::parse(range)
    {
        return Err(ConfigError::invalid_value("dashboard", "default_range", e.to_string()));
    }

    Ok(())
}
