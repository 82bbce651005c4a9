//! Check command - Verify the snapshot store
//!
//! Runs a health check, reads both tables and reports what was found.
//!
//! # Usage
//!
//! ```bash
//! vidstats check
//! vidstats --config configs/config.toml check
//! ```

use anyhow::{Context, Result};
use vidstats_analytics::{DashboardInput, select_date_column};
use vidstats_config::Config;
use vidstats_query::QueryResult;

use super::common::Snapshots;

/// Run the check command
pub async fn run(config: &Config) -> Result<()> {
    let snapshots = Snapshots::open(config).await?;
    println!("Store:    {} ({})", snapshots.backend_name(), redact_url(&config.store.url));

    snapshots.health_check().await?;
    println!("Health:   ok");

    let tables = snapshots.tables().await.context("snapshot read failed")?;

    print_table_summary(&config.store.channel_table, &tables.channel_history);
    print_table_summary(&config.store.video_table, &tables.videos);

    let input = DashboardInput::from_tables(&tables);
    match select_date_column(&input.videos) {
        Some(column) => println!("Date filter column: {}", column),
        None => println!("Date filter column: none (date range filtering disabled)"),
    }

    tracing::info!(
        channel_rows = tables.channel_history.row_count,
        video_rows = tables.videos.row_count,
        "store check passed"
    );
    Ok(())
}

fn print_table_summary(name: &str, table: &QueryResult) {
    let columns = table.column_names();
    let columns = if columns.is_empty() {
        "-".to_string()
    } else {
        columns.join(", ")
    };
    println!("Table:    {} ({} rows)", name, table.row_count);
    println!("  columns: {}", columns);
}

/// Hide the password in a connection URL
fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((userinfo, host)) = rest.split_once('@') else {
        return url.to_string();
    };
    match userinfo.split_once(':') {
        Some((user, _)) => format!("{}://{}:***@{}", scheme, user, host),
        None => url.to_string(),
    }
}
