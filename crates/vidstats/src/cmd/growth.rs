//! Growth command - Subscriber count over time
//!
//! # Usage
//!
//! ```bash
//! vidstats growth
//! vidstats growth --granularity monthly --format csv
//! ```

use anyhow::{Context, Result};
use clap::Args;
use vidstats_analytics::{EngagementFilter, Granularity, MetricsEngine, TimeSeriesData};
use vidstats_config::Config;
use vidstats_query::OutputFormat;

use super::common::Snapshots;
use super::output::format_count;

/// Growth command arguments
#[derive(Args, Debug)]
pub struct GrowthArgs {
    /// Time granularity (snapshot, monthly)
    #[arg(short, long, default_value = "snapshot")]
    pub granularity: String,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table")]
    pub format: String,
}

/// Run the growth command
pub async fn run(args: GrowthArgs, config: &Config) -> Result<()> {
    let granularity = Granularity::parse(&args.granularity)
        .map_err(|e| anyhow::anyhow!("invalid granularity: {}", e))?;
    let format: OutputFormat = args
        .format
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid format: {}", e))?;

    let snapshots = Snapshots::open(config).await?;
    let input = snapshots.input().await?;
    let series = MetricsEngine::new()
        .with_granularity(granularity)
        .compute(&input, &EngagementFilter::new())
        .subscriber_growth;

    output_result(&series, format, granularity)?;

    eprintln!("\n[{}]", snapshots.backend_name());
    Ok(())
}

fn date_label(series_date: chrono::DateTime<chrono::Utc>, granularity: Granularity) -> String {
    match granularity {
        Granularity::Snapshot => series_date.format("%Y-%m-%d %H:%M:%S").to_string(),
        Granularity::Monthly => series_date.format("%Y-%m").to_string(),
    }
}

fn output_result(
    result: &TimeSeriesData,
    format: OutputFormat,
    granularity: Granularity,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(result).context("failed to encode series")?;
            println!("{}", json);
        }
        OutputFormat::Csv => {
            println!("date,subscribers");
            for point in &result.points {
                println!("{},{}", point.date.to_rfc3339(), point.value);
            }
        }
        OutputFormat::Table => {
            if result.is_empty() {
                println!("(no data)");
                return Ok(());
            }

            println!("{:<20} {:>15}", "Date", "Subscribers");
            println!("{}", "-".repeat(36));

            for point in &result.points {
                println!(
                    "{:<20} {:>15}",
                    date_label(point.date, granularity),
                    format_count(point.value)
                );
            }

            // Summary
            println!("{}", "-".repeat(36));
            println!(
                "Min: {}  Max: {}  Avg: {:.1}  Change: {:+}",
                format_count(result.min),
                format_count(result.max),
                result.avg,
                result.net_change
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn test_date_label() {
        let ts = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        assert_eq!(date_label(ts, Granularity::Monthly), "2024-02");
        assert_eq!(date_label(ts, Granularity::Snapshot), "2024-02-01 00:00:00");
    }
}
