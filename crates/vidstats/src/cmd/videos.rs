//! Videos command - The filtered video table with engagement rates
//!
//! # Usage
//!
//! ```bash
//! vidstats videos --range 7d
//! vidstats videos --from 2024-01-01 --to 2024-01-31 --format csv
//! ```

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use vidstats_analytics::{DashboardMetrics, DateColumn, MetricsEngine};
use vidstats_config::Config;
use vidstats_query::OutputFormat;

use super::common::{FilterArgs, Snapshots, build_filter};
use super::output::{format_count, format_percent, format_timestamp, print_csv, print_table};

/// Videos command arguments
#[derive(Args, Debug)]
pub struct VideosArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table")]
    pub format: String,
}

/// Run the videos command
pub async fn run(args: VideosArgs, config: &Config) -> Result<()> {
    let format: OutputFormat = args
        .format
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid format: {}", e))?;

    let filter = build_filter(&args.filter, &config.dashboard, Utc::now())?;
    let snapshots = Snapshots::open(config).await?;
    let input = snapshots.input().await?;
    let metrics = MetricsEngine::new().compute(&input, &filter);

    match format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&metrics.videos).context("failed to encode videos")?;
            println!("{}", json);
        }
        OutputFormat::Csv => {
            let (headers, rows) = video_rows(&metrics, false);
            print_csv(&headers, &rows);
        }
        OutputFormat::Table => {
            let (headers, rows) = video_rows(&metrics, true);
            print_table(&headers, &rows);
        }
    }

    let column = metrics.date_column.map_or("none", |c| c.name());
    eprintln!(
        "\n{} video(s), date column: {} [{}]",
        metrics.videos.len(),
        column,
        snapshots.backend_name()
    );
    Ok(())
}

/// Header and cells for the video table
///
/// `human` selects thousands separators and percentages; otherwise raw
/// numbers are written.
fn video_rows(metrics: &DashboardMetrics, human: bool) -> (Vec<&'static str>, Vec<Vec<String>>) {
    let date_column = metrics.date_column;
    let mut headers = vec![
        "video_id",
        "title",
        "views",
        "likes",
        "dislikes",
        "comments",
        "engagement_rate",
    ];
    if let Some(column) = date_column {
        headers.push(column.name());
    }

    let count = |v: u64| if human { format_count(v) } else { v.to_string() };

    let rows = metrics
        .videos
        .iter()
        .map(|r| {
            let mut cells = vec![
                r.video.video_id.clone().unwrap_or_default(),
                r.video.title.clone().unwrap_or_default(),
                count(r.video.view_count),
                count(r.video.like_count),
                count(r.video.dislike_count),
                count(r.video.comment_count),
                if human {
                    format_percent(r.engagement_rate)
                } else {
                    format!("{:.6}", r.engagement_rate)
                },
            ];
            if let Some(column) = date_column {
                cells.push(date_cell(column, &r.video, human));
            }
            cells
        })
        .collect();

    (headers, rows)
}

fn date_cell(column: DateColumn, video: &vidstats_analytics::VideoSnapshot, human: bool) -> String {
    match column.get(video) {
        Some(ts) if !human => ts.to_rfc3339(),
        other => format_timestamp(other),
    }
}
