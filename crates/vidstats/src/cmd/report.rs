//! Report command - Channel KPIs, engagement rollups and rankings
//!
//! # Usage
//!
//! ```bash
//! vidstats report
//! vidstats report --range 30d --top-n 5
//! vidstats report --from 2024-01-01 --to 2024-01-31 --format json
//! vidstats report --dedup latest
//! ```

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use serde::Serialize;
use vidstats_analytics::{
    DashboardInput, DashboardMetrics, DerivedVideoRow, EngagementFilter, MetricsEngine,
    compute_engagement_rate, deduplicate, metrics::rollups,
};
use vidstats_config::Config;

use super::common::{FilterArgs, Snapshots, build_filter};
use super::output::{
    format_count, format_kpi_avg, format_kpi_count, format_percent, format_timestamp, print_table,
};

/// Report command arguments
#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table")]
    pub format: String,
}

/// Most viewed, liked and disliked rows
///
/// Taken from the filtered table, or from the whole table when the filter
/// leaves nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlights {
    /// Most viewed row
    pub most_viewed: Option<DerivedVideoRow>,
    /// Most liked row
    pub most_liked: Option<DerivedVideoRow>,
    /// Most disliked row
    pub most_disliked: Option<DerivedVideoRow>,
    /// True when taken from the unfiltered table
    pub unfiltered: bool,
}

impl Highlights {
    /// Pick highlights, falling back to the unfiltered table
    pub fn resolve(
        metrics: &DashboardMetrics,
        input: &DashboardInput,
        filter: &EngagementFilter,
    ) -> Self {
        if !metrics.videos.is_empty() {
            return Self {
                most_viewed: metrics.rollups.most_viewed.clone(),
                most_liked: metrics.rollups.most_liked.clone(),
                most_disliked: metrics.rollups.most_disliked.clone(),
                unfiltered: false,
            };
        }

        let all = compute_engagement_rate(&deduplicate(&input.videos, filter.dedup));
        let totals = rollups(&all);
        Self {
            most_viewed: totals.most_viewed,
            most_liked: totals.most_liked,
            most_disliked: totals.most_disliked,
            unfiltered: !all.is_empty(),
        }
    }
}

#[derive(Serialize)]
struct ReportView<'a> {
    #[serde(flatten)]
    metrics: &'a DashboardMetrics,
    highlights: &'a Highlights,
}

/// Run the report command
pub async fn run(args: ReportArgs, config: &Config) -> Result<()> {
    let filter = build_filter(&args.filter, &config.dashboard, Utc::now())?;
    let snapshots = Snapshots::open(config).await?;
    let input = snapshots.input().await?;

    let metrics = MetricsEngine::new().compute(&input, &filter);
    let highlights = Highlights::resolve(&metrics, &input, &filter);

    tracing::info!(
        videos = metrics.videos.len(),
        date_filter = metrics.date_filter_applied,
        "report computed"
    );

    match args.format.to_lowercase().as_str() {
        "json" => {
            let view = ReportView {
                metrics: &metrics,
                highlights: &highlights,
            };
            let json = serde_json::to_string_pretty(&view).context("failed to encode report")?;
            println!("{}", json);
        }
        "table" => print_report(&metrics, &highlights, &filter),
        other => anyhow::bail!("invalid format: {} (use table or json)", other),
    }

    eprintln!("\n[{}]", snapshots.backend_name());
    Ok(())
}

fn print_report(metrics: &DashboardMetrics, highlights: &Highlights, filter: &EngagementFilter) {
    let channel = &metrics.channel;
    println!("Channel");
    println!("  Subscribers:      {}", format_kpi_count(&channel.subscribers));
    println!("  Total views:      {}", format_kpi_count(&channel.total_views));
    println!("  Total videos:     {}", format_kpi_count(&channel.total_videos));
    println!("  Avg views/video:  {}", format_kpi_avg(&channel.avg_views_per_video));
    if let Some(ref latest) = metrics.latest_snapshot
        && latest.captured_at.is_some()
    {
        println!("  As of:            {}", format_timestamp(latest.captured_at));
    }

    println!();
    println!("Engagement ({})", describe_filter(metrics, filter));
    let rollups = &metrics.rollups;
    println!("  Videos:           {}", format_count(metrics.videos.len() as u64));
    println!("  Views:            {}", format_count(rollups.total_views));
    println!("  Likes:            {}", format_count(rollups.total_likes));
    println!("  Dislikes:         {}", format_count(rollups.total_dislikes));
    println!("  Comments:         {}", format_count(rollups.total_comments));
    println!("  Avg engagement:   {}", format_percent(rollups.mean_engagement_rate));

    println!();
    if highlights.unfiltered {
        println!("Highlights (no videos in range, showing all)");
    } else {
        println!("Highlights");
    }
    print_highlight("Most viewed", highlights.most_viewed.as_ref(), |r| {
        format!("{} views", format_count(r.video.view_count))
    });
    print_highlight("Most liked", highlights.most_liked.as_ref(), |r| {
        format!("{} likes", format_count(r.video.like_count))
    });
    print_highlight("Most disliked", highlights.most_disliked.as_ref(), |r| {
        format!("{} dislikes", format_count(r.video.dislike_count))
    });

    let rankings = &metrics.rankings;
    print_ranking("Top videos by views", &rankings.by_views);
    print_ranking("Top videos by engagement", &rankings.by_engagement);
    print_ranking("Likes distribution", &rankings.by_likes);
    print_ranking("Dislikes distribution", &rankings.by_dislikes);
}

fn describe_filter(metrics: &DashboardMetrics, filter: &EngagementFilter) -> String {
    match (metrics.date_column, filter.time_range) {
        (None, _) => "no date column, all videos".to_string(),
        (Some(column), Some(range)) if metrics.date_filter_applied => format!(
            "{} {} to {}",
            column,
            range.start_date(),
            range.end_date()
        ),
        (Some(_), _) => match metrics.date_bounds {
            Some(bounds) => format!("all dates, {} to {}", bounds.start, bounds.end),
            None => "all dates".to_string(),
        },
    }
}

fn print_highlight(
    label: &str,
    row: Option<&DerivedVideoRow>,
    detail: impl Fn(&DerivedVideoRow) -> String,
) {
    match row {
        Some(row) => println!("  {:<16}  {} ({})", label, row.video.display_title(), detail(row)),
        None => println!("  {:<16}  N/A", label),
    }
}

fn print_ranking(title: &str, rows: &[DerivedVideoRow]) {
    println!();
    println!("{}", title);

    let table: Vec<Vec<String>> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            vec![
                (i + 1).to_string(),
                r.video.display_title().to_string(),
                format_count(r.video.view_count),
                format_count(r.video.like_count),
                format_count(r.video.dislike_count),
                format_count(r.video.comment_count),
                format_percent(r.engagement_rate),
            ]
        })
        .collect();

    print_table(
        &["#", "title", "views", "likes", "dislikes", "comments", "engagement"],
        &table,
    );
}

#[cfg(test)]
mod tests {
    use vidstats_analytics::VideoSnapshot;

    use super::*;

    fn video(title: &str, views: u64, published_day: u32) -> VideoSnapshot {
        use chrono::TimeZone;
        VideoSnapshot {
            title: Some(title.to_string()),
            view_count: views,
            published_at: Some(Utc.with_ymd_and_hms(2024, 1, published_day, 0, 0, 0).unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn test_highlights_from_filtered_rows() {
        let input = DashboardInput::new(Vec::new(), vec![video("a", 10, 1), video("b", 20, 2)]);
        let filter = EngagementFilter::new();
        let metrics = MetricsEngine::new().compute(&input, &filter);

        let highlights = Highlights::resolve(&metrics, &input, &filter);
        assert!(!highlights.unfiltered);
        assert_eq!(
            highlights.most_viewed.unwrap().video.display_title(),
            "b"
        );
    }

    #[test]
    fn test_highlights_fall_back_to_unfiltered() {
        let input = DashboardInput::new(Vec::new(), vec![video("a", 10, 1), video("b", 20, 2)]);
        let day = chrono::NaiveDate::from_ymd_opt(2024, 6, 1);
        let filter = EngagementFilter::new().with_dates(day, day).unwrap();
        let metrics = MetricsEngine::new().compute(&input, &filter);
        assert!(metrics.videos.is_empty());
        assert!(metrics.rollups.most_viewed.is_none());

        let highlights = Highlights::resolve(&metrics, &input, &filter);
        assert!(highlights.unfiltered);
        assert_eq!(
            highlights.most_viewed.unwrap().video.display_title(),
            "b"
        );
    }

    #[test]
    fn test_highlights_empty_table() {
        let input = DashboardInput::default();
        let filter = EngagementFilter::new();
        let metrics = MetricsEngine::new().compute(&input, &filter);

        let highlights = Highlights::resolve(&metrics, &input, &filter);
        assert!(!highlights.unfiltered);
        assert!(highlights.most_viewed.is_none());
        assert!(highlights.most_liked.is_none());
        assert!(highlights.most_disliked.is_none());
    }

    #[test]
    fn test_report_view_serializes_flat() {
        let input = DashboardInput::new(Vec::new(), vec![video("a", 10, 1)]);
        let filter = EngagementFilter::new();
        let metrics = MetricsEngine::new().compute(&input, &filter);
        let highlights = Highlights::resolve(&metrics, &input, &filter);

        let json = serde_json::to_value(ReportView {
            metrics: &metrics,
            highlights: &highlights,
        })
        .unwrap();
        assert_eq!(json["rollups"]["total_views"], 10);
        assert_eq!(json["highlights"]["most_viewed"]["title"], "a");
        assert_eq!(json["highlights"]["unfiltered"], false);
    }
}
