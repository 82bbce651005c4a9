//! Shared command plumbing
//!
//! Store connection, cached snapshot loading and filter arguments used by
//! every subcommand.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use vidstats_analytics::{DashboardInput, DedupPolicy, EngagementFilter, TimeRange};
use vidstats_config::{Config, DashboardConfig, StoreBackend, StoreConfig};
use vidstats_query::{
    QueryBackendType, QueryConfig, QueryEngine, SnapshotCache, SnapshotSource, SnapshotTables,
    TableNames,
};

/// Date range and ranking arguments
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Start date, inclusive (YYYY-MM-DD); needs --to
    #[arg(long, value_name = "DATE", value_parser = parse_date_arg)]
    pub from: Option<NaiveDate>,

    /// End date, inclusive (YYYY-MM-DD); needs --from
    #[arg(long, value_name = "DATE", value_parser = parse_date_arg)]
    pub to: Option<NaiveDate>,

    /// Time range (e.g., 7d, 30d, mtd, ytd, 2024-01-01,2024-01-31)
    #[arg(short, long, conflicts_with_all = ["from", "to"])]
    pub range: Option<String>,

    /// Number of videos in the views and engagement rankings
    #[arg(short = 'n', long)]
    pub top_n: Option<usize>,

    /// Snapshot dedup policy (all, latest)
    #[arg(long)]
    pub dedup: Option<String>,
}

fn parse_date_arg(s: &str) -> std::result::Result<NaiveDate, String> {
    vidstats_analytics::timerange::parse_date(s).map_err(|e| e.to_string())
}

/// Build the engine filter from arguments and config defaults
///
/// Range precedence: `--from/--to`, then `--range`, then
/// `[dashboard].default_range`. A lone `--from` or `--to` disables date
/// filtering.
pub fn build_filter(
    args: &FilterArgs,
    dashboard: &DashboardConfig,
    now: DateTime<Utc>,
) -> Result<EngagementFilter> {
    let dedup = match args.dedup.as_deref() {
        Some(name) => DedupPolicy::parse(name).context("invalid --dedup")?,
        None => dashboard.dedup,
    };

    let mut filter = EngagementFilter::new()
        .with_top_n(args.top_n.unwrap_or(dashboard.top_n))
        .with_distribution_limit(dashboard.distribution_limit)
        .with_dedup(dedup);

    if args.from.is_some() || args.to.is_some() {
        if args.from.is_none() || args.to.is_none() {
            tracing::warn!("both --from and --to are needed, date filter disabled");
        }
        filter = filter
            .with_dates(args.from, args.to)
            .context("invalid date range")?;
    } else if let Some(range) = args.range.as_deref().or(dashboard.default_range.as_deref()) {
        let range = TimeRange::parse_at(range, now)
            .with_context(|| format!("invalid time range '{}'", range))?;
        filter = filter.with_time_range(range);
    }

    Ok(filter)
}

/// Connection settings for the query crate
pub fn query_config(store: &StoreConfig) -> QueryConfig {
    let backend = match store.effective_backend() {
        StoreBackend::Postgres => QueryBackendType::Postgres,
        StoreBackend::Sqlite => QueryBackendType::Sqlite,
    };

    QueryConfig {
        backend: Some(backend),
        url: store.url.clone(),
        max_connections: store.max_connections,
    }
}

/// Table names for the snapshot reads
pub fn table_names(store: &StoreConfig) -> TableNames {
    TableNames {
        channel_table: store.channel_table.clone(),
        video_table: store.video_table.clone(),
        order_column: store.order_column.clone(),
    }
}

/// Connect to the store
pub async fn open_source(config: &Config) -> Result<SnapshotSource> {
    let engine = QueryEngine::connect(&query_config(&config.store))
        .await
        .context("failed to connect to snapshot store")?;

    tracing::debug!(backend = engine.backend_name(), "connected to snapshot store");

    SnapshotSource::new(engine.backend(), table_names(&config.store))
        .context("invalid [store] table names")
}

/// Snapshot loading through the TTL cache
pub struct Snapshots {
    source: SnapshotSource,
    cache: SnapshotCache,
}

impl Snapshots {
    /// Connect and set up the cache from config
    pub async fn open(config: &Config) -> Result<Self> {
        Ok(Self {
            source: open_source(config).await?,
            cache: SnapshotCache::new(config.cache.ttl),
        })
    }

    /// Raw tables, from cache while fresh
    pub async fn tables(&self) -> Result<Arc<SnapshotTables>> {
        self.cache
            .get_or_load(&self.source)
            .await
            .context("failed to load snapshot tables")
    }

    /// Typed engine input
    pub async fn input(&self) -> Result<DashboardInput> {
        let tables = self.tables().await?;
        Ok(DashboardInput::from_tables(&tables))
    }

    /// Ping the store
    pub async fn health_check(&self) -> Result<()> {
        self.source
            .health_check()
            .await
            .context("snapshot store health check failed")
    }

    /// Backend name for summaries
    pub fn backend_name(&self) -> &'static str {
        self.source.backend_name()
    }
}
