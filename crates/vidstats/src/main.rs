//! Vidstats - Channel and video snapshot analytics
//!
//! # Usage
//!
//! ```bash
//! # Channel KPIs, engagement rollups and rankings
//! vidstats report
//! vidstats --config configs/config.toml report --range 30d
//!
//! # Filtered video table
//! vidstats videos --from 2024-01-01 --to 2024-01-31 --format csv
//!
//! # Subscriber growth
//! vidstats growth --granularity monthly
//!
//! # Verify the snapshot store
//! vidstats check
//! ```

mod cmd;

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use vidstats_config::{Config, LogConfig, LogFormat, LogOutput};

/// Vidstats - Channel and video snapshot analytics
#[derive(Parser, Debug)]
#[command(name = "vidstats")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Channel KPIs, engagement rollups and rankings
    Report(cmd::report::ReportArgs),

    /// Filtered video table with engagement rates
    Videos(cmd::videos::VideosArgs),

    /// Subscriber count over time
    Growth(cmd::growth::GrowthArgs),

    /// Verify the snapshot store is reachable and readable
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, loaded_from) =
        Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    let log_level = resolve_log_level(cli.log_level.as_deref(), &config.log);
    init_logging(&log_level, &config.log)?;

    match loaded_from {
        Some(path) => tracing::debug!(path = %path.display(), "configuration loaded"),
        None => tracing::debug!("no configuration file found, using defaults"),
    }

    match cli.command {
        Command::Report(args) => cmd::report::run(args, &config).await,
        Command::Videos(args) => cmd::videos::run(args, &config).await,
        Command::Growth(args) => cmd::growth::run(args, &config).await,
        Command::Check => cmd::check::run(&config).await,
    }
}

/// Resolve log level: CLI flag > config file > default "info"
fn resolve_log_level(cli_level: Option<&str>, log: &LogConfig) -> String {
    match cli_level {
        Some(level) => level.to_string(),
        None => log.level.as_str().to_string(),
    }
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str, log: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let (writer, ansi) = match &log.output {
        LogOutput::Stdout => (BoxMakeWriter::new(std::io::stdout), true),
        LogOutput::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        LogOutput::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
    };

    let layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_ansi(ansi)
        .with_writer(writer);

    match log.format {
        LogFormat::Console => tracing_subscriber::registry()
            .with(layer)
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(layer.json())
            .with(filter)
            .init(),
    }

    Ok(())
}
