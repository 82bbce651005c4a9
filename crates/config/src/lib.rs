//! Vidstats Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! Minimal config should just work - only specify what you need to change.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use vidstats_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[store]\nurl = \"sqlite://stats.db\"").unwrap();
//! ```
//!
//! # Example Minimal Config
//!
//! ```toml
//! [store]
//! url = "postgres://dashboard@db:5432/youtube_dashboard"
//!
//! [dashboard]
//! default_range = "30d"
//! ```

mod cache;
mod dashboard;
mod error;
mod logging;
mod store;
mod validation;

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub use cache::CacheConfig;
pub use dashboard::DashboardConfig;
pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel, LogOutput};
pub use store::{DEFAULT_STORE_URL, StoreBackend, StoreConfig};

use serde::Deserialize;

/// Files tried, in order, when no config path is given
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["configs/config.toml", "config.toml"];

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,

    /// Snapshot store connection and tables
    pub store: StoreConfig,

    /// Snapshot cache settings
    pub cache: CacheConfig,

    /// Dashboard defaults
    pub dashboard: DashboardConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, contains invalid TOML, or
    /// fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Load from `path` if given, else the first default path that exists
    ///
    /// Returns the path that was loaded, or `None` when falling back to
    /// built-in defaults. An explicit path that does not exist is an error.
    pub fn load(path: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        Self::load_from(path, Path::new("."))
    }

    /// Like [`Config::load`], resolving default paths against `base`
    pub fn load_from(path: Option<&Path>, base: &Path) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = path {
            return Ok((Self::from_file(path)?, Some(path.to_path_buf())));
        }

        for candidate in DEFAULT_CONFIG_PATHS {
            let candidate = base.join(candidate);
            if candidate.is_file() {
                return Ok((Self::from_file(&candidate)?, Some(candidate)));
            }
        }

        Ok((Self::default(), None))
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
