//! Query configuration types

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Query backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryBackendType {
    /// PostgreSQL backend
    Postgres,
    /// SQLite backend
    Sqlite,
}

impl QueryBackendType {
    /// Infer the backend from a connection URL scheme
    pub fn from_url(url: &str) -> Option<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Some(Self::Postgres)
        } else if url.starts_with("sqlite:") {
            Some(Self::Sqlite)
        } else {
            None
        }
    }
}

/// Connection settings for the snapshot store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Backend type; inferred from the URL scheme when unset
    pub backend: Option<QueryBackendType>,

    /// Connection URL
    pub url: String,

    /// Maximum pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    4
}

impl QueryConfig {
    /// Create config for a PostgreSQL store
    pub fn postgres(url: impl Into<String>) -> Self {
        Self {
            backend: Some(QueryBackendType::Postgres),
            url: url.into(),
            max_connections: default_max_connections(),
        }
    }

    /// Create config for a SQLite store
    pub fn sqlite(url: impl Into<String>) -> Self {
        Self {
            backend: Some(QueryBackendType::Sqlite),
            url: url.into(),
            max_connections: default_max_connections(),
        }
    }

    /// Get the effective backend type
    pub fn effective_backend(&self) -> Result<QueryBackendType, QueryError> {
        if let Some(backend) = self.backend {
            return Ok(backend);
        }

        QueryBackendType::from_url(&self.url).ok_or_else(|| {
            QueryError::Config(format!(
                "cannot infer backend from url '{}'. Options:\n  \
                 1. url = \"postgres://user@host:5432/db\"\n  \
                 2. url = \"sqlite://path/to/stats.db\"\n  \
                 3. backend = \"postgres\" | \"sqlite\"",
                self.url
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_from_url() {
        assert_eq!(
            QueryBackendType::from_url("postgres://localhost/db"),
            Some(QueryBackendType::Postgres)
        );
        assert_eq!(
            QueryBackendType::from_url("postgresql://localhost/db"),
            Some(QueryBackendType::Postgres)
        );
        assert_eq!(
            QueryBackendType::from_url("sqlite://stats.db"),
            Some(QueryBackendType::Sqlite)
        );
        assert_eq!(QueryBackendType::from_url("mysql://x"), None);
    }

    #[test]
    fn test_explicit_backend_wins() {
        let mut config = QueryConfig::sqlite("postgres://localhost/db");
        assert_eq!(
            config.effective_backend().unwrap(),
            QueryBackendType::Sqlite
        );

        config.backend = None;
        assert_eq!(
            config.effective_backend().unwrap(),
            QueryBackendType::Postgres
        );
    }

    #[test]
    fn test_unknown_scheme_is_config_error() {
        let config = QueryConfig {
            backend: None,
            url: "mysql://localhost/db".to_string(),
            max_connections: 1,
        };
        assert!(matches!(
            config.effective_backend(),
            Err(QueryError::Config(_))
        ));
    }
}
