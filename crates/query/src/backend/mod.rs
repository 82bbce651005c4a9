//! Query backend trait and implementations

pub mod postgres;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::QueryError;
use crate::result::QueryResult;

/// Query backend trait
///
/// Implemented by the PostgreSQL and SQLite backends.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    /// Execute a SQL query
    async fn execute(&self, sql: &str) -> Result<QueryResult, QueryError>;

    /// Check if backend is available
    async fn health_check(&self) -> Result<(), QueryError>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Validate SQL query - only allow SELECT and WITH (CTE) queries
///
/// This is a guardrail against accidental writes to the snapshot store,
/// not a security boundary.
pub fn validate_sql(sql: &str) -> Result<(), QueryError> {
    let trimmed = sql.trim();
    let upper = trimmed.to_uppercase();

    if !upper.starts_with("SELECT") && !upper.starts_with("WITH") {
        return Err(QueryError::InvalidSql(
            "only SELECT and WITH queries are allowed".to_string(),
        ));
    }

    // SELECT ... INTO creates tables in PostgreSQL
    if upper.contains(" INTO ") {
        return Err(QueryError::InvalidSql(
            "SELECT INTO is not allowed".to_string(),
        ));
    }

    // Allow trailing semicolon for convenience
    if trimmed.contains(';') && !trimmed.ends_with(';') {
        return Err(QueryError::InvalidSql(
            "multiple statements not allowed".to_string(),
        ));
    }

    Ok(())
}

/// Validate a table or column name before it is spliced into SQL
///
/// Accepts `name` or `schema.name`, where each part is
/// `[A-Za-z_][A-Za-z0-9_]*`.
pub fn validate_identifier(ident: &str) -> Result<(), QueryError> {
    let parts: Vec<&str> = ident.split('.').collect();
    if parts.len() > 2 {
        return Err(QueryError::InvalidIdentifier(ident.to_string()));
    }

    for part in parts {
        let mut chars = part.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(QueryError::InvalidIdentifier(ident.to_string()));
        }
    }

    Ok(())
}
