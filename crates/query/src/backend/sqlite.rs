//! SQLite backend
//!
//! Local snapshot databases and in-memory stores for tests.
//!
//! SQLite typing is dynamic: a column declared `INTEGER` may hold text. Cells
//! are decoded by their reported type without compatibility checks, so the
//! record layer sees whatever the file actually stores.

use std::str::FromStr;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column as _, Row, TypeInfo, ValueRef};

use crate::backend::{QueryBackend, validate_sql};
use crate::error::QueryError;
use crate::result::{Column, DataType, QueryResult};

/// SQLite query backend
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    /// Connect to a `sqlite:` URL (e.g. `sqlite://data/stats.db`)
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, QueryError> {
        let options = SqliteConnectOptions::from_str(url)?.read_only(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        tracing::debug!(url, "opened sqlite store");
        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueryBackend for SqliteBackend {
    async fn execute(&self, sql: &str) -> Result<QueryResult, QueryError> {
        validate_sql(sql)?;

        let start = Instant::now();
        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        let execution_time_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(rows = rows.len(), time_ms = execution_time_ms, "query executed");

        let columns = rows.first().map(columns_of).unwrap_or_default();
        let mut data = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut values = Vec::with_capacity(row.len());
            for idx in 0..row.len() {
                values.push(value_to_json(row, idx)?);
            }
            data.push(values);
        }

        Ok(QueryResult::new(columns, data, execution_time_ms))
    }

    async fn health_check(&self) -> Result<(), QueryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}

fn columns_of(row: &SqliteRow) -> Vec<Column> {
    row.columns()
        .iter()
        .map(|c| {
            Column::new(
                c.name(),
                DataType::from_type_name(c.type_info().name()),
                true,
            )
        })
        .collect()
}

fn value_to_json(row: &SqliteRow, idx: usize) -> Result<Value, QueryError> {
    let column = row.column(idx).name().to_string();
    let raw = row
        .try_get_raw(idx)
        .map_err(|e| QueryError::decode(&column, e))?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_ascii_uppercase();

    let decode = |e: sqlx::Error| QueryError::decode(&column, e);

    let value = if type_name.contains("INT") {
        Value::from(row.try_get_unchecked::<i64, _>(idx).map_err(decode)?)
    } else if type_name == "REAL" || type_name.contains("FLOA") || type_name.contains("DOUB") {
        float_to_json(row.try_get_unchecked::<f64, _>(idx).map_err(decode)?)
    } else if type_name == "NUMERIC" {
        let val = row.try_get_unchecked::<f64, _>(idx).map_err(decode)?;
        if val.fract() == 0.0 && val.abs() < i64::MAX as f64 {
            Value::from(val as i64)
        } else {
            float_to_json(val)
        }
    } else if type_name == "BOOLEAN" {
        Value::Bool(row.try_get_unchecked::<bool, _>(idx).map_err(decode)?)
    } else if type_name == "BLOB" {
        Value::Null
    } else {
        // TEXT, DATETIME, DATE and untyped expressions
        Value::String(row.try_get_unchecked::<String, _>(idx).map_err(decode)?)
    };

    Ok(value)
}

fn float_to_json(val: f64) -> Value {
    serde_json::Number::from_f64(val)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

#[cfg(test)]
#[path = "sqlite_test.rs"]
mod sqlite_test;
