//! PostgreSQL backend
//!
//! Production store for the channel and video snapshot tables.

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Column as _, Row, TypeInfo, ValueRef};

use crate::backend::{QueryBackend, validate_sql};
use crate::error::QueryError;
use crate::result::{Column, DataType, QueryResult};

/// PostgreSQL query backend
#[derive(Debug, Clone)]
pub struct PostgresBackend {
    pool: PgPool,
}

impl PostgresBackend {
    /// Connect a pool to the given `postgres://` URL
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, QueryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(url)
            .await?;

        tracing::debug!(max_connections, "connected to postgres");
        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueryBackend for PostgresBackend {
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
        "postgres"
    }
}

fn columns_of(row: &PgRow) -> Vec<Column> {
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

/// How a column type is read into JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Numeric,
    Bool,
    Text,
    TimestampTz,
    Timestamp,
    Date,
    Unsupported,
}

fn cell_kind(type_name: &str) -> CellKind {
    match type_name {
        "INT2" => CellKind::Int2,
        "INT4" => CellKind::Int4,
        "INT8" => CellKind::Int8,
        "FLOAT4" => CellKind::Float4,
        "FLOAT8" => CellKind::Float8,
        "NUMERIC" => CellKind::Numeric,
        "BOOL" => CellKind::Bool,
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CITEXT" => CellKind::Text,
        "TIMESTAMPTZ" => CellKind::TimestampTz,
        "TIMESTAMP" => CellKind::Timestamp,
        "DATE" => CellKind::Date,
        _ => CellKind::Unsupported,
    }
}

/// Convert a single cell to JSON
///
/// Types outside the snapshot schema (JSONB, arrays, ...) become null,
/// which downstream record construction treats as missing.
fn value_to_json(row: &PgRow, idx: usize) -> Result<Value, QueryError> {
    let column = row.column(idx).name().to_string();
    let raw = row
        .try_get_raw(idx)
        .map_err(|e| QueryError::decode(&column, e))?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_string();

    let decode = |e: sqlx::Error| QueryError::decode(&column, e);

    let value = match cell_kind(&type_name) {
        CellKind::Int2 => Value::from(row.try_get::<i16, _>(idx).map_err(decode)?),
        CellKind::Int4 => Value::from(row.try_get::<i32, _>(idx).map_err(decode)?),
        CellKind::Int8 => Value::from(row.try_get::<i64, _>(idx).map_err(decode)?),
        CellKind::Float4 => float_to_json(row.try_get::<f32, _>(idx).map_err(decode)? as f64),
        CellKind::Float8 => float_to_json(row.try_get::<f64, _>(idx).map_err(decode)?),
        // NaN and out-of-range values do not decode; they read as null
        CellKind::Numeric => match row.try_get::<Decimal, _>(idx) {
            Ok(val) => decimal_to_json(val),
            Err(e) => {
                tracing::debug!(column = %column, error = %e, "numeric cell not representable, reading as null");
                Value::Null
            }
        },
        CellKind::Bool => Value::Bool(row.try_get::<bool, _>(idx).map_err(decode)?),
        CellKind::Text => Value::String(row.try_get::<String, _>(idx).map_err(decode)?),
        CellKind::TimestampTz => timestamptz_to_json(row.try_get(idx).map_err(decode)?),
        CellKind::Timestamp => timestamp_to_json(row.try_get(idx).map_err(decode)?),
        CellKind::Date => date_to_json(row.try_get(idx).map_err(decode)?),
        CellKind::Unsupported => {
            tracing::debug!(column = %column, type_name = %type_name, "unsupported column type, reading as null");
            Value::Null
        }
    };

    Ok(value)
}

fn float_to_json(val: f64) -> Value {
    serde_json::Number::from_f64(val)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Whole decimals become integers, others floats, else the decimal text
fn decimal_to_json(val: Decimal) -> Value {
    if val.fract().is_zero() {
        if let Some(i) = val.to_i64() {
            return Value::from(i);
        }
        if let Some(u) = val.to_u64() {
            return Value::from(u);
        }
    }

    val.to_f64()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(val.to_string()))
}

fn timestamptz_to_json(ts: DateTime<Utc>) -> Value {
    Value::String(ts.to_rfc3339())
}

/// Naive timestamps are taken as UTC
fn timestamp_to_json(ts: NaiveDateTime) -> Value {
    Value::String(ts.and_utc().to_rfc3339())
}

fn date_to_json(date: NaiveDate) -> Value {
    Value::String(date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
#[path = "postgres_test.rs"]
mod postgres_test;
