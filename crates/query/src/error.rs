//! Query error types

/// Errors that can occur while reading snapshot tables
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Connection failed
    #[error("connection failed: {0}")]
    Connection(String),

    /// Query execution failed
    #[error("query execution failed: {0}")]
    Execution(String),

    /// Invalid SQL (only SELECT/WITH allowed)
    #[error("invalid SQL: {0}")]
    InvalidSql(String),

    /// Table or column name that is not a plain SQL identifier
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Value could not be decoded from a result row
    #[error("decode error in column '{column}': {message}")]
    Decode {
        /// Column being decoded
        column: String,
        /// Decoder message
        message: String,
    },
}

impl QueryError {
    /// Create a Decode error
    pub fn decode(column: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.to_string(),
        }
    }
}

impl From<sqlx::Error> for QueryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(e) => QueryError::Config(e.to_string()),
            sqlx::Error::Io(e) => QueryError::Connection(e.to_string()),
            sqlx::Error::Tls(e) => QueryError::Connection(e.to_string()),
            sqlx::Error::PoolTimedOut => {
                QueryError::Connection("timed out waiting for a pooled connection".to_string())
            }
            sqlx::Error::PoolClosed => QueryError::Connection("pool is closed".to_string()),
            other => QueryError::Execution(other.to_string()),
        }
    }
}
