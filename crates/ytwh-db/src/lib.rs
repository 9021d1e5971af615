//! Postgres access for the warehouse: pool setup, the novelty filter and the
//! bulk row sink.

use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use ytwh_core::AppConfig;

pub mod novelty;
pub mod schema;
pub mod sink;
pub mod warehouse;

pub use novelty::{all_keys, not_in_table, NaturalKey};
pub use schema::{Dimension, CHANNEL_FACT_TABLE, VIDEO_FACT_TABLE};
pub use sink::{insert_rows, SinkRow};
pub use warehouse::Warehouse;

const DEFAULT_MAX_CONNECTIONS: u32 = 2;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections,
            acquire_timeout_secs: config.db_acquire_timeout_secs,
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    /// A bulk insert failed and its transaction was rolled back; none of the
    /// `rows` were written.
    #[error("insert of {rows} rows into {table} failed: {source}")]
    Insert {
        table: &'static str,
        rows: usize,
        #[source]
        source: sqlx::Error,
    },
}

/// Connect to a Postgres pool using explicit URL and config.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the connection cannot be established.
pub async fn connect_pool(database_url: &str, config: PoolConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(database_url)
        .await
}

/// Send a `SELECT 1` to verify the pool has a live connection.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_config_has_sane_defaults() {
        let config = PoolConfig::default();

        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.min_connections, DEFAULT_MIN_CONNECTIONS);
        assert_eq!(config.acquire_timeout_secs, DEFAULT_ACQUIRE_TIMEOUT_SECS);
    }

    #[test]
    fn insert_error_names_table_and_row_count() {
        let err = DbError::Insert {
            table: "video_dim",
            rows: 3,
            source: sqlx::Error::RowNotFound,
        };
        let msg = err.to_string();
        assert!(msg.contains("video_dim"), "got: {msg}");
        assert!(msg.contains("3 rows"), "got: {msg}");
    }
}
