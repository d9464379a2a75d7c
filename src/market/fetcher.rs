//! Latest-candles reader.
//!
//! # Responsibilities
//! - Pick a read replica through the registry's round-robin
//! - Hold one pooled connection for the duration of a single query
//! - Return the newest rows first
//!
//! No caching and no retries: every call hits a replica and every failure
//! goes back to the caller.

use std::sync::Arc;

use thiserror::Error;

use crate::load_balancer::PgPoolRegistry;
use crate::market::record::{DataRecord, RawRow};

/// Reading market data failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no connection available from replica `{replica}`: {source}")]
    Acquire {
        replica: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("query against replica `{replica}` failed: {source}")]
    Query {
        replica: String,
        #[source]
        source: sqlx::Error,
    },
}

/// Reads the newest rows of the market data table.
pub struct DataFetcher {
    registry: Arc<PgPoolRegistry>,
    query: String,
}

impl DataFetcher {
    /// `table` must already be validated as `schema.table`.
    pub fn new(registry: Arc<PgPoolRegistry>, table: &str) -> Self {
        Self {
            registry,
            query: latest_rows_query(table),
        }
    }

    /// Up to `limit` rows ordered by `open_time` descending.
    ///
    /// Callers bound `limit`; zero is passed through and yields no rows.
    pub async fn fetch_latest(&self, limit: u32) -> Result<Vec<RawRow>, FetchError> {
        let replica = self.registry.next_read_pool();
        let name = replica.name();

        // Dropping the guard returns the connection on every exit path.
        let mut conn = replica
            .pool()
            .acquire()
            .await
            .map_err(|source| FetchError::Acquire {
                replica: name.to_string(),
                source,
            })?;

        let rows = sqlx::query_as::<_, RawRow>(&self.query)
            .bind(i64::from(limit))
            .fetch_all(&mut *conn)
            .await
            .map_err(|source| FetchError::Query {
                replica: name.to_string(),
                source,
            })?;

        tracing::debug!(replica = %name, limit, rows = rows.len(), "Fetched latest rows");
        Ok(rows)
    }

    /// [`fetch_latest`](Self::fetch_latest) converted to response records.
    pub async fn fetch_records(&self, limit: u32) -> Result<Vec<DataRecord>, FetchError> {
        let rows = self.fetch_latest(limit).await?;
        Ok(rows.into_iter().map(DataRecord::from).collect())
    }
}

fn latest_rows_query(table: &str) -> String {
    format!(
        "SELECT open_time::float8 AS open_time, open::float8 AS open, high::float8 AS high, \
         low::float8 AS low, close::float8 AS close, volume::float8 AS volume \
         FROM {table} ORDER BY open_time DESC LIMIT $1"
    )
}
