//! The shared store handle injected into the listing service and the
//! schema verifier.

use std::path::Path;
use std::time::{Duration, Instant};

use listing_core::{Dialect, ListingCriteria, ProductRecord, QueryFragment, build_listing_query};
use sqlx::postgres::PgPool;

use crate::error::StoreError;
use crate::postgres;
use crate::sqlite::{self, SqlitePool};

/// Options applied when a store is opened.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Maximum number of pooled connections.
    pub pool_size: u32,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { pool_size: 10 }
    }
}

impl StoreOptions {
    pub fn pool_size(mut self, size: u32) -> Self {
        self.pool_size = size;
        self
    }
}

/// A pooled connection to one of the supported engines.
///
/// Cloning is cheap; clones share the same pool.
#[derive(Clone)]
pub enum Store {
    Sqlite(SqlitePool),
    Postgres(PgPool),
}

impl Store {
    /// Open a store for `dialect` at `dsn`.
    ///
    /// SQLite accepts a file path, optionally prefixed with `sqlite3://`.
    /// An in-memory SQLite database always gets a single connection, since
    /// each connection would otherwise see its own empty database.
    pub async fn connect(
        dialect: Dialect,
        dsn: &str,
        options: &StoreOptions,
    ) -> Result<Self, StoreError> {
        match dialect {
            Dialect::Sqlite => {
                let target = dialect.connection_target(dsn);
                let pool = if target == ":memory:" {
                    SqlitePool::open_memory()?
                } else {
                    SqlitePool::open(Path::new(target), options.pool_size as usize)?
                };
                Ok(Self::Sqlite(pool))
            }
            Dialect::Postgres => Ok(Self::Postgres(
                postgres::connect(dsn, options.pool_size).await?,
            )),
        }
    }

    /// Engine family this store talks to.
    pub fn dialect(&self) -> Dialect {
        match self {
            Self::Sqlite(_) => Dialect::Sqlite,
            Self::Postgres(_) => Dialect::Postgres,
        }
    }

    /// Release every pooled connection.
    pub async fn close(self) {
        match self {
            Self::Sqlite(pool) => {
                log::debug!("Closing {} SQLite connection(s)", pool.size());
                drop(pool);
            }
            Self::Postgres(pool) => pool.close().await,
        }
    }

    /// Build and run the listing statement for `criteria`.
    pub async fn list_products(
        &self,
        criteria: &ListingCriteria,
        timeout: Option<Duration>,
    ) -> Result<Vec<ProductRecord>, StoreError> {
        let fragment = build_listing_query(criteria, self.dialect());
        self.fetch_products(&fragment, timeout).await
    }

    /// Run a listing statement and map every row to a [`ProductRecord`].
    ///
    /// Rows come back in statement order. Any failure, including a single
    /// undecodable row, discards the whole result.
    pub async fn fetch_products(
        &self,
        fragment: &QueryFragment,
        timeout: Option<Duration>,
    ) -> Result<Vec<ProductRecord>, StoreError> {
        self.check_dialect(fragment.dialect())?;
        log::debug!(
            "Listing query: {} [{}]",
            fragment.sql(),
            fragment
                .args()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );

        let start = Instant::now();
        let records = match self {
            Self::Sqlite(pool) => {
                let fragment = fragment.clone();
                pool.run(timeout, move |conn| sqlite::fetch_products(conn, &fragment))
                    .await?
            }
            Self::Postgres(pool) => {
                with_timeout(timeout, postgres::fetch_products(pool, fragment)).await?
            }
        };
        log::debug!("Fetched {} row(s) in {:?}", records.len(), start.elapsed());
        Ok(records)
    }

    /// Whether `table` exists, asked through this engine's catalog.
    pub async fn table_exists(&self, table: &str) -> Result<bool, StoreError> {
        match self {
            Self::Sqlite(pool) => {
                let table = table.to_string();
                pool.run(None, move |conn| sqlite::table_exists(conn, &table))
                    .await
            }
            Self::Postgres(pool) => postgres::table_exists(pool, table).await,
        }
    }

    /// Number of rows in `table`.
    pub async fn count_rows(&self, table: &str) -> Result<i64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(table));
        match self {
            Self::Sqlite(pool) => pool.run(None, move |conn| sqlite::count_rows(conn, &sql)).await,
            Self::Postgres(pool) => postgres::count_rows(pool, &sql).await,
        }
    }

    fn check_dialect(&self, statement: Dialect) -> Result<(), StoreError> {
        let store = self.dialect();
        if statement == store {
            Ok(())
        } else {
            Err(StoreError::DialectMismatch { statement, store })
        }
    }
}

/// Quote `name` as an SQL identifier, doubling any embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

async fn with_timeout<T>(
    timeout: Option<Duration>,
    fut: impl std::future::Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| StoreError::Timeout(limit))?,
        None => fut.await,
    }
}
