use std::time::Duration;

use listing_core::Dialect;
use thiserror::Error;

/// A failed round-trip to the store.
///
/// Connection problems, statement errors, row decode mismatches, and
/// timeouts all land here; callers treat any variant as "the query failed".
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Postgres error: {0}")]
    Postgres(#[from] sqlx::Error),
    #[error("query timed out after {0:?}")]
    Timeout(Duration),
    #[error("statement built for {statement} cannot run on a {store} store")]
    DialectMismatch { statement: Dialect, store: Dialect },
    #[error("query cancelled before it started")]
    Cancelled,
    #[error("SQLite connection lock poisoned")]
    Poisoned,
    #[error("worker task failed: {0}")]
    Task(String),
}

impl StoreError {
    pub fn task(msg: impl Into<String>) -> Self {
        Self::Task(msg.into())
    }
}
