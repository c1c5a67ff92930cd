//! Schema verification: check that expected tables exist and count their
//! rows, one table at a time, without letting one failure stop the run.

use std::fmt;

use listing_core::{Dialect, DialectError};
use thiserror::Error;

use crate::error::StoreError;
use crate::store::Store;

/// Tables the expense schema is expected to contain.
pub const EXPECTED_TABLES: &[&str] = &["users", "categories", "expenses"];

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error(transparent)]
    Dialect(#[from] DialectError),
    #[error("{dialect} introspection cannot run on a {store} store")]
    DialectMismatch { dialect: Dialect, store: Dialect },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of checking one table.
#[derive(Debug)]
pub enum TableStatus {
    /// The table exists and holds `rows` rows.
    Found { rows: i64 },
    NotFound,
    /// The existence check itself failed.
    ExistenceFailed(VerifyError),
    /// The table exists but counting its rows failed.
    CountFailed(VerifyError),
}

/// Result of verifying a single table.
#[derive(Debug)]
pub struct TableCheckResult {
    pub table: String,
    pub status: TableStatus,
}

impl TableCheckResult {
    pub fn exists(&self) -> bool {
        matches!(
            self.status,
            TableStatus::Found { .. } | TableStatus::CountFailed(_)
        )
    }

    /// Row count, only known when the table exists and the count worked.
    pub fn rows(&self) -> Option<i64> {
        match self.status {
            TableStatus::Found { rows } => Some(rows),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&VerifyError> {
        match &self.status {
            TableStatus::ExistenceFailed(e) | TableStatus::CountFailed(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for TableCheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            TableStatus::Found { rows } => write!(f, "{}: OK (rows={})", self.table, rows),
            TableStatus::NotFound => write!(f, "{}: NOT FOUND", self.table),
            TableStatus::ExistenceFailed(e) => {
                write!(f, "{}: error checking existence: {}", self.table, e)
            }
            TableStatus::CountFailed(e) => write!(f, "{}: error counting rows: {}", self.table, e),
        }
    }
}

/// Check whether `table` exists using the introspection strategy of the
/// dialect named by `dialect`.
///
/// An unknown dialect name is an error, never a "not found".
pub async fn table_exists(store: &Store, dialect: &str, table: &str) -> Result<bool, VerifyError> {
    let dialect: Dialect = dialect.parse()?;
    let store_dialect = store.dialect();
    if dialect != store_dialect {
        return Err(VerifyError::DialectMismatch {
            dialect,
            store: store_dialect,
        });
    }
    Ok(store.table_exists(table).await?)
}

/// Verify one table: existence first, then a row count if it exists.
pub async fn verify_table(store: &Store, dialect: &str, table: &str) -> TableCheckResult {
    let status = match table_exists(store, dialect, table).await {
        Err(e) => TableStatus::ExistenceFailed(e),
        Ok(false) => TableStatus::NotFound,
        Ok(true) => match store.count_rows(table).await {
            Ok(rows) => TableStatus::Found { rows },
            Err(e) => TableStatus::CountFailed(e.into()),
        },
    };
    TableCheckResult {
        table: table.to_string(),
        status,
    }
}

/// Verify each table in order, handing every result to `on_result` as soon
/// as it is known.
///
/// A failing table is recorded and the run moves on to the next one.
pub async fn verify_tables<F>(
    store: &Store,
    dialect: &str,
    tables: &[&str],
    mut on_result: F,
) -> Vec<TableCheckResult>
where
    F: FnMut(&TableCheckResult),
{
    let mut results = Vec::with_capacity(tables.len());
    for &table in tables {
        let result = verify_table(store, dialect, table).await;
        if let Some(e) = result.error() {
            log::debug!("Verification of '{}' failed: {}", table, e);
        }
        on_result(&result);
        results.push(result);
    }
    results
}
