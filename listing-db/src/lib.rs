//! Store access for the catalog listing.
//!
//! Opens pooled connections to SQLite (via rusqlite with bundled feature)
//! or PostgreSQL (via sqlx), executes listing statements built by
//! `listing-core`, and verifies that an expected schema is present.

pub mod error;
pub mod postgres;
pub mod sqlite;
pub mod store;
pub mod verify;

pub use error::StoreError;
pub use sqlite::SqlitePool;
pub use store::{Store, StoreOptions, quote_identifier};
pub use verify::{
    EXPECTED_TABLES, TableCheckResult, TableStatus, VerifyError, table_exists, verify_table,
    verify_tables,
};
