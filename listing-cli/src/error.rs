use thiserror::Error;

/// Errors that abort a verification run before any table is checked.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Unknown or unsupported dialect name
    #[error("{0}")]
    Dialect(#[from] listing_core::DialectError),

    /// The database could not be opened
    #[error("Database error: {0}")]
    Database(String),

    /// Runtime creation failed
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl CliError {
    pub(crate) fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }
}
