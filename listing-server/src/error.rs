use thiserror::Error;

/// Errors that stop the server from starting or serving.
#[derive(Debug, Error)]
pub enum ServerError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Settings could not be read
    #[error("Config error: {0}")]
    Config(String),

    /// The store could not be opened
    #[error("Database error: {0}")]
    Database(#[from] listing_db::StoreError),
}

impl ServerError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
