//! Catalog listing server
//!
//! Serves a filtered, sorted, paginated product listing over HTTP from a
//! SQLite or PostgreSQL store.

mod error;
mod http_api;
mod settings;

use std::path::PathBuf;

use clap::Parser;
use listing_core::Dialect;
use listing_db::{Store, StoreOptions};

use crate::error::ServerError;
use crate::http_api::{AppState, router};
use crate::settings::{Overrides, Settings, settings_path};

#[derive(Parser, Debug)]
#[command(name = "listing-server")]
#[command(about = "Serve the catalog product listing over HTTP", long_about = None)]
struct Args {
    /// Settings file (defaults to ~/.config/catalog-listing/settings.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Database connection string (postgres://... or sqlite3://path)
    #[arg(long)]
    database_url: Option<String>,

    /// Address to listen on
    #[arg(long)]
    bind: Option<String>,

    /// Maximum pooled database connections
    #[arg(long)]
    pool_size: Option<u32>,

    /// Statement timeout in milliseconds (0 disables it)
    #[arg(long)]
    query_timeout_ms: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let path = args.config.clone().unwrap_or_else(settings_path);
    let overrides = Overrides {
        database_url: args.database_url,
        bind: args.bind,
        pool_size: args.pool_size,
        query_timeout_ms: args.query_timeout_ms,
        log_level: args.log_level,
    };

    let settings = match Settings::resolve(&path, overrides) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    init_logging(&settings.log_level);

    if let Err(e) = run(settings).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(settings: Settings) -> Result<(), ServerError> {
    let dialect = Dialect::detect(&settings.database_url).ok_or_else(|| {
        ServerError::config(format!(
            "cannot tell the database engine from '{}'",
            settings.database_url
        ))
    })?;

    let options = StoreOptions::default().pool_size(settings.pool_size);
    let store = Store::connect(dialect, &settings.database_url, &options).await?;
    log::info!("Connected to {} store", dialect);

    let state = AppState {
        store: store.clone(),
        query_timeout: settings.query_timeout(),
    };
    let listener = tokio::net::TcpListener::bind(&settings.bind).await?;
    log::info!("Server running on http://{}", listener.local_addr()?);

    let served = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    store.close().await;
    log::info!("Store closed");
    Ok(served?)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Cannot listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}

/// Initialise `env_logger` at `level`. `RUST_LOG` takes precedence when set.
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_target(false)
        .init();
}
