//! catalog-verify
//!
//! Checks that the expected tables of a catalog database exist and
//! reports how many rows each one holds.

mod cli_types;
mod error;

use std::io::Write;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use listing_core::Dialect;
use listing_db::{Store, StoreOptions, TableCheckResult, TableStatus, verify_tables};

use crate::cli_types::Cli;
use crate::error::CliError;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::runtime(e.to_string()))
    {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    // Per-table failures are reported inline; only an unopenable store is fatal.
    if let Err(e) = runtime.block_on(run(&cli)) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<Vec<TableCheckResult>, CliError> {
    let dialect: Dialect = cli.dialect.parse()?;
    let store = Store::connect(dialect, &cli.dsn, &StoreOptions::default().pool_size(1))
        .await
        .map_err(|e| CliError::database(format!("failed to open db: {e}")))?;
    log::debug!("Opened {} store", dialect);

    let results = verify_tables(&store, &cli.dialect, &cli.tables(), report).await;
    store.close().await;
    Ok(results)
}

fn report(result: &TableCheckResult) {
    let line = result.to_string();
    let line = match result.status {
        TableStatus::Found { .. } => line.if_supports_color(Stdout, |t| t.green()).to_string(),
        TableStatus::NotFound => line.if_supports_color(Stdout, |t| t.yellow()).to_string(),
        _ => line.if_supports_color(Stdout, |t| t.red()).to_string(),
    };
    log::info!("{}", line);
}

/// Log to stdout. Info lines are printed bare since they are the report
/// itself; `--verbose` switches to timestamped debug output.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default));
    builder.target(env_logger::Target::Stdout);
    if verbose {
        builder.format_timestamp_millis();
    } else {
        builder.format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(
                buf,
                "{}: {}",
                level.as_str().to_lowercase(),
                record.args()
            ),
        });
    }
    builder.init();
}
