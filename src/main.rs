use std::io;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `CCS_LOG=debug`
const LOG_ENV: &str = "CCS_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

fn main() {
    init_logging();

    if let Err(err) = ccs::cli::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
