// src/logging.rs
// Structured logging to stderr. Set RUST_LOG to override the default filter,
// e.g. `RUST_LOG=site_mirror=trace`.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,site_mirror=debug";

pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
