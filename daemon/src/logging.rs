/// Diagnostic logging via `tracing`.
///
/// Logs go to stderr; stdout carries nothing but report lines. `RUST_LOG`
/// takes precedence over the configured filter.
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{LogConfig, DEFAULT_LOG_FILTER};

pub fn init(config: &LogConfig) {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::registry()
        .with(filter(from_env.as_deref(), &config.filter))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

/// Picks the first directive that parses: `from_env`, then `configured`,
/// then [`DEFAULT_LOG_FILTER`].
fn filter(from_env: Option<&str>, configured: &str) -> EnvFilter {
    if let Some(directive) = from_env {
        match EnvFilter::try_new(directive) {
            Ok(filter) => return filter,
            Err(e) => eprintln!("[log] Invalid RUST_LOG {directive:?} ({e}); ignoring"),
        }
    }
    EnvFilter::try_new(configured).unwrap_or_else(|e| {
        eprintln!("[log] Invalid filter {configured:?} ({e}); using {DEFAULT_LOG_FILTER}");
        EnvFilter::new(DEFAULT_LOG_FILTER)
    })
}
