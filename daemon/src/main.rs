mod bridge;
mod channel;
mod config;
mod event;
mod logging;
mod monitor;
mod paths;
mod process_monitor;
mod report;
mod signals;
mod source;

use tracing::{error, info, warn};

use crate::monitor::Monitor;
use crate::process_monitor::ProcessPoller;
use crate::signals::ShutdownSignal;

#[tokio::main]
async fn main() {
    // ── Configuration ─────────────────────────────────────────────────────────
    let config_path = paths::config_file_path();
    let (config, config_error) = match config_path.as_deref() {
        Some(path) => match config::load_or_default(path) {
            Ok(c) => (c, None),
            Err(e) => (config::Config::default(), Some(e)),
        },
        None => (config::Config::default(), None),
    };

    // ── Logging ───────────────────────────────────────────────────────────────
    logging::init(&config.log);
    if let Some(e) = config_error {
        warn!(error = %format!("{e:#}"), "config error; using defaults");
    }

    // ── Signals ───────────────────────────────────────────────────────────────
    let mut shutdown = match ShutdownSignal::install() {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "failed to install signal handlers");
            std::process::exit(1);
        }
    };

    // ── Event bridge ──────────────────────────────────────────────────────────
    let mut monitor = Monitor::start(config.channel.effective_capacity(), tokio::io::stdout());

    let source = match source::spawn(ProcessPoller::new(&config.source), monitor.bridge()) {
        Ok(handle) => handle,
        Err(e) => {
            error!(error = %format!("{e:#}"), "failed to start notification source");
            std::process::exit(1);
        }
    };

    info!(version = env!("CARGO_PKG_VERSION"), source = source.name(), "procmon started");

    // ── Run until signalled or the report loop dies ───────────────────────────
    tokio::select! {
        res = shutdown.recv() => match res {
            Ok(()) => info!("shutting down"),
            Err(e) => error!(error = %e, "failed to wait for shutdown signal; shutting down"),
        },
        () = monitor.finished() => warn!("report loop ended; shutting down"),
    }

    // Sources first: the channel only closes once their bridges are dropped.
    match tokio::task::spawn_blocking(move || source.stop()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %format!("{e:#}"), "notification source ended with an error"),
        Err(e) => warn!(error = %e, "failed to join notification source"),
    }

    if let Err(e) = monitor.shutdown().await {
        error!(error = %format!("{e:#}"), "report loop failed");
        std::process::exit(1);
    }
}
