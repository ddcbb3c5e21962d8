/// Lifetime context for the event bridge.
///
/// A `Monitor` owns the event channel and the report-loop task. It is built
/// once by the entry point and hands out [`NotificationBridge`] clones to the
/// sources it registers; nothing about the channel is reachable globally.
use std::io;

use anyhow::{anyhow, Context, Result};
use tokio::io::AsyncWrite;
use tokio::task::{JoinError, JoinHandle};
use tracing::info;

use crate::bridge::NotificationBridge;
use crate::channel;
use crate::report;

pub struct Monitor {
    bridge: NotificationBridge,
    report: JoinHandle<io::Result<u64>>,
    /// Set once the report task has been joined by [`Monitor::finished`].
    outcome: Option<Result<io::Result<u64>, JoinError>>,
}

impl Monitor {
    /// Creates the channel and spawns the report loop writing to `sink`.
    /// Must be called from within a tokio runtime.
    pub fn start<W>(capacity: usize, sink: W) -> Self
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = channel::channel(capacity);
        let report = tokio::spawn(report::run(rx, sink));
        info!(capacity = capacity.max(1), "report loop started");
        Self { bridge: NotificationBridge::new(tx), report, outcome: None }
    }

    /// A producer handle for registering a notification source.
    pub fn bridge(&self) -> NotificationBridge {
        self.bridge.clone()
    }

    /// Completes when the report loop ends while the monitor is still open.
    ///
    /// The monitor keeps a bridge of its own, so this only happens when the
    /// loop fails (e.g. its sink is closed). Cancel-safe: intended for
    /// `tokio::select!` next to a shutdown signal.
    pub async fn finished(&mut self) {
        if self.outcome.is_none() {
            self.outcome = Some((&mut self.report).await);
        }
    }

    /// Closes the channel and waits for the report loop to drain it.
    ///
    /// The channel only closes once every bridge handed out by
    /// [`bridge`](Self::bridge) has been dropped, so stop sources first.
    /// Returns the number of lines reported over the monitor's lifetime.
    pub async fn shutdown(self) -> Result<u64> {
        drop(self.bridge);
        let outcome = match self.outcome {
            Some(outcome) => outcome,
            None => self.report.await,
        };
        let emitted = outcome
            .map_err(|e| anyhow!("report loop panicked: {e}"))?
            .context("Failed to write report")?;
        info!(emitted, "report loop stopped");
        Ok(emitted)
    }
}
