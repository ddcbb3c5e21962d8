/// Notification sources: the upstream side that detects process start/stop
/// and calls into the [`NotificationBridge`].
///
/// A source is an injected capability. Given the bridge, it begins delivering
/// events on a dedicated OS thread and keeps going until its [`StopSignal`]
/// fires. The daemon never assumes anything about which thread a callback
/// arrives on, so a source is free to fan out to more threads internally.
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, warn};

use crate::bridge::NotificationBridge;

pub trait NotificationSource: Send + 'static {
    /// Short name, used for the thread name and in logs.
    fn name(&self) -> &str;

    /// Delivers events through `bridge` until `stop` fires.
    fn run(self, bridge: NotificationBridge, stop: StopSignal) -> Result<()>;
}

/// Receiving end of a source's stop request.
pub struct StopSignal {
    rx: mpsc::Receiver<()>,
}

impl StopSignal {
    /// Waits up to `timeout` for a stop request. Returns `true` if the source
    /// should stop, including when its [`SourceHandle`] was dropped.
    pub fn wait(&self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => true,
            Err(mpsc::RecvTimeoutError::Timeout) => false,
        }
    }
}

/// A running source. Stopping it joins its thread.
pub struct SourceHandle {
    name: String,
    stop_tx: mpsc::Sender<()>,
    thread: JoinHandle<Result<()>>,
}

/// Starts `source` on its own named OS thread.
pub fn spawn<S: NotificationSource>(source: S, bridge: NotificationBridge) -> Result<SourceHandle> {
    let name = source.name().to_string();
    let (stop_tx, stop_rx) = mpsc::channel();

    let thread = thread::Builder::new()
        .name(name.clone())
        .spawn(move || source.run(bridge, StopSignal { rx: stop_rx }))
        .with_context(|| format!("Failed to spawn source thread `{name}`"))?;

    debug!(source = %name, "notification source started");
    Ok(SourceHandle { name, stop_tx, thread })
}

impl SourceHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Signals the source to stop and blocks until its thread exits.
    ///
    /// A source blocked on a full channel only notices the request after the
    /// report loop frees a slot, so call this before shutting the monitor down.
    pub fn stop(self) -> Result<()> {
        // The source may already have finished on its own.
        let _ = self.stop_tx.send(());
        let outcome = self
            .thread
            .join()
            .map_err(|_| anyhow!("source `{}` panicked", self.name))?;
        if let Err(e) = &outcome {
            warn!(source = %self.name, error = %e, "notification source failed");
        }
        debug!(source = %self.name, "notification source stopped");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel;
    use crate::event::LifecycleEvent;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Calls the bridge once per tick until stopped, counting its ticks.
    struct Ticker {
        ticks: Arc<AtomicUsize>,
    }

    impl NotificationSource for Ticker {
        fn name(&self) -> &str {
            "ticker"
        }

        fn run(self, bridge: NotificationBridge, stop: StopSignal) -> Result<()> {
            while !stop.wait(Duration::from_millis(5)) {
                let n = self.ticks.fetch_add(1, Ordering::SeqCst);
                bridge.on_started(format!("tick{n}"));
            }
            Ok(())
        }
    }

    struct Failing;

    impl NotificationSource for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn run(self, _: NotificationBridge, _: StopSignal) -> Result<()> {
            Err(anyhow!("subsystem unavailable"))
        }
    }

    #[test]
    fn stop_joins_running_source() {
        let (tx, mut rx) = channel::channel(64);
        let ticks = Arc::new(AtomicUsize::new(0));
        let handle = spawn(Ticker { ticks: Arc::clone(&ticks) }, NotificationBridge::new(tx)).unwrap();
        assert_eq!(handle.name(), "ticker");

        assert_eq!(rx.blocking_dequeue(), Some(LifecycleEvent::started("tick0")));
        handle.stop().unwrap();

        // Every tick was delivered, and nothing arrives after stop.
        let rest: Vec<_> = std::iter::from_fn(|| rx.blocking_dequeue()).collect();
        assert_eq!(rest.len() + 1, ticks.load(Ordering::SeqCst));
    }

    #[test]
    fn source_error_is_returned_from_stop() {
        let (tx, _rx) = channel::channel(1);
        let handle = spawn(Failing, NotificationBridge::new(tx)).unwrap();
        let err = handle.stop().unwrap_err();
        assert!(err.to_string().contains("subsystem unavailable"));
    }

    #[test]
    fn dropped_handle_counts_as_stop() {
        let (stop_tx, rx) = mpsc::channel::<()>();
        let signal = StopSignal { rx };
        assert!(!signal.wait(Duration::ZERO));
        drop(stop_tx);
        assert!(signal.wait(Duration::ZERO));
    }
}
