/// Termination signals the daemon shuts down on.
///
/// Unix: SIGINT, SIGTERM or SIGQUIT. Elsewhere: Ctrl+C only.
/// Handlers are installed up front by [`ShutdownSignal::install`] so a
/// failure is reported before any source starts.
use std::io;

#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};

pub struct ShutdownSignal {
    #[cfg(unix)]
    sigint: Signal,
    #[cfg(unix)]
    sigterm: Signal,
    #[cfg(unix)]
    sigquit: Signal,
}

impl ShutdownSignal {
    /// Registers the handlers. Must be called from within a tokio runtime.
    #[cfg(unix)]
    pub fn install() -> io::Result<Self> {
        Ok(Self {
            sigint: signal(SignalKind::interrupt())?,
            sigterm: signal(SignalKind::terminate())?,
            sigquit: signal(SignalKind::quit())?,
        })
    }

    #[cfg(not(unix))]
    pub fn install() -> io::Result<Self> {
        Ok(Self {})
    }

    /// Completes when one of the signals arrives.
    #[cfg(unix)]
    pub async fn recv(&mut self) -> io::Result<()> {
        tokio::select! {
            _ = self.sigint.recv()  => {},
            _ = self.sigterm.recv() => {},
            _ = self.sigquit.recv() => {},
        }
        Ok(())
    }

    #[cfg(not(unix))]
    pub async fn recv(&mut self) -> io::Result<()> {
        tokio::signal::ctrl_c().await
    }
}
