/// Report loop: the single consumer of the event channel.
///
/// Dequeues one event at a time and writes its report line to `sink`,
/// flushing after every line so reports appear as soon as they are delivered.
/// The sink is async so a stalled downstream pipe suspends this task instead
/// of parking a runtime worker.
use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace};

use crate::channel::EventReceiver;

/// Runs until the channel is closed and drained, returning the number of
/// lines written. A write error ends the loop; the receiver is dropped with
/// it, which closes the channel for producers.
pub async fn run<W: AsyncWrite + Unpin>(mut rx: EventReceiver, mut sink: W) -> io::Result<u64> {
    let mut emitted = 0u64;

    while let Some(event) = rx.dequeue().await {
        trace!(kind = ?event.kind, subject = %event.subject, "dequeue");
        let line = format!("{event}\n");
        sink.write_all(line.as_bytes()).await?;
        sink.flush().await?;
        emitted += 1;
    }

    debug!(emitted, "event channel closed; report loop finished");
    Ok(emitted)
}
