/// Bounded, ordered handoff between notification producers and the single
/// report consumer.
///
/// The channel is a thin wrapper over [`tokio::sync::mpsc`]:
///   - producers live on threads the daemon does not own, so [`EventSender::enqueue`]
///     blocks the calling OS thread while the channel is full;
///   - the consumer is a tokio task and awaits [`EventReceiver::dequeue`].
///
/// Events are delivered in the order their `enqueue` calls completed. Two
/// producers blocked on a full channel race for the freed slot.
use thiserror::Error;
use tokio::sync::mpsc;

use crate::event::LifecycleEvent;

/// Capacity used when the configuration does not override it. With a single
/// slot a slow consumer pushes back directly on the delivering producer.
pub const DEFAULT_CAPACITY: usize = 1;

/// Returned by [`EventSender::enqueue`] when the receiving side is gone.
/// Carries the event that could not be delivered.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("event channel closed; dropped `{0}`")]
pub struct ChannelClosed(pub LifecycleEvent);

/// Producer half. Cheap to clone; every clone feeds the same queue.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::Sender<LifecycleEvent>,
}

/// Consumer half. There is exactly one per channel.
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::Receiver<LifecycleEvent>,
}

/// Creates a channel holding at most `capacity` undelivered events.
/// A capacity of zero is raised to one.
pub fn channel(capacity: usize) -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (EventSender { tx }, EventReceiver { rx })
}

impl EventSender {
    /// Hands `event` to the consumer, blocking the calling thread until a
    /// slot is free. Never drops or reorders while the consumer is alive.
    ///
    /// # Panics
    /// Panics if called from inside an asynchronous execution context;
    /// producers must run on their own OS threads.
    pub fn enqueue(&self, event: LifecycleEvent) -> Result<(), ChannelClosed> {
        self.tx.blocking_send(event).map_err(|e| ChannelClosed(e.0))
    }

    /// Returns `true` once the receiver has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl EventReceiver {
    /// Waits for the next event. Returns `None` once every sender has been
    /// dropped and the queue is drained.
    pub async fn dequeue(&mut self) -> Option<LifecycleEvent> {
        self.rx.recv().await
    }

    /// Blocking variant of [`dequeue`](Self::dequeue) for use outside the runtime.
    #[cfg(test)]
    pub fn blocking_dequeue(&mut self) -> Option<LifecycleEvent> {
        self.rx.blocking_recv()
    }
}
