/// Producer-side entry points invoked by a notification source.
///
/// A [`NotificationBridge`] is handed to every source at registration time.
/// Sources may clone it freely and call it from any number of OS threads at
/// once; the only shared state is the event channel.
use tracing::{error, trace};

use crate::channel::EventSender;
use crate::event::LifecycleEvent;

#[derive(Debug, Clone)]
pub struct NotificationBridge {
    tx: EventSender,
}

impl NotificationBridge {
    pub fn new(tx: EventSender) -> Self {
        Self { tx }
    }

    /// Reports that `subject` started. Blocks while the channel is full.
    pub fn on_started(&self, subject: impl Into<String>) {
        self.deliver(LifecycleEvent::started(subject));
    }

    /// Reports that `subject` terminated. Blocks while the channel is full.
    pub fn on_ended(&self, subject: impl Into<String>) {
        self.deliver(LifecycleEvent::ended(subject));
    }

    /// Returns `true` once the report loop has gone away. Events delivered
    /// after that point are logged and lost.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn deliver(&self, event: LifecycleEvent) {
        trace!(kind = ?event.kind, subject = %event.subject, "enqueue");
        // The report loop is gone: nothing will ever drain the channel again.
        if let Err(closed) = self.tx.enqueue(event) {
            error!(
                kind = ?closed.0.kind,
                subject = %closed.0.subject,
                "report loop is not running; lifecycle event lost"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel;
    use crate::event::EventKind;
    use std::thread;

    #[test]
    fn on_started_enqueues_started_event() {
        let (tx, mut rx) = channel::channel(1);
        let bridge = NotificationBridge::new(tx);
        bridge.on_started("Mail");
        assert_eq!(rx.blocking_dequeue(), Some(LifecycleEvent::started("Mail")));
    }

    #[test]
    fn on_ended_enqueues_ended_event() {
        let (tx, mut rx) = channel::channel(1);
        let bridge = NotificationBridge::new(tx);
        bridge.on_ended("Mail");
        assert_eq!(rx.blocking_dequeue(), Some(LifecycleEvent::ended("Mail")));
    }

    #[test]
    fn unmatched_ended_is_passed_through() {
        let (tx, mut rx) = channel::channel(2);
        let bridge = NotificationBridge::new(tx);
        bridge.on_ended("Never Started");
        bridge.on_ended("Never Started");
        drop(bridge);

        let kinds: Vec<EventKind> = std::iter::from_fn(|| rx.blocking_dequeue())
            .map(|ev| ev.kind)
            .collect();
        assert_eq!(kinds, vec![EventKind::Ended, EventKind::Ended]);
    }

    #[test]
    fn closed_channel_does_not_panic_producer() {
        let (tx, rx) = channel::channel(1);
        drop(rx);
        let bridge = NotificationBridge::new(tx);
        assert!(bridge.is_closed());
        bridge.on_started("orphan");
        bridge.on_ended("orphan");
    }

    #[test]
    fn concurrent_callers_lose_nothing() {
        let (tx, mut rx) = channel::channel(1);
        let bridge = NotificationBridge::new(tx);

        let producers: Vec<_> = (0..4)
            .map(|p| {
                let bridge = bridge.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        if i % 2 == 0 {
                            bridge.on_started(format!("p{p}-{i}"));
                        } else {
                            bridge.on_ended(format!("p{p}-{i}"));
                        }
                    }
                })
            })
            .collect();
        drop(bridge);

        let events: Vec<LifecycleEvent> = std::iter::from_fn(|| rx.blocking_dequeue()).collect();
        for p in producers {
            p.join().unwrap();
        }

        assert_eq!(events.len(), 100);
        let started = events.iter().filter(|e| e.kind == EventKind::Started).count();
        assert_eq!(started, 4 * 13);
        assert_eq!(events.len() - started, 4 * 12);
    }
}
