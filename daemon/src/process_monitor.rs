use std::collections::HashMap;
use std::time::Duration;

use anyhow::{bail, Result};
use sysinfo::{ProcessesToUpdate, System};
use tracing::{debug, info};

use crate::bridge::NotificationBridge;
use crate::config::SourceConfig;
use crate::event::{EventKind, LifecycleEvent};
use crate::source::{NotificationSource, StopSignal};

/// One live process as seen by a poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub name: String,
    /// Seconds since the epoch; tells a reused PID apart from its predecessor.
    pub start_time: u64,
}

/// Process table snapshot: PID → process.
pub type Snapshot = HashMap<u32, ProcessEntry>;

/// Polls the OS process list every `poll_interval` and reports processes that
/// appeared or disappeared since the previous poll.
///
/// Every process is reported; nothing is filtered or paired up.
pub struct ProcessPoller {
    poll_interval: Duration,
    report_existing: bool,
}

impl ProcessPoller {
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            poll_interval: Duration::from_millis(config.effective_poll_interval_ms()),
            report_existing: config.report_existing,
        }
    }
}

impl NotificationSource for ProcessPoller {
    fn name(&self) -> &str {
        "process-poller"
    }

    fn run(self, bridge: NotificationBridge, stop: StopSignal) -> Result<()> {
        let mut sys = System::new();
        let mut previous = if self.report_existing {
            Snapshot::new()
        } else {
            take_snapshot(&mut sys)
        };
        info!(
            interval_ms = self.poll_interval.as_millis() as u64,
            baseline = previous.len(),
            "polling process table"
        );

        loop {
            let current = take_snapshot(&mut sys);
            let changes = diff(&previous, &current);
            if !changes.is_empty() {
                debug!(changes = changes.len(), "process table changed");
            }
            for event in changes {
                deliver(&bridge, event);
            }
            previous = current;

            if bridge.is_closed() {
                bail!("report loop stopped; no longer polling");
            }
            if stop.wait(self.poll_interval) {
                break;
            }
        }
        Ok(())
    }
}

fn deliver(bridge: &NotificationBridge, event: LifecycleEvent) {
    match event.kind {
        EventKind::Started => bridge.on_started(event.subject),
        EventKind::Ended => bridge.on_ended(event.subject),
    }
}

/// Refreshes `sys` and collects its processes. Threads (Linux tasks) are
/// listed by sysinfo alongside processes and are skipped.
fn take_snapshot(sys: &mut System) -> Snapshot {
    sys.refresh_processes(ProcessesToUpdate::All, true);
    sys.processes()
        .iter()
        .filter(|(_, p)| p.thread_kind().is_none())
        .map(|(pid, p)| {
            let entry = ProcessEntry {
                name: p.name().to_string_lossy().into_owned(),
                start_time: p.start_time(),
            };
            (pid.as_u32(), entry)
        })
        .collect()
}

/// Lifecycle changes between two snapshots.
///
/// Exits come before launches; each group is ordered by PID. A PID whose name
/// or start time changed between polls was reused, so it yields an exit and a
/// launch.
pub fn diff(previous: &Snapshot, current: &Snapshot) -> Vec<LifecycleEvent> {
    let mut ended: Vec<(u32, &str)> = previous
        .iter()
        .filter(|(pid, entry)| current.get(*pid) != Some(*entry))
        .map(|(pid, entry)| (*pid, entry.name.as_str()))
        .collect();
    let mut started: Vec<(u32, &str)> = current
        .iter()
        .filter(|(pid, entry)| previous.get(*pid) != Some(*entry))
        .map(|(pid, entry)| (*pid, entry.name.as_str()))
        .collect();
    ended.sort_unstable_by_key(|(pid, _)| *pid);
    started.sort_unstable_by_key(|(pid, _)| *pid);

    ended
        .into_iter()
        .map(|(_, name)| LifecycleEvent::ended(name))
        .chain(started.into_iter().map(|(_, name)| LifecycleEvent::started(name)))
        .collect()
}
