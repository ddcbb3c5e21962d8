use std::fmt;

/// Which lifecycle transition a process went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// The process (or application) was launched.
    Started,
    /// The process (or application) terminated.
    Ended,
}

/// A single lifecycle transition reported by a notification source.
///
/// Events carry no identity beyond their fields: two `Started` events for the
/// same subject are both valid and are both reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleEvent {
    pub kind: EventKind,
    /// Process or application name, passed through verbatim (may be empty).
    pub subject: String,
}

impl LifecycleEvent {
    pub fn started(subject: impl Into<String>) -> Self {
        Self { kind: EventKind::Started, subject: subject.into() }
    }

    pub fn ended(subject: impl Into<String>) -> Self {
        Self { kind: EventKind::Ended, subject: subject.into() }
    }
}

/// Formats the report line, e.g. `started: Mail` or `terminated: Mail`.
impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EventKind::Started => write!(f, "started: {}", self.subject),
            EventKind::Ended => write!(f, "terminated: {}", self.subject),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn started_formats_as_started_line() {
        assert_eq!(LifecycleEvent::started("Mail").to_string(), "started: Mail");
    }

    #[test]
    fn ended_formats_as_terminated_line() {
        assert_eq!(LifecycleEvent::ended("Mail").to_string(), "terminated: Mail");
    }

    #[test]
    fn empty_subject_is_kept_verbatim() {
        let ev = LifecycleEvent::started("");
        assert_eq!(ev.subject, "");
        assert_eq!(ev.to_string(), "started: ");
    }

    #[test]
    fn identical_events_compare_equal() {
        assert_eq!(LifecycleEvent::started("Safari"), LifecycleEvent::started("Safari"));
        assert_ne!(LifecycleEvent::started("Safari"), LifecycleEvent::ended("Safari"));
    }
}
