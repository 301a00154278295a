//! Wall-time tracking for subprocess invocations.
//!
//! One tracker lives in the [`GlobalContext`](crate::util::GlobalContext)
//! for the duration of a run and is flushed when the context is closed.

use std::sync::Mutex;
use std::time::Duration;

use crate::util::shell::format_duration;

/// A single timed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerfEntry {
    pub label: String,
    pub duration: Duration,
}

#[derive(Debug, Default)]
pub struct PerfTracker {
    entries: Mutex<Vec<PerfEntry>>,
}

impl PerfTracker {
    pub fn new() -> Self {
        PerfTracker::default()
    }

    /// Record one finished step.
    pub fn record(&self, label: impl Into<String>, duration: Duration) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(PerfEntry {
                label: label.into(),
                duration,
            });
        }
    }

    pub fn entries(&self) -> Vec<PerfEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Sum of all recorded steps.
    pub fn total(&self) -> Duration {
        self.entries().iter().map(|e| e.duration).sum()
    }

    /// Human-readable report, one line per step plus a total.
    pub fn report(&self) -> Vec<String> {
        let entries = self.entries();
        let mut lines: Vec<String> = entries
            .iter()
            .map(|e| format!("{:>10}  {}", format_duration(e.duration), e.label))
            .collect();
        if !entries.is_empty() {
            lines.push(format!("{:>10}  total", format_duration(self.total())));
        }
        lines
    }
}
