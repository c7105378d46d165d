//! Per-key log of admitted request timestamps.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// An ordered log of admission timestamps for a single key.
///
/// Entries are appended in chronological order, so expired entries always
/// form a prefix and pruning can stop at the first survivor.
#[derive(Debug, Default)]
pub struct RequestLog {
    entries: VecDeque<Instant>,
}

impl RequestLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry that has aged out of the window ending at `now`.
    ///
    /// An entry recorded exactly one window ago counts as expired.
    pub fn prune(&mut self, now: Instant, window: Duration) {
        while let Some(&oldest) = self.entries.front() {
            if now.duration_since(oldest) >= window {
                self.entries.pop_front();
            } else {
                break;
            }
        }
    }

    /// Record an admission at `now`.
    pub fn record(&mut self, now: Instant) {
        self.entries.push_back(now);
    }

    /// The oldest recorded timestamp, if any.
    pub fn oldest(&self) -> Option<Instant> {
        self.entries.front().copied()
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of the raw entries, oldest first.
    pub fn snapshot(&self) -> Vec<Instant> {
        self.entries.iter().copied().collect()
    }
}
