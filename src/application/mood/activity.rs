//! Rolling window of message arrival times.

use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;

/// How long message timestamps are retained, in seconds.
pub const RETENTION_SECS: i64 = 5 * 60;
/// Window counted towards the activity score, in seconds.
pub const ACTIVITY_WINDOW_SECS: i64 = 60;

#[derive(Debug, Clone, Default)]
pub struct MessageWindow {
    timestamps: VecDeque<DateTime<Utc>>,
}

impl MessageWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message and drops everything older than the retention window.
    /// Timestamps are kept sorted even if events arrive out of order.
    pub fn record(&mut self, at: DateTime<Utc>, now: DateTime<Utc>) {
        let pos = self.timestamps.partition_point(|t| *t <= at);
        self.timestamps.insert(pos, at);
        self.prune(now);
    }

    pub fn prune(&mut self, now: DateTime<Utc>) {
        let cutoff = now - Duration::seconds(RETENTION_SECS);
        while self.timestamps.front().is_some_and(|t| *t < cutoff) {
            self.timestamps.pop_front();
        }
    }

    /// Messages strictly newer than one minute before `now`.
    pub fn count_recent(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - Duration::seconds(ACTIVITY_WINDOW_SECS);
        self.timestamps.iter().filter(|t| **t > cutoff).count()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &DateTime<Utc>> {
        self.timestamps.iter()
    }
}

/// `1 - 1/(1 + n)`: 0 for silence, approaching 1 as traffic grows.
pub fn activity_points(messages: usize) -> f64 {
    1.0 - 1.0 / (1.0 + messages as f64)
}
