//! History ledger entry.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::{Notification, RunClock, Status};

/// A persisted record of one past announcement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Epoch seconds of the run that produced the entry
    pub timestamp: i64,

    /// Package name
    #[serde(rename = "pkg")]
    pub name: String,

    pub version: String,

    #[serde(default)]
    pub summary: String,

    pub status: Status,
}

impl LedgerEntry {
    /// Build an entry for a notification stamped with the run clock.
    pub fn record(notification: &Notification, clock: &RunClock) -> Self {
        Self {
            timestamp: clock.timestamp(),
            name: notification.name.clone(),
            version: notification.version.clone(),
            summary: notification.summary.clone(),
            status: notification.status,
        }
    }

    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// Whether the entry is strictly older than `max_age` at `clock`.
    pub fn is_stale(&self, clock: &RunClock, max_age: TimeDelta) -> bool {
        clock.timestamp() - self.timestamp > max_age.num_seconds()
    }

    /// Human readable line used when the entry is pruned.
    pub fn dropped_message(&self) -> String {
        let date = self
            .recorded_at()
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| self.timestamp.to_string());
        format!(
            "Dropped {} v{}, {} on {}.",
            self.name, self.version, self.status, date
        )
    }
}
