//! Run clock captured once per invocation.

use chrono::{DateTime, Utc};

/// The instant a run started.
///
/// Every "now" in a run is derived from this value so that a whole run
/// shares one timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunClock(DateTime<Utc>);

impl RunClock {
    /// Capture the current instant.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Clock at the given epoch seconds; out-of-range values clamp to the epoch.
    pub fn from_timestamp(secs: i64) -> Self {
        Self(DateTime::from_timestamp(secs, 0).unwrap_or_default())
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    /// Epoch seconds.
    pub fn timestamp(&self) -> i64 {
        self.0.timestamp()
    }
}
