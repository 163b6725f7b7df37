//! Announcement rendering and dispatch.

use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::{Epochs, LedgerEntry, Notification, RunClock, Status};
use crate::pipeline::DiffResult;
use crate::services::Publisher;
use crate::storage::HistoryLedger;

/// Whether announcements are actually posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Render and log only
    DryRun,
    /// Post through the publisher
    Post,
}

impl DispatchMode {
    pub fn from_post_flag(post: bool) -> Self {
        if post { Self::Post } else { Self::DryRun }
    }
}

/// Counts of a dispatch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub posted: usize,
    pub previewed: usize,
}

impl DispatchReport {
    pub fn total(&self) -> usize {
        self.posted + self.previewed
    }
}

/// Resolve every classified name to a notification, new ones first.
///
/// Records come from the current "rep" snapshot, then "ext".
pub fn resolve(diff: &DiffResult, epochs: &Epochs) -> Result<Vec<Notification>> {
    let new = diff.new.iter().map(|name| (name, Status::New));
    let updated = diff.updated.iter().map(|name| (name, Status::Updated));

    new.chain(updated)
        .map(|(name, status)| {
            epochs
                .lookup(name)
                .map(|record| Notification::new(name, record, status))
                .ok_or_else(|| AppError::Lookup(name.clone()))
        })
        .collect()
}

/// Sends announcements one by one and records them in the ledger.
pub struct Notifier<'a> {
    publisher: &'a dyn Publisher,
    project_url: String,
    delay: Duration,
    mode: DispatchMode,
}

impl<'a> Notifier<'a> {
    pub fn new(
        publisher: &'a dyn Publisher,
        project_url: impl Into<String>,
        delay: Duration,
        mode: DispatchMode,
    ) -> Self {
        Self {
            publisher,
            project_url: project_url.into(),
            delay,
            mode,
        }
    }

    /// Announce each notification in order.
    ///
    /// Every announced package gets a ledger entry, posted or not. The first
    /// failed post stops the run: packages before it keep their entries, the
    /// failed one and the rest get none.
    pub async fn dispatch(
        &self,
        notifications: &[Notification],
        ledger: &mut HistoryLedger,
        clock: &RunClock,
    ) -> Result<DispatchReport> {
        let mut report = DispatchReport::default();

        for notification in notifications {
            log::info!(
                "**** Announcing {} package: {} ****",
                notification.status,
                notification.name
            );
            let message = notification.render(&self.project_url);

            match self.mode {
                DispatchMode::Post => {
                    if let Err(e) = self.publisher.post(&message).await {
                        log::error!(
                            "Failed to post {} v{}: {}",
                            notification.name,
                            notification.version,
                            e
                        );
                        return Err(e);
                    }
                    report.posted += 1;
                    if !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                }
                DispatchMode::DryRun => {
                    log::info!(
                        "Would post {} v{}:\n{}",
                        notification.name,
                        notification.version,
                        message
                    );
                    report.previewed += 1;
                }
            }

            ledger.append(LedgerEntry::record(notification, clock));
        }

        Ok(report)
    }
}
