// src/pipeline/announce.rs

//! Announcement pipeline: diff snapshots, notify, update the ledger.

use crate::error::Result;
use crate::models::{Config, RunClock};
use crate::services::Publisher;
use crate::storage::{HistoryLedger, TrackerStorage};

use super::diff::calculate_diff;
use super::notify::{DispatchMode, DispatchReport, Notifier, resolve};

/// Outcome of an announcement run.
#[derive(Debug, Clone, Default)]
pub struct AnnounceSummary {
    pub new_count: usize,
    pub updated_count: usize,
    pub dropped_count: usize,
    pub dispatch: DispatchReport,
    pub ledger_size: usize,
}

/// Run the announcement pipeline.
///
/// All artifacts are read before anything is posted. The ledger is saved
/// even when a post fails, so it always matches what was announced.
pub async fn run_announce(
    config: &Config,
    storage: &dyn TrackerStorage,
    publisher: &dyn Publisher,
    clock: &RunClock,
    mode: DispatchMode,
) -> Result<AnnounceSummary> {
    let epochs = storage.load_epochs().await?;
    let mut ledger = HistoryLedger::load(storage, config.ledger.clone()).await?;

    log::info!("Checking for stale ledger entries...");
    let dropped = ledger.prune(clock)?;

    let diff = calculate_diff(&epochs);
    log::info!(
        "Diff: {} new, {} updated",
        diff.new.len(),
        diff.updated.len()
    );
    if !diff.has_changes() {
        log::info!("No packages to announce.");
    }

    let notifications = resolve(&diff, &epochs)?;

    let notifier = Notifier::new(
        publisher,
        config.notifier.project_url.clone(),
        config.notifier.post_delay(),
        mode,
    );
    let dispatched = notifier.dispatch(&notifications, &mut ledger, clock).await;

    ledger.save(storage).await?;
    let dispatch = dispatched?;

    Ok(AnnounceSummary {
        new_count: diff.new.len(),
        updated_count: diff.updated.len(),
        dropped_count: dropped.len(),
        dispatch,
        ledger_size: ledger.len(),
    })
}
