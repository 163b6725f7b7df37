//! Version check of tracked packages against the index.
//!
//! Flags packages whose published version is ahead of the current snapshot
//! so their metadata can be refreshed.

use crate::error::Result;
use crate::models::{Config, Snapshot, Source};
use crate::services::PackageIndex;
use crate::storage::{LIST_FILE, OUTDATED_FILE, TrackerStorage};
use crate::utils::with_retry;

use super::diff::is_newer;

/// Version substituted when a lookup runs out of retries.
pub const SENTINEL_VERSION: &str = "0.0";

/// Published version of a package, or [`SENTINEL_VERSION`] on failure.
pub async fn fetch_version_or_sentinel(
    config: &Config,
    index: &dyn PackageIndex,
    name: &str,
) -> String {
    let operation = format!("version lookup for {name}");
    match with_retry(&config.retry, &operation, || index.fetch_version(name)).await {
        Ok(version) => version,
        Err(e) => {
            log::warn!("{}; using {}", e, SENTINEL_VERSION);
            SENTINEL_VERSION.to_string()
        }
    }
}

/// Whether a published version means the snapshot needs a refresh.
fn is_outdated(published: &str, snapshots: &[Snapshot], name: &str) -> bool {
    if published == SENTINEL_VERSION {
        return false;
    }
    match snapshots.iter().find_map(|s| s.get(name)) {
        Some(record) => is_newer(published, &record.version),
        None => true,
    }
}

/// Check every tracked package and store the outdated names.
pub async fn run_version_check(
    config: &Config,
    storage: &dyn TrackerStorage,
    index: &dyn PackageIndex,
) -> Result<Vec<String>> {
    let names = storage.read_names(LIST_FILE).await?;
    let mut snapshots = Vec::with_capacity(Source::ALL.len());
    for source in Source::ALL {
        snapshots.push(storage.load_snapshot(source, false).await?);
    }
    log::info!("Checking versions of {} tracked packages", names.len());

    let mut outdated = Vec::new();
    for name in &names {
        let published = fetch_version_or_sentinel(config, index, name).await;
        if is_outdated(&published, &snapshots, name) {
            log::info!("{} v{} is ahead of the snapshot", name, published);
            outdated.push(name.clone());
        } else {
            log::debug!("{} is up to date ({})", name, published);
        }
    }

    storage.write_names(OUTDATED_FILE, &outdated).await?;
    log::info!(
        "Saved {} outdated packages to {}",
        outdated.len(),
        OUTDATED_FILE
    );

    Ok(outdated)
}
