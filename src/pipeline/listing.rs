//! Tracked package listing.

use crate::error::Result;
use crate::models::Config;
use crate::services::PackageIndex;
use crate::storage::{LIST_FILE, TrackerStorage};
use crate::utils::with_retry;

/// Fetch the index listing and store the tracked names.
///
/// Running out of retries is fatal.
pub async fn run_listing(
    config: &Config,
    storage: &dyn TrackerStorage,
    index: &dyn PackageIndex,
) -> Result<Vec<String>> {
    let listing = with_retry(&config.retry, "index listing", || index.fetch_listing()).await?;
    log::info!("Index lists {} projects", listing.len());

    let tracked: Vec<String> = listing
        .into_iter()
        .filter(|name| config.index.tracks(name))
        .collect();

    storage.write_names(LIST_FILE, &tracked).await?;
    log::info!("Saved {} tracked packages to {}", tracked.len(), LIST_FILE);

    Ok(tracked)
}
