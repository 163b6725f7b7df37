//! Storage abstractions for tracker artifacts.
//!
//! ## Directory Structure
//!
//! ```text
//! data/
//! ├── config.toml           # Tracker configuration
//! ├── f8.list               # Tracked package names
//! ├── f8.outdated           # Names whose snapshot is behind the index
//! ├── eps_rep.json          # Current "rep" snapshot
//! ├── eps_rep.json.old      # Previous "rep" snapshot
//! ├── eps_ext.json          # Current "ext" snapshot
//! ├── eps_ext.json.old      # Previous "ext" snapshot
//! └── rss.json              # History ledger
//! ```

pub mod ledger;
pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{EpochPair, Epochs, LedgerEntry, Snapshot, Source};

// Re-export for convenience
pub use ledger::HistoryLedger;
pub use local::LocalStorage;

/// Artifact holding the history ledger.
pub const LEDGER_FILE: &str = "rss.json";
/// Artifact holding the tracked package names.
pub const LIST_FILE: &str = "f8.list";
/// Artifact holding names whose snapshot is behind the index.
pub const OUTDATED_FILE: &str = "f8.outdated";

/// Trait for tracker storage backends.
///
/// Every read of a required artifact fails if the artifact is missing or
/// malformed.
#[async_trait]
pub trait TrackerStorage: Send + Sync {
    /// Load one snapshot artifact of a source.
    async fn load_snapshot(&self, source: Source, previous: bool) -> Result<Snapshot>;

    /// Load the persisted ledger entries, oldest first.
    async fn load_ledger(&self) -> Result<Vec<LedgerEntry>>;

    /// Overwrite the persisted ledger.
    async fn save_ledger(&self, entries: &[LedgerEntry]) -> Result<()>;

    /// Read a newline separated name list.
    async fn read_names(&self, key: &str) -> Result<Vec<String>>;

    /// Overwrite a newline separated name list.
    async fn write_names(&self, key: &str, names: &[String]) -> Result<()>;

    /// Load the epoch pair of one source.
    async fn load_epoch_pair(&self, source: Source) -> Result<EpochPair> {
        let current = self.load_snapshot(source, false).await?;
        let previous = self.load_snapshot(source, true).await?;
        log::debug!(
            "Loaded {} snapshot: {} current, {} previous",
            source,
            current.len(),
            previous.len()
        );
        Ok(EpochPair::new(current, previous))
    }

    /// Load both epoch pairs.
    async fn load_epochs(&self) -> Result<Epochs> {
        let rep = self.load_epoch_pair(Source::Rep).await?;
        let ext = self.load_epoch_pair(Source::Ext).await?;
        Ok(Epochs::new(rep, ext))
    }
}
