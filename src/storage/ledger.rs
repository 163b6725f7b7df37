//! Bounded history ledger of past announcements.
//!
//! The ledger is an append-only sequence, oldest first. Entries are dropped
//! from the front only while the oldest entry is older than the configured
//! age *and* the ledger is larger than the configured size.

use crate::error::Result;
use crate::models::{LedgerConfig, LedgerEntry, RunClock};
use crate::storage::TrackerStorage;

/// In-memory view of the ledger for one run.
#[derive(Debug, Clone)]
pub struct HistoryLedger {
    entries: Vec<LedgerEntry>,
    limits: LedgerConfig,
}

impl HistoryLedger {
    pub fn new(entries: Vec<LedgerEntry>, limits: LedgerConfig) -> Self {
        Self { entries, limits }
    }

    /// Read the persisted ledger.
    pub async fn load(storage: &dyn TrackerStorage, limits: LedgerConfig) -> Result<Self> {
        let entries = storage.load_ledger().await?;
        log::debug!("Loaded ledger with {} entries", entries.len());
        Ok(Self::new(entries, limits))
    }

    /// Drop stale entries from the front and return them.
    ///
    /// Stops as soon as the oldest remaining entry is within the age limit
    /// or the ledger is no larger than the size limit.
    pub fn prune(&mut self, clock: &RunClock) -> Result<Vec<LedgerEntry>> {
        let max_age = self.limits.max_age()?;
        let max_entries = self.limits.max_entries;

        let drop_count = self
            .entries
            .iter()
            .enumerate()
            .take_while(|(i, entry)| {
                entry.is_stale(clock, max_age) && self.entries.len() - i > max_entries
            })
            .count();

        let dropped: Vec<LedgerEntry> = self.entries.drain(..drop_count).collect();
        for entry in &dropped {
            log::info!("{}", entry.dropped_message());
        }
        Ok(dropped)
    }

    pub fn append(&mut self, entry: LedgerEntry) {
        self.entries.push(entry);
    }

    /// Persist the full ledger, replacing what was stored.
    pub async fn save(&self, storage: &dyn TrackerStorage) -> Result<()> {
        storage.save_ledger(&self.entries).await?;
        log::info!("Ledger saved with {} entries", self.entries.len());
        Ok(())
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;
    use crate::storage::LocalStorage;
    use tempfile::TempDir;

    const DAY: i64 = 86_400;
    const NOW: i64 = 1_000 * DAY;

    fn entry(name: &str, age_days: i64) -> LedgerEntry {
        LedgerEntry {
            timestamp: NOW - age_days * DAY,
            name: name.to_string(),
            version: "1.0".into(),
            summary: String::new(),
            status: Status::New,
        }
    }

    fn limits(max_entries: usize, max_age_days: i64) -> LedgerConfig {
        LedgerConfig {
            max_entries,
            max_age_days,
        }
    }

    fn clock() -> RunClock {
        RunClock::from_timestamp(NOW)
    }

    #[test]
    fn test_prune_stops_at_max_size() {
        // 60 entries all older than 30 days
        let entries = (0..60).map(|i| entry(&format!("p{i}"), 100 - i)).collect();
        let mut ledger = HistoryLedger::new(entries, limits(50, 30));

        let dropped = ledger.prune(&clock()).unwrap();

        assert_eq!(dropped.len(), 10);
        assert_eq!(ledger.len(), 50);
        assert_eq!(dropped[0].name, "p0");
        assert_eq!(ledger.entries()[0].name, "p10");
    }

    #[test]
    fn test_prune_stops_at_fresh_entry() {
        // oldest 40 days, then 5 more stale entries, the rest fresh
        let mut entries = vec![entry("oldest", 40)];
        entries.extend((0..5).map(|i| entry(&format!("stale{i}"), 35)));
        entries.extend((0..54).map(|i| entry(&format!("fresh{i}"), 10)));
        let mut ledger = HistoryLedger::new(entries, limits(50, 30));

        let dropped = ledger.prune(&clock()).unwrap();

        assert_eq!(dropped.len(), 6);
        assert_eq!(ledger.len(), 54);
        assert_eq!(ledger.entries()[0].name, "fresh0");
    }

    #[test]
    fn test_prune_keeps_everything_when_small() {
        let entries = (0..10).map(|i| entry(&format!("p{i}"), 400)).collect();
        let mut ledger = HistoryLedger::new(entries, limits(50, 30));

        assert!(ledger.prune(&clock()).unwrap().is_empty());
        assert_eq!(ledger.len(), 10);
    }

    #[test]
    fn test_prune_keeps_everything_when_oldest_is_fresh() {
        let mut entries: Vec<_> = (0..70).map(|i| entry(&format!("p{i}"), 1)).collect();
        // an old entry behind a fresh one is never reached
        entries.push(entry("late", 90));
        let mut ledger = HistoryLedger::new(entries, limits(50, 30));

        assert!(ledger.prune(&clock()).unwrap().is_empty());
        assert_eq!(ledger.len(), 71);
    }

    #[test]
    fn test_prune_age_boundary_is_exclusive() {
        let mut entries = vec![entry("edge", 30)];
        entries.extend((0..5).map(|i| entry(&format!("p{i}"), 0)));
        let mut ledger = HistoryLedger::new(entries, limits(1, 30));

        assert!(ledger.prune(&clock()).unwrap().is_empty());
    }

    #[test]
    fn test_prune_rejects_unrepresentable_age() {
        let entries = (0..3).map(|i| entry(&format!("p{i}"), 400)).collect();
        let mut ledger = HistoryLedger::new(entries, limits(1, i64::MAX));

        assert!(matches!(
            ledger.prune(&clock()),
            Err(crate::error::AppError::Config(_))
        ));
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_prune_empty_ledger() {
        let mut ledger = HistoryLedger::new(vec![], limits(0, 0));
        assert!(ledger.prune(&clock()).unwrap().is_empty());
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn test_load_append_save() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        storage.save_ledger(&[entry("first", 2)]).await.unwrap();

        let mut ledger = HistoryLedger::load(&storage, limits(50, 30)).await.unwrap();
        ledger.append(entry("second", 0));
        ledger.save(&storage).await.unwrap();

        let names: Vec<_> = storage
            .load_ledger()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_load_missing_ledger_fails() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        assert!(HistoryLedger::load(&storage, limits(50, 30)).await.is_err());
    }
}
