//! Diff calculation between snapshot epochs.
//!
//! Computes which packages are new and which were updated between the
//! previous and current snapshot of each source. Versions are ordered by
//! PEP 440; a version string that does not parse never counts as an update.

use std::collections::BTreeSet;
use std::str::FromStr;

use pep508_rs::pep440_rs::Version;

use crate::models::{EpochPair, Epochs, Source};

/// Names classified by the diff, each in at most one set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// In current but not in previous
    pub new: BTreeSet<String>,
    /// In both, with a strictly greater current version
    pub updated: BTreeSet<String>,
}

impl DiffResult {
    /// Check if there are any changes.
    pub fn has_changes(&self) -> bool {
        !self.new.is_empty() || !self.updated.is_empty()
    }

    /// Get the total number of changes.
    pub fn change_count(&self) -> usize {
        self.new.len() + self.updated.len()
    }

    /// Union with another result. A name new anywhere is only reported as new.
    pub fn merge(mut self, other: DiffResult) -> Self {
        self.new.extend(other.new);
        self.updated.extend(other.updated);
        self.updated.retain(|name| !self.new.contains(name));
        self
    }
}

/// Whether `current` is a strictly greater PEP 440 version than `previous`.
pub fn is_newer(current: &str, previous: &str) -> bool {
    match (Version::from_str(current), Version::from_str(previous)) {
        (Ok(current), Ok(previous)) => current > previous,
        (Err(e), _) | (_, Err(e)) => {
            log::warn!(
                "Cannot compare versions '{}' and '{}': {}",
                current,
                previous,
                e
            );
            false
        }
    }
}

/// Calculator for computing diffs between snapshot epochs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffCalculator;

impl DiffCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Calculate the diff of one epoch pair.
    pub fn calculate(&self, pair: &EpochPair) -> DiffResult {
        let new = pair
            .current
            .keys()
            .filter(|name| !pair.previous.contains_key(*name))
            .cloned()
            .collect();

        let updated = pair
            .current
            .iter()
            .filter_map(|(name, current)| {
                let previous = pair.previous.get(name)?;
                is_newer(&current.version, &previous.version).then(|| name.clone())
            })
            .collect();

        DiffResult { new, updated }
    }

    /// Calculate the diff of every source and union the results.
    pub fn calculate_all(&self, epochs: &Epochs) -> DiffResult {
        Source::ALL
            .iter()
            .map(|source| {
                let result = self.calculate(epochs.get(*source));
                log::debug!(
                    "Diff {}: {} new, {} updated",
                    source,
                    result.new.len(),
                    result.updated.len()
                );
                result
            })
            .fold(DiffResult::default(), DiffResult::merge)
    }
}

/// Convenience function to calculate the diff across both sources.
pub fn calculate_diff(epochs: &Epochs) -> DiffResult {
    DiffCalculator::new().calculate_all(epochs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PackageRecord, Snapshot};

    fn snapshot(entries: &[(&str, &str)]) -> Snapshot {
        entries
            .iter()
            .map(|(name, version)| {
                (
                    name.to_string(),
                    PackageRecord {
                        version: version.to_string(),
                        summary: format!("{name} summary"),
                        entry_points: vec![],
                    },
                )
            })
            .collect()
    }

    fn pair(current: &[(&str, &str)], previous: &[(&str, &str)]) -> EpochPair {
        EpochPair::new(snapshot(current), snapshot(previous))
    }

    fn names(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_package() {
        let result = DiffCalculator::new().calculate(&pair(&[("alpha", "2.0")], &[]));
        assert_eq!(result.new, names(&["alpha"]));
        assert!(result.updated.is_empty());
    }

    #[test]
    fn test_updated_package() {
        let result =
            DiffCalculator::new().calculate(&pair(&[("alpha", "2.0")], &[("alpha", "1.0")]));
        assert!(result.new.is_empty());
        assert_eq!(result.updated, names(&["alpha"]));
    }

    #[test]
    fn test_no_changes() {
        let p = pair(&[("alpha", "1.0")], &[("alpha", "1.0")]);
        let result = DiffCalculator::new().calculate(&p);
        assert!(!result.has_changes());
        assert_eq!(result.change_count(), 0);
    }

    #[test]
    fn test_downgrade_is_not_update() {
        let result =
            DiffCalculator::new().calculate(&pair(&[("alpha", "1.0")], &[("alpha", "2.0")]));
        assert!(!result.has_changes());
    }

    #[test]
    fn test_removed_package_is_ignored() {
        let result =
            DiffCalculator::new().calculate(&pair(&[("alpha", "1.0")], &[("beta", "1.0")]));
        assert_eq!(result.new, names(&["alpha"]));
        assert!(!result.new.contains("beta"));
        assert!(!result.updated.contains("beta"));
    }

    #[test]
    fn test_pep440_ordering() {
        assert!(is_newer("1.10", "1.9"));
        assert!(is_newer("2.0", "2.0rc1"));
        assert!(is_newer("1.0.post1", "1.0"));
        assert!(!is_newer("1.0", "1.0.0"));
        assert!(!is_newer("1.0a1", "1.0"));
    }

    #[test]
    fn test_unparseable_version_is_not_update() {
        assert!(!is_newer("not-a-version", "1.0"));
        assert!(!is_newer("2.0", "???"));
    }

    #[test]
    fn test_union_across_sources() {
        let epochs = Epochs::new(
            pair(&[("a", "1.0"), ("b", "2.0")], &[("b", "1.0")]),
            pair(&[("c", "1.0"), ("d", "1.1")], &[("d", "1.0")]),
        );

        let result = calculate_diff(&epochs);
        assert_eq!(result.new, names(&["a", "c"]));
        assert_eq!(result.updated, names(&["b", "d"]));
    }

    #[test]
    fn test_new_wins_over_updated_across_sources() {
        let epochs = Epochs::new(
            pair(&[("a", "2.0")], &[]),
            pair(&[("a", "2.0")], &[("a", "1.0")]),
        );

        let result = calculate_diff(&epochs);
        assert_eq!(result.new, names(&["a"]));
        assert!(result.updated.is_empty());
        assert!(result.new.is_disjoint(&result.updated));
    }

    #[test]
    fn test_empty_epochs() {
        let result = calculate_diff(&Epochs::default());
        assert!(!result.has_changes());
    }

    #[test]
    fn test_idempotent() {
        let epochs = Epochs::new(
            pair(&[("a", "1.0"), ("b", "2.0")], &[("b", "1.0")]),
            pair(&[], &[]),
        );
        assert_eq!(calculate_diff(&epochs), calculate_diff(&epochs));
    }

    #[test]
    fn test_results_subset_of_current() {
        let epochs = Epochs::new(
            pair(&[("a", "1.0")], &[("gone", "1.0"), ("a", "0.9")]),
            pair(&[("b", "3")], &[("gone2", "1")]),
        );
        let result = calculate_diff(&epochs);
        for name in result.new.iter().chain(result.updated.iter()) {
            assert!(epochs.lookup(name).is_some());
        }
    }
}
