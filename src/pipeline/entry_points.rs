//! Entry-point classification: sort (package, entry point) pairs by whether
//! the entry point name looks like a flake8 error-code prefix.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;
use crate::models::{Epochs, Source};
use crate::storage::TrackerStorage;

/// One to three letters followed by up to three digits, any case.
static ERROR_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z]{1,3}\d{0,3}$").expect("error code pattern is a valid regex")
});

/// Codes owned by the checkers flake8 bundles, absent from any snapshot.
const CORE_ENTRY_POINTS: [(&str, &str); 3] =
    [("pyflakes", "F"), ("pycodestyle", "E"), ("pycodestyle", "W")];

/// The base package registers no error codes of its own.
const BASE_PACKAGE: &str = "flake8";

/// A package and one entry point name it registers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct EntryPoint {
    pub package: String,
    pub name: String,
}

impl EntryPoint {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }

    pub fn is_well_formed(&self) -> bool {
        ERROR_CODE.is_match(&self.name)
    }
}

/// Entry points split by name shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Sorted by entry point name, then package
    pub well_formed: Vec<EntryPoint>,
    /// Sorted by package, then entry point name
    pub malformed: Vec<EntryPoint>,
}

/// Every (package, entry point) pair of the current snapshots plus the
/// core checkers, without the base package.
///
/// A package present in both sources contributes its "rep" record only.
pub fn collect(epochs: &Epochs) -> BTreeSet<EntryPoint> {
    let names: BTreeSet<&String> = Source::ALL
        .iter()
        .flat_map(|source| epochs.get(*source).current.keys())
        .collect();

    let tracked = names.into_iter().filter_map(|name| {
        epochs
            .lookup(name)
            .map(|record| (name.as_str(), &record.entry_points))
    });

    tracked
        .flat_map(|(package, eps)| eps.iter().map(move |ep| EntryPoint::new(package, ep)))
        .chain(
            CORE_ENTRY_POINTS
                .iter()
                .map(|(package, ep)| EntryPoint::new(*package, *ep)),
        )
        .filter(|ep| ep.package != BASE_PACKAGE)
        .collect()
}

/// Split the collected entry points into well-formed and malformed names.
pub fn classify(epochs: &Epochs) -> Classification {
    let (mut well_formed, malformed): (Vec<_>, Vec<_>) = collect(epochs)
        .into_iter()
        .partition(EntryPoint::is_well_formed);

    well_formed.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.package.cmp(&b.package)));

    Classification {
        well_formed,
        malformed,
    }
}

/// Classify the entry points of the current snapshots and log the result.
pub async fn run_entry_point_check(storage: &dyn TrackerStorage) -> Result<Classification> {
    let epochs = storage.load_epochs().await?;
    let classification = classify(&epochs);

    for ep in &classification.well_formed {
        log::debug!("{:<8} {}", ep.name, ep.package);
    }
    for ep in &classification.malformed {
        log::warn!("Malformed entry point '{}' in {}", ep.name, ep.package);
    }
    log::info!(
        "{} well-formed entry points, {} malformed",
        classification.well_formed.len(),
        classification.malformed.len()
    );

    Ok(classification)
}
