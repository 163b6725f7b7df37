//! Package snapshot data structures.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Metadata for one package as captured in a snapshot.
///
/// The package name is the key of the enclosing [`Snapshot`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageRecord {
    /// Published version string
    pub version: String,

    /// One-line package summary
    #[serde(default)]
    pub summary: String,

    /// flake8 entry point names registered by the package
    #[serde(default, alias = "eps")]
    pub entry_points: Vec<String>,
}

/// Package name to record mapping, ordered by name.
pub type Snapshot = BTreeMap<String, PackageRecord>;

/// One of the two independently tracked snapshot feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Rep,
    Ext,
}

impl Source {
    /// All sources in lookup priority order.
    pub const ALL: [Source; 2] = [Source::Rep, Source::Ext];

    /// File stem of the snapshot artifact.
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Rep => "rep",
            Source::Ext => "ext",
        }
    }

    /// Artifact name of the current snapshot.
    pub fn current_file(&self) -> String {
        format!("eps_{}.json", self.as_str())
    }

    /// Artifact name of the previous snapshot.
    pub fn previous_file(&self) -> String {
        format!("eps_{}.json.old", self.as_str())
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current and previous snapshot of one source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpochPair {
    pub current: Snapshot,
    pub previous: Snapshot,
}

impl EpochPair {
    pub fn new(current: Snapshot, previous: Snapshot) -> Self {
        Self { current, previous }
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty() && self.previous.is_empty()
    }
}

/// Epoch pairs for both sources.
#[derive(Debug, Clone, Default)]
pub struct Epochs {
    pub rep: EpochPair,
    pub ext: EpochPair,
}

impl Epochs {
    pub fn new(rep: EpochPair, ext: EpochPair) -> Self {
        Self { rep, ext }
    }

    /// Epoch pair for a given source.
    pub fn get(&self, source: Source) -> &EpochPair {
        match source {
            Source::Rep => &self.rep,
            Source::Ext => &self.ext,
        }
    }

    /// Look up a package in the current snapshots, "rep" first.
    pub fn lookup(&self, name: &str) -> Option<&PackageRecord> {
        Source::ALL
            .iter()
            .find_map(|source| self.get(*source).current.get(name))
    }
}

/// Classification of a detected package.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    New,
    Updated,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::New => f.write_str("new"),
            Status::Updated => f.write_str("updated"),
        }
    }
}

/// A package resolved for announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub name: String,
    pub version: String,
    pub summary: String,
    pub status: Status,
}

impl Notification {
    pub fn new(name: &str, record: &PackageRecord, status: Status) -> Self {
        Self {
            name: name.to_string(),
            version: record.version.clone(),
            summary: record.summary.clone(),
            status,
        }
    }

    /// Render the announcement text.
    ///
    /// `project_url` is the prefix the package name is appended to.
    pub fn render(&self, project_url: &str) -> String {
        let title = match self.status {
            Status::New => "*** New Package ***",
            Status::Updated => "*** Updated Package ***",
        };
        format!(
            "{title}\n\n{pkg} v{version}\n\n{summary}\n\n{project_url}{pkg}\n",
            pkg = self.name,
            version = self.version,
            summary = self.summary,
        )
    }
}
