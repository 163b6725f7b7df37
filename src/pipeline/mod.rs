//! Pipeline entry points for tracker operations.
//!
//! - `run_listing`: Fetch the index listing and keep the tracked names
//! - `run_version_check`: Flag tracked packages ahead of the snapshot
//! - `run_announce`: Diff snapshots, announce changes, update the ledger
//! - `run_entry_point_check`: Split snapshot entry points into well-formed
//!   and malformed error-code names

pub mod announce;
pub mod diff;
pub mod entry_points;
pub mod listing;
pub mod notify;
pub mod versions;

pub use announce::{AnnounceSummary, run_announce};
pub use diff::{DiffCalculator, DiffResult, calculate_diff, is_newer};
pub use entry_points::{Classification, EntryPoint, classify, run_entry_point_check};
pub use listing::run_listing;
pub use notify::{DispatchMode, DispatchReport, Notifier};
pub use versions::{SENTINEL_VERSION, run_version_check};
