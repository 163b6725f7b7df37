// src/models/mod.rs

//! Domain models for the tracker application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod clock;
mod config;
mod ledger;
mod package;

// Re-export all public types
pub use clock::RunClock;
pub use config::{Config, HttpConfig, IndexConfig, LedgerConfig, NotifierConfig, RetryConfig};
pub use ledger::LedgerEntry;
pub use package::{EpochPair, Epochs, Notification, PackageRecord, Snapshot, Source, Status};
