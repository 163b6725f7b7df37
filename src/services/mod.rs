//! External services the pipelines talk to.
//!
//! The pipelines only see the [`PackageIndex`] and [`Publisher`] traits, so
//! they can run against in-memory fakes.

pub mod oauth;
pub mod pypi;
pub mod twitter;

use async_trait::async_trait;

use crate::error::Result;

pub use oauth::Credentials;
pub use pypi::PypiClient;
pub use twitter::TwitterPublisher;

/// Read access to a package index.
#[async_trait]
pub trait PackageIndex: Send + Sync {
    /// All project names on the index, in listing order.
    async fn fetch_listing(&self) -> Result<Vec<String>>;

    /// Latest published version of a project.
    async fn fetch_version(&self, name: &str) -> Result<String>;
}

/// Destination for announcements.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn post(&self, message: &str) -> Result<()>;
}
