//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Retry budget for index requests
    #[serde(default)]
    pub retry: RetryConfig,

    /// Package index endpoints and tracked names
    #[serde(default)]
    pub index: IndexConfig,

    /// Announcement settings
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// History ledger limits
    #[serde(default)]
    pub ledger: LedgerConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.retry.max_attempts == 0 {
            return Err(AppError::validation("retry.max_attempts must be > 0"));
        }
        if self.index.name_filter.trim().is_empty() {
            return Err(AppError::validation("index.name_filter is empty"));
        }
        if self.ledger.max_entries == 0 {
            return Err(AppError::validation("ledger.max_entries must be > 0"));
        }
        if self.ledger.max_age_days < 0 {
            return Err(AppError::validation("ledger.max_age_days must be >= 0"));
        }
        self.ledger.max_age()?;
        Url::parse(&self.index.base_url)?;
        Url::parse(&self.notifier.api_url)?;
        if !self.notifier.project_url.ends_with('/') {
            return Err(AppError::validation(
                "notifier.project_url must end with '/'",
            ));
        }
        Url::parse(&self.notifier.project_url)?;
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Bounded retry budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per call
    #[serde(default = "defaults::max_attempts")]
    pub max_attempts: u32,

    /// No new attempt starts once this window has elapsed
    #[serde(default = "defaults::window")]
    pub window_secs: u64,

    /// Pause between attempts in milliseconds
    #[serde(default = "defaults::retry_delay")]
    pub delay_ms: u64,
}

impl RetryConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::max_attempts(),
            window_secs: defaults::window(),
            delay_ms: defaults::retry_delay(),
        }
    }
}

/// Package index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Base URL of the package index
    #[serde(default = "defaults::index_url")]
    pub base_url: String,

    /// Listing names containing this substring are tracked
    #[serde(default = "defaults::name_filter")]
    pub name_filter: String,

    /// Names tracked even though they do not match the filter
    #[serde(default = "defaults::extra_packages")]
    pub extra_packages: Vec<String>,
}

impl IndexConfig {
    /// Whether a listing name should be tracked.
    pub fn tracks(&self, name: &str) -> bool {
        name.contains(&self.name_filter) || self.extra_packages.iter().any(|p| p == name)
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::index_url(),
            name_filter: defaults::name_filter(),
            extra_packages: defaults::extra_packages(),
        }
    }
}

/// Announcement settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Base URL of the posting API
    #[serde(default = "defaults::api_url")]
    pub api_url: String,

    /// Prefix the package name is appended to in announcements
    #[serde(default = "defaults::project_url")]
    pub project_url: String,

    /// Pause after each posted announcement
    #[serde(default = "defaults::post_delay")]
    pub post_delay_secs: u64,
}

impl NotifierConfig {
    pub fn post_delay(&self) -> Duration {
        Duration::from_secs(self.post_delay_secs)
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::api_url(),
            project_url: defaults::project_url(),
            post_delay_secs: defaults::post_delay(),
        }
    }
}

/// History ledger limits.
///
/// Entries are only pruned when both limits are exceeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "defaults::max_entries")]
    pub max_entries: usize,

    #[serde(default = "defaults::max_age_days")]
    pub max_age_days: i64,
}

impl LedgerConfig {
    /// Age past which an entry is stale; fails when the day count overflows.
    pub fn max_age(&self) -> Result<TimeDelta> {
        TimeDelta::try_days(self.max_age_days).ok_or_else(|| {
            AppError::config(format!(
                "ledger.max_age_days out of range: {}",
                self.max_age_days
            ))
        })
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_entries: defaults::max_entries(),
            max_age_days: defaults::max_age_days(),
        }
    }
}

mod defaults {
    // HTTP defaults
    pub fn user_agent() -> String {
        "flake8-tracker/0.1".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Retry defaults
    pub fn max_attempts() -> u32 {
        5
    }
    pub fn window() -> u64 {
        60
    }
    pub fn retry_delay() -> u64 {
        1000
    }

    // Index defaults
    pub fn index_url() -> String {
        "https://pypi.org".into()
    }
    pub fn name_filter() -> String {
        "flake8".into()
    }
    pub fn extra_packages() -> Vec<String> {
        vec![
            "pep8-naming".into(),
            "mccabe".into(),
            "pyflakes".into(),
            "pycodestyle".into(),
        ]
    }

    // Notifier defaults
    pub fn api_url() -> String {
        "https://api.twitter.com".into()
    }
    pub fn project_url() -> String {
        "https://pypi.org/project/".into()
    }
    pub fn post_delay() -> u64 {
        10
    }

    // Ledger defaults
    pub fn max_entries() -> usize {
        50
    }
    pub fn max_age_days() -> i64 {
        30
    }
}
