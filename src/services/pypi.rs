//! PyPI client for the simple listing and the JSON API.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;

use crate::error::Result;
use crate::models::Config;
use crate::services::PackageIndex;
use crate::utils::http;

/// Link pattern of one project on the simple index page.
static LISTING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"href="/simple/([^/]+)/">"#).expect("listing pattern is a valid regex")
});

/// PyPI index client
pub struct PypiClient {
    client: Client,
    base_url: String,
}

impl PypiClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build a client from the `[http]` and `[index]` config sections.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = http::create_async_client(&config.http)?;
        Ok(Self::new(client, config.index.base_url.clone()))
    }
}

/// JSON API response, only the parts we read.
#[derive(Debug, Deserialize)]
struct PypiResponse {
    info: PypiInfo,
}

#[derive(Debug, Deserialize)]
struct PypiInfo {
    version: String,
}

/// Extract project names from a simple index page, one link per line.
pub fn parse_listing(page: &str) -> Vec<String> {
    page.lines()
        .filter_map(|line| LISTING_PATTERN.captures(line))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

#[async_trait]
impl PackageIndex for PypiClient {
    async fn fetch_listing(&self) -> Result<Vec<String>> {
        let url = format!("{}/simple/", self.base_url);
        log::debug!("Fetching index listing: {}", url);

        let page = http::fetch_text(&self.client, &url).await?;
        let names = parse_listing(&page);

        log::debug!("Index listing has {} projects", names.len());
        Ok(names)
    }

    async fn fetch_version(&self, name: &str) -> Result<String> {
        let url = format!("{}/pypi/{}/json", self.base_url, name);
        log::debug!("Fetching PyPI package: {}", url);

        let response = http::ensure_success(self.client.get(&url).send().await?, name)?;
        let body: PypiResponse = response.json().await?;
        Ok(body.info.version)
    }
}
