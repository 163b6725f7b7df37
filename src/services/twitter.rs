//! Twitter publisher posting announcements through the v2 tweets endpoint.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::services::Publisher;
use crate::services::oauth::{self, Credentials};
use crate::utils::http;

/// Posts each announcement as one tweet.
pub struct TwitterPublisher {
    client: Client,
    api_url: String,
    credentials: Credentials,
}

#[derive(Debug, Serialize)]
struct TweetRequest<'a> {
    text: &'a str,
}

impl TwitterPublisher {
    pub fn new(client: Client, api_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Build a publisher from the `[http]` and `[notifier]` config sections.
    pub fn from_config(config: &Config, credentials: Credentials) -> Result<Self> {
        let client = http::create_async_client(&config.http)?;
        Ok(Self::new(client, config.notifier.api_url.clone(), credentials))
    }

    fn endpoint(&self) -> String {
        format!("{}/2/tweets", self.api_url)
    }
}

#[async_trait]
impl Publisher for TwitterPublisher {
    async fn post(&self, message: &str) -> Result<()> {
        let url = self.endpoint();
        let now = Utc::now();
        let nonce = oauth::nonce(now.timestamp_nanos_opt().unwrap_or_default(), message);
        let header =
            oauth::authorization_header(&self.credentials, "POST", &url, &nonce, now.timestamp())?;

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, header)
            .json(&TweetRequest { text: message })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::publish(format!("status {status}: {body}")));
        }

        log::debug!("Posted announcement ({} chars)", message.chars().count());
        Ok(())
    }
}
