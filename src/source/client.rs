// src/source/client.rs
use crate::source::{DocumentSource, FetchedDocument};
use crate::utils::error::SourceError;
use reqwest::header;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";
pub const DEFAULT_DELAY_MS: u64 = 5000;

// Status some profile hosts answer with when they throttle a client.
const THROTTLED_STATUS: u16 = 999;

/// Fetches profile pages over HTTP, sleeping `delay` before every request.
pub struct HttpSource {
    client: reqwest::Client,
    delay: Duration,
}

impl HttpSource {
    pub fn new(user_agent: &str, delay: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()?;
        tracing::debug!("Using User-Agent: {}", user_agent);
        Ok(Self { client, delay })
    }
}

impl DocumentSource for HttpSource {
    async fn fetch(&self, profile_url: &str) -> Result<FetchedDocument, SourceError> {
        tracing::info!("Downloading profile from: {}", profile_url);

        // --- Politeness delay ---
        tokio::time::sleep(self.delay).await;

        let response = self
            .client
            .get(profile_url)
            .header(header::ACCEPT, "text/html,application/xhtml+xml,*/*")
            .send()
            .await?; // Propagates reqwest::Error as SourceError::Network

        check_status(response.status(), profile_url)?;

        let final_url = response.url().to_string();
        let html = response.text().await?;
        tracing::debug!("Downloaded {} bytes from {} (served from {})", html.len(), profile_url, final_url);

        Ok(FetchedDocument { final_url, html })
    }
}

fn check_status(status: reqwest::StatusCode, url: &str) -> Result<(), SourceError> {
    if status.is_success() {
        return Ok(());
    }
    tracing::error!("HTTP error status: {} for URL: {}", status, url);
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(SourceError::NotFound(url.to_string()));
    }
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.as_u16() == THROTTLED_STATUS {
        tracing::warn!("Received {} - slow down or raise the delay.", status);
        return Err(SourceError::RateLimited);
    }
    Err(SourceError::Http(status))
}
