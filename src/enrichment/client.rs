//! HTTP client for the song information service.

use super::models::SongDetail;
use super::trait_def::{EnrichmentError, SongInfoProvider};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, Span};

/// Fetches song details with `GET {base_url}/info?group=..&song=..`.
pub struct InfoApiClient {
    client: reqwest::Client,
    base_url: String,
    span: Span,
}

impl InfoApiClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the info service (e.g., "http://localhost:8081")
    /// * `timeout_sec` - Request timeout in seconds, `None` keeps reqwest's default (no timeout)
    /// * `span` - Span every request is logged under
    pub fn new(base_url: String, timeout_sec: Option<u64>, span: Span) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout_sec) = timeout_sec {
            builder = builder.timeout(Duration::from_secs(timeout_sec));
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            span,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn info_url(&self, group: &str, title: &str) -> String {
        format!(
            "{}/info?group={}&song={}",
            self.base_url,
            urlencoding::encode(group),
            urlencoding::encode(title)
        )
    }
}

#[async_trait]
impl SongInfoProvider for InfoApiClient {
    async fn fetch_song_detail(
        &self,
        group: &str,
        title: &str,
    ) -> Result<SongDetail, EnrichmentError> {
        let url = self.info_url(group, title);
        debug!(parent: &self.span, "Fetching song detail from {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let detail: SongDetail =
            serde_json::from_str(&body).map_err(|e| EnrichmentError::Decode(e.to_string()))?;

        debug!(
            parent: &self.span,
            "Got detail for {} - {} (released {})", group, title, detail.release_date
        );
        Ok(detail)
    }
}
