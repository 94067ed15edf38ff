use super::models::SongDetail;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("request to info service failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("info service responded with status {status}")]
    Status { status: u16 },

    #[error("malformed info service response: {0}")]
    Decode(String),
}

/// Source of release date, lyrics and link for a (group, title) pair.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SongInfoProvider: Send + Sync {
    async fn fetch_song_detail(
        &self,
        group: &str,
        title: &str,
    ) -> Result<SongDetail, EnrichmentError>;
}
