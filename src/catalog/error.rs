use crate::enrichment::EnrichmentError;
use crate::song_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("failed to fetch details for {group} - {title}: {source}")]
    Upstream {
        group: String,
        title: String,
        #[source]
        source: EnrichmentError,
    },

    #[error("{operation} failed: {source}")]
    Storage {
        operation: &'static str,
        #[source]
        source: StoreError,
    },
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    /// Wraps a store error, turning [`StoreError::NotFound`] into
    /// [`CatalogError::NotFound`].
    pub(super) fn from_store(operation: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id } => CatalogError::NotFound(format!("song {}", id)),
            source => CatalogError::Storage { operation, source },
        }
    }
}
