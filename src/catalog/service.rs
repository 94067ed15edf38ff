use super::error::{CatalogError, CatalogResult};
use super::verses::{split_verses, SongVerse};
use crate::enrichment::{SongDetail, SongInfoProvider};
use crate::song_store::{NewSong, Song, SongStore, StoreError};
use std::sync::Arc;
use tracing::{error, info, warn, Span};

/// Entry point for every song operation exposed over HTTP.
///
/// Holds no state besides its collaborators, so it is shared across
/// requests behind an `Arc`.
pub struct SongCatalog {
    store: Arc<dyn SongStore>,
    info_provider: Arc<dyn SongInfoProvider>,
    span: Span,
}

fn require_id(id: i64) -> CatalogResult<()> {
    if id < 1 {
        return Err(CatalogError::InvalidArgument(format!(
            "song id must be positive, got {}",
            id
        )));
    }
    Ok(())
}

/// Rejects blank values. Accepted values are used exactly as given.
fn require_non_empty(field: &str, value: &str) -> CatalogResult<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::InvalidArgument(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}

impl SongCatalog {
    pub fn new(
        store: Arc<dyn SongStore>,
        info_provider: Arc<dyn SongInfoProvider>,
        span: Span,
    ) -> Self {
        Self {
            store,
            info_provider,
            span,
        }
    }

    fn storage_error(&self, operation: &'static str, err: StoreError) -> CatalogError {
        let err = CatalogError::from_store(operation, err);
        if let CatalogError::Storage { .. } = &err {
            error!(parent: &self.span, "{}", err);
        }
        err
    }

    /// Returns page `page` (1-based) of at most `limit` songs.
    pub fn list_page(&self, page: i64, limit: i64) -> CatalogResult<Vec<Song>> {
        if page < 1 {
            return Err(CatalogError::InvalidArgument(format!(
                "page must be >= 1, got {}",
                page
            )));
        }
        if limit < 1 {
            return Err(CatalogError::InvalidArgument(format!(
                "limit must be >= 1, got {}",
                limit
            )));
        }

        let offset = (page - 1)
            .checked_mul(limit)
            .and_then(|o| usize::try_from(o).ok())
            .ok_or_else(|| {
                CatalogError::InvalidArgument(format!(
                    "page {} with limit {} is out of range",
                    page, limit
                ))
            })?;
        let limit = usize::try_from(limit).map_err(|_| {
            CatalogError::InvalidArgument(format!("limit {} is out of range", limit))
        })?;

        self.store
            .list_songs(offset, limit)
            .map_err(|e| self.storage_error("list songs", e))
    }

    /// Fetches details for (group, title) and stores the merged song.
    ///
    /// Nothing is written when the info service fails.
    pub async fn create(&self, group: &str, title: &str) -> CatalogResult<Song> {
        require_non_empty("group", group)?;
        require_non_empty("title", title)?;

        let detail = self.fetch_detail(group, title).await?;

        let new_song = NewSong {
            group: group.to_string(),
            title: title.to_string(),
            release_date: detail.release_date,
            text: detail.text,
            link: detail.link,
        };
        let id = self
            .store
            .insert_song(&new_song)
            .map_err(|e| self.storage_error("insert song", e))?;

        info!(parent: &self.span, "Added song {}: {} - {}", id, group, title);
        Ok(new_song.with_id(id))
    }

    /// Overwrites every mutable field of the song with `song.id`.
    pub fn update(&self, song: &Song) -> CatalogResult<()> {
        require_id(song.id)?;
        require_non_empty("group", &song.group)?;
        require_non_empty("title", &song.title)?;

        self.store
            .update_song(song)
            .map_err(|e| self.storage_error("update song", e))?;
        info!(parent: &self.span, "Updated song {}", song.id);
        Ok(())
    }

    pub fn delete(&self, id: i64) -> CatalogResult<()> {
        require_id(id)?;
        self.store
            .delete_song(id)
            .map_err(|e| self.storage_error("delete song", e))?;
        info!(parent: &self.span, "Deleted song {}", id);
        Ok(())
    }

    pub fn get_by_id(&self, id: i64) -> CatalogResult<Song> {
        require_id(id)?;
        self.store
            .get_song(id)
            .map_err(|e| self.storage_error("get song", e))?
            .ok_or_else(|| CatalogError::NotFound(format!("song {}", id)))
    }

    /// Returns verse number `page` (1-based) of the song's text.
    pub fn get_verse(&self, id: i64, page: i64) -> CatalogResult<SongVerse> {
        if page < 1 {
            return Err(CatalogError::InvalidArgument(format!(
                "page must be >= 1, got {}",
                page
            )));
        }
        let song = self.get_by_id(id)?;

        let verses = split_verses(&song.text);
        let verse = usize::try_from(page - 1)
            .ok()
            .and_then(|index| verses.get(index))
            .ok_or_else(|| {
                CatalogError::NotFound(format!(
                    "verse {} of song {} ({} verses)",
                    page,
                    id,
                    verses.len()
                ))
            })?
            .to_string();

        Ok(SongVerse {
            id: song.id,
            group: song.group,
            title: song.title,
            verse,
        })
    }

    /// Asks the info service about (group, title) without storing anything.
    pub async fn fetch_detail(&self, group: &str, title: &str) -> CatalogResult<SongDetail> {
        require_non_empty("group", group)?;
        require_non_empty("title", title)?;

        self.info_provider
            .fetch_song_detail(group, title)
            .await
            .map_err(|source| {
                warn!(
                    parent: &self.span,
                    "Info service failed for {} - {}: {}", group, title, source
                );
                CatalogError::Upstream {
                    group: group.to_string(),
                    title: title.to_string(),
                    source,
                }
            })
    }
}
