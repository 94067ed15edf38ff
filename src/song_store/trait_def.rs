//! SongStore trait definition.

use super::models::{NewSong, Song};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("song {id} not found")]
    NotFound { id: i64 },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("database connection lock poisoned")]
    LockPoisoned,
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Storage backend for songs.
///
/// Every method is a single auto-committing statement. Writes addressed by
/// id report a missing row as [`StoreError::NotFound`].
#[cfg_attr(test, mockall::automock)]
pub trait SongStore: Send + Sync {
    /// Up to `limit` songs starting at `offset`, in storage order.
    fn list_songs(&self, offset: usize, limit: usize) -> StoreResult<Vec<Song>>;

    /// Insert a song and return the id assigned to it.
    fn insert_song(&self, song: &NewSong) -> StoreResult<i64>;

    /// Overwrite every mutable column of the row with `song.id`.
    fn update_song(&self, song: &Song) -> StoreResult<()>;

    fn delete_song(&self, id: i64) -> StoreResult<()>;

    fn get_song(&self, id: i64) -> StoreResult<Option<Song>>;
}
