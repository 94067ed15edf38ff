//! Test fixture creation for the song database

use super::constants::*;
use anyhow::Result;
use song_library_server::song_store::{NewSong, SongStore, SqliteSongStore};
use std::path::PathBuf;
use tempfile::TempDir;
use tracing::Span;

fn seed_song(group: &str, title: &str, release_date: &str, text: &str) -> NewSong {
    NewSong {
        group: group.to_string(),
        title: title.to_string(),
        release_date: release_date.to_string(),
        text: text.to_string(),
        link: format!("https://example.com/{}", title.to_lowercase().replace(' ', "-")),
    }
}

/// Creates a temporary song database holding the three seeded songs.
/// Returns (temp_dir, db_path, seeded ids in insertion order)
pub fn create_test_db_with_songs() -> Result<(TempDir, PathBuf, Vec<i64>)> {
    let dir = TempDir::new()?;
    let db_path = dir.path().join("songs.db");

    let store = SqliteSongStore::new(&db_path, Span::none())?;
    let ids = [
        seed_song(SONG_1_GROUP, SONG_1_TITLE, SONG_1_RELEASE_DATE, SONG_1_TEXT),
        seed_song(SONG_2_GROUP, SONG_2_TITLE, SONG_2_RELEASE_DATE, SONG_2_TEXT),
        seed_song(SONG_3_GROUP, SONG_3_TITLE, SONG_3_RELEASE_DATE, SONG_3_TEXT),
    ]
    .iter()
    .map(|song| store.insert_song(song))
    .collect::<Result<Vec<_>, _>>()?;

    Ok((dir, db_path, ids))
}
