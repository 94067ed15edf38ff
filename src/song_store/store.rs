//! SQLite-backed song store implementation.

use super::models::{NewSong, Song};
use super::schema::SONGS_VERSIONED_SCHEMAS;
use super::trait_def::{SongStore, StoreError, StoreResult};
use crate::sqlite_persistence::migrate_if_needed;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, Span};

const SONG_COLUMNS: &str = "id, group_name, song_name, release_date, text, link";

/// SQLite-backed song store.
///
/// Writes go through a single read-write connection, reads through a
/// separate read-only one. Both run in WAL mode so readers never block on
/// the writer.
#[derive(Clone)]
pub struct SqliteSongStore {
    read_conn: Arc<Mutex<Connection>>,
    write_conn: Arc<Mutex<Connection>>,
    span: Span,
}

fn lock(conn: &Mutex<Connection>) -> StoreResult<MutexGuard<'_, Connection>> {
    conn.lock().map_err(|_| StoreError::LockPoisoned)
}

fn song_from_row(row: &Row) -> rusqlite::Result<Song> {
    Ok(Song {
        id: row.get(0)?,
        group: row.get(1)?,
        title: row.get(2)?,
        release_date: row.get(3)?,
        text: row.get(4)?,
        link: row.get(5)?,
    })
}

impl SqliteSongStore {
    /// Open (creating if needed) the song database at `db_path` and bring its
    /// schema up to date.
    pub fn new<P: AsRef<Path>>(db_path: P, span: Span) -> Result<Self> {
        let db_path_ref = db_path.as_ref();

        let mut write_conn = Connection::open_with_flags(
            db_path_ref,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open song database {:?}", db_path_ref))?;

        migrate_if_needed(&mut write_conn, SONGS_VERSIONED_SCHEMAS, "songs", &span)?;

        write_conn
            .pragma_update(None, "journal_mode", "WAL")
            .context("Failed to set WAL mode on songs write connection")?;

        let read_conn = Connection::open_with_flags(
            db_path_ref,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open song database for reading")?;

        read_conn
            .pragma_update(None, "journal_mode", "WAL")
            .context("Failed to set WAL mode on songs read connection")?;

        let song_count: usize =
            read_conn.query_row("SELECT COUNT(*) FROM songs", [], |r| r.get(0))?;
        info!(parent: &span, "Song store ready with {} songs", song_count);

        Ok(Self {
            read_conn: Arc::new(Mutex::new(read_conn)),
            write_conn: Arc::new(Mutex::new(write_conn)),
            span,
        })
    }

    pub fn count_songs(&self) -> StoreResult<usize> {
        let conn = lock(&self.read_conn)?;
        let count = conn.query_row("SELECT COUNT(*) FROM songs", [], |r| r.get(0))?;
        Ok(count)
    }
}

impl SongStore for SqliteSongStore {
    fn list_songs(&self, offset: usize, limit: usize) -> StoreResult<Vec<Song>> {
        let conn = lock(&self.read_conn)?;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM songs ORDER BY id LIMIT ?1 OFFSET ?2",
            SONG_COLUMNS
        ))?;
        let songs = stmt
            .query_map(params![limit as i64, offset as i64], song_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(
            parent: &self.span,
            "Listed {} songs (offset {}, limit {})",
            songs.len(),
            offset,
            limit
        );
        Ok(songs)
    }

    fn insert_song(&self, song: &NewSong) -> StoreResult<i64> {
        let conn = lock(&self.write_conn)?;
        conn.execute(
            "INSERT INTO songs (group_name, song_name, release_date, text, link)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                song.group,
                song.title,
                song.release_date,
                song.text,
                song.link
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(parent: &self.span, "Inserted song {} ({} - {})", id, song.group, song.title);
        Ok(id)
    }

    fn update_song(&self, song: &Song) -> StoreResult<()> {
        let conn = lock(&self.write_conn)?;
        let changed = conn.execute(
            "UPDATE songs
             SET group_name = ?1, song_name = ?2, release_date = ?3, text = ?4, link = ?5
             WHERE id = ?6",
            params![
                song.group,
                song.title,
                song.release_date,
                song.text,
                song.link,
                song.id
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound { id: song.id });
        }
        debug!(parent: &self.span, "Updated song {}", song.id);
        Ok(())
    }

    fn delete_song(&self, id: i64) -> StoreResult<()> {
        let conn = lock(&self.write_conn)?;
        let changed = conn.execute("DELETE FROM songs WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StoreError::NotFound { id });
        }
        debug!(parent: &self.span, "Deleted song {}", id);
        Ok(())
    }

    fn get_song(&self, id: i64) -> StoreResult<Option<Song>> {
        let conn = lock(&self.read_conn)?;
        let song = conn
            .query_row(
                &format!("SELECT {} FROM songs WHERE id = ?1", SONG_COLUMNS),
                params![id],
                song_from_row,
            )
            .optional()?;
        Ok(song)
    }
}
