//! SQLite schema for the song library database.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema};

/// Songs table. AUTOINCREMENT keeps ids from being reused after a delete.
const SONGS_TABLE: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            is_autoincrement = true
        ),
        sqlite_column!("group_name", &SqlType::Text, non_null = true),
        sqlite_column!("song_name", &SqlType::Text, non_null = true),
        sqlite_column!("release_date", &SqlType::Text, non_null = true),
        sqlite_column!("text", &SqlType::Text, non_null = true),
        sqlite_column!("link", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_songs_group_name", "group_name")],
};

pub const SONGS_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[SONGS_TABLE],
    migration: None,
}];
