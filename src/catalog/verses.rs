use serde::Serialize;

/// Verses in a song's text are separated by a blank line.
pub const VERSE_SEPARATOR: &str = "\n\n";

/// One verse of a song, addressed by 1-based page number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SongVerse {
    pub id: i64,
    pub group: String,
    pub title: String,
    pub verse: String,
}

/// Literal split on [`VERSE_SEPARATOR`]. No trimming; an empty text yields a
/// single empty verse.
pub fn split_verses(text: &str) -> Vec<&str> {
    text.split(VERSE_SEPARATOR).collect()
}
