//! Shared constants for end-to-end tests
//!
//! When seeded songs or upstream responses change, update only this file.

// ============================================================================
// Seeded Songs
// ============================================================================

/// First seeded song, three verses
pub const SONG_1_GROUP: &str = "Muse";
pub const SONG_1_TITLE: &str = "Uprising";
pub const SONG_1_RELEASE_DATE: &str = "07.09.2009";
pub const SONG_1_TEXT: &str = "Verse one\nline two\n\nVerse two\n\nVerse three";

/// Second seeded song, single verse
pub const SONG_2_GROUP: &str = "Queen";
pub const SONG_2_TITLE: &str = "Bohemian Rhapsody";
pub const SONG_2_RELEASE_DATE: &str = "31.10.1975";
pub const SONG_2_TEXT: &str = "Is this the real life?";

/// Third seeded song, same group as the first
pub const SONG_3_GROUP: &str = "Muse";
pub const SONG_3_TITLE: &str = "Starlight";
pub const SONG_3_RELEASE_DATE: &str = "04.09.2006";
pub const SONG_3_TEXT: &str = "Far away\n\nThis ship is taking me";

/// Number of songs present in every fresh test server
pub const SEEDED_SONG_COUNT: usize = 3;

// ============================================================================
// Upstream Info Service
// ============================================================================

/// Release date returned by the stub upstream for every song
pub const UPSTREAM_RELEASE_DATE: &str = "16.07.2006";

/// Lyrics returned by the stub upstream for every song
pub const UPSTREAM_TEXT: &str = "Upstream verse one\n\nUpstream verse two";

/// Link returned by the stub upstream for every song
pub const UPSTREAM_LINK: &str = "https://example.com/upstream";

// ============================================================================
// Timeouts
// ============================================================================

pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

pub const REQUEST_TIMEOUT_SECS: u64 = 10;

pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
