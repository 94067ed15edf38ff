mod models;
mod schema;
mod store;
mod trait_def;

pub use models::{NewSong, Song};
pub use schema::SONGS_VERSIONED_SCHEMAS;
pub use store::SqliteSongStore;
#[cfg(test)]
pub use trait_def::MockSongStore;
pub use trait_def::{SongStore, StoreError, StoreResult};
