//! Client for the external song information service.

mod client;
mod models;
mod trait_def;

pub use client::InfoApiClient;
pub use models::SongDetail;
#[cfg(test)]
pub use trait_def::MockSongInfoProvider;
pub use trait_def::{EnrichmentError, SongInfoProvider};
