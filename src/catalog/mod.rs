//! Business rules for the song library: validation, pagination, enrichment
//! on create and verse extraction.

mod error;
mod filter;
mod service;
mod verses;

pub use error::{CatalogError, CatalogResult};
pub use filter::SongFilter;
pub use service::SongCatalog;
pub use verses::{split_verses, SongVerse, VERSE_SEPARATOR};
