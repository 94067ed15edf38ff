use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A song row as stored in the `songs` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Song {
    pub id: i64,
    pub group: String,
    #[serde(alias = "song")]
    pub title: String,
    #[serde(alias = "releaseDate")]
    pub release_date: String,
    pub text: String,
    pub link: String,
}

/// A fully populated song that has not been assigned an id yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewSong {
    pub group: String,
    pub title: String,
    pub release_date: String,
    pub text: String,
    pub link: String,
}

impl NewSong {
    pub fn with_id(self, id: i64) -> Song {
        Song {
            id,
            group: self.group,
            title: self.title,
            release_date: self.release_date,
            text: self.text,
            link: self.link,
        }
    }
}
