use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Song details as returned by the information service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SongDetail {
    #[serde(rename = "releaseDate")]
    pub release_date: String,
    pub text: String,
    pub link: String,
}
