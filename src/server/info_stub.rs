//! Development stand-in for the external song information service.

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::enrichment::SongDetail;

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
struct InfoQuery {
    group: Option<String>,
    song: Option<String>,
}

pub(super) fn stub_song_detail() -> SongDetail {
    SongDetail {
        release_date: "16.07.2006".to_string(),
        text: "Placeholder lyrics, first verse\nsecond line of the first verse\n\n\
               Placeholder lyrics, second verse\nsecond line of the second verse"
            .to_string(),
        link: "https://www.youtube.com/watch?v=Xsp3_a-PMTw".to_string(),
    }
}

#[utoipa::path(
    get,
    tag = "Info",
    path = "/info",
    params(InfoQuery),
    responses(
        (status = 200, body = SongDetail),
        (status = 400, description = "Missing group or song"),
    ),
)]
async fn get_info(Query(query): Query<InfoQuery>) -> Response {
    let group = query.group.unwrap_or_default();
    let song = query.song.unwrap_or_default();
    if group.is_empty() || song.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            "Query parameters 'group' and 'song' are required",
        )
            .into_response();
    }
    Json(stub_song_detail()).into_response()
}

pub fn make_info_stub_routes() -> OpenApiRouter {
    OpenApiRouter::new().routes(routes!(get_info))
}
