use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_scalar::{Scalar, Servable};

use super::{log_requests, make_info_stub_routes, state::*, ServerConfig};
use crate::catalog::{CatalogError, SongCatalog, SongFilter};
use crate::song_store::Song;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;

const TAG: &str = "Song";
const DOCS_PATH: &str = "/swagger";
const OPENAPI_PATH: &str = "/openapi.json";

#[derive(OpenApi)]
#[openapi(info(
    title = "Song Library",
    description = "Song catalog enriched from an external song information service"
))]
struct ApiDoc;

#[derive(Serialize, ToSchema)]
struct ServerStats {
    pub uptime: String,
    pub version: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
struct LibraryQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub group: Option<String>,
    pub song: Option<String>,
    pub release_date: Option<String>,
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
struct VerseQuery {
    pub page: Option<i64>,
}

#[derive(Deserialize, Debug, ToSchema)]
struct CreateSongBody {
    #[serde(default)]
    pub group: String,
    #[serde(default, alias = "song")]
    pub title: String,
}

#[derive(Deserialize, Debug, ToSchema)]
struct UpdateSongBody {
    #[serde(default)]
    pub group: String,
    #[serde(default, alias = "song")]
    pub title: String,
    #[serde(default, alias = "releaseDate")]
    pub release_date: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub link: String,
}

#[derive(Serialize, ToSchema)]
struct VersesResponse {
    pub id: i64,
    pub group: String,
    pub title: String,
    pub verses: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, body = ServerStats)),
)]
async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: state.version.clone(),
    };
    Json(stats)
}

#[utoipa::path(
    get,
    tag = TAG,
    path = "/library",
    params(LibraryQuery),
    responses(
        (status = 200, description = "One page of songs, filtered within the page", body = Vec<Song>),
        (status = 400, description = "Invalid page or limit"),
        (status = 500, description = "Storage failure"),
    ),
)]
async fn get_library(
    State(catalog): State<GuardedSongCatalog>,
    Query(query): Query<LibraryQuery>,
) -> Result<Json<Vec<Song>>, CatalogError> {
    let songs = catalog.list_page(
        query.page.unwrap_or(DEFAULT_PAGE),
        query.limit.unwrap_or(DEFAULT_LIMIT),
    )?;
    let filter = SongFilter {
        group: query.group,
        title: query.song,
        release_date: query.release_date,
    };
    Ok(Json(filter.apply(songs)))
}

#[utoipa::path(
    get,
    tag = TAG,
    path = "/song/{id}",
    params(("id" = i64, Path, description = "Song id")),
    responses(
        (status = 200, body = Song),
        (status = 400, description = "Non-positive id"),
        (status = 404, description = "No song with this id"),
    ),
)]
async fn get_song(
    State(catalog): State<GuardedSongCatalog>,
    Path(id): Path<i64>,
) -> Result<Json<Song>, CatalogError> {
    Ok(Json(catalog.get_by_id(id)?))
}

#[utoipa::path(
    get,
    tag = TAG,
    path = "/song/{id}/text",
    params(("id" = i64, Path, description = "Song id"), VerseQuery),
    responses(
        (status = 200, description = "The requested verse", body = VersesResponse),
        (status = 400, description = "Non-positive id or page"),
        (status = 404, description = "No song with this id, or page past the last verse"),
    ),
)]
async fn get_song_text(
    State(catalog): State<GuardedSongCatalog>,
    Path(id): Path<i64>,
    Query(query): Query<VerseQuery>,
) -> Result<Json<VersesResponse>, CatalogError> {
    let verse = catalog.get_verse(id, query.page.unwrap_or(DEFAULT_PAGE))?;
    Ok(Json(VersesResponse {
        id: verse.id,
        group: verse.group,
        title: verse.title,
        verses: vec![verse.verse],
    }))
}

#[utoipa::path(
    post,
    tag = TAG,
    path = "/song",
    request_body = CreateSongBody,
    responses(
        (status = 201, description = "Song enriched and stored", body = Song),
        (status = 400, description = "Empty group or title"),
        (status = 502, description = "Information service failure"),
    ),
)]
async fn post_song(
    State(catalog): State<GuardedSongCatalog>,
    Json(body): Json<CreateSongBody>,
) -> Result<Response, CatalogError> {
    let song = catalog.create(&body.group, &body.title).await?;
    Ok((StatusCode::CREATED, Json(song)).into_response())
}

#[utoipa::path(
    put,
    tag = TAG,
    path = "/song/{id}",
    params(("id" = i64, Path, description = "Song id")),
    request_body = UpdateSongBody,
    responses(
        (status = 200, body = Song),
        (status = 400, description = "Non-positive id, empty group or title"),
        (status = 404, description = "No song with this id"),
    ),
)]
async fn put_song(
    State(catalog): State<GuardedSongCatalog>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateSongBody>,
) -> Result<Json<Song>, CatalogError> {
    let song = Song {
        id,
        group: body.group,
        title: body.title,
        release_date: body.release_date,
        text: body.text,
        link: body.link,
    };
    catalog.update(&song)?;
    Ok(Json(song))
}

#[utoipa::path(
    delete,
    tag = TAG,
    path = "/song/{id}",
    params(("id" = i64, Path, description = "Song id")),
    responses(
        (status = 204, description = "Song deleted"),
        (status = 400, description = "Non-positive id"),
        (status = 404, description = "No song with this id"),
    ),
)]
async fn delete_song(
    State(catalog): State<GuardedSongCatalog>,
    Path(id): Path<i64>,
) -> Result<StatusCode, CatalogError> {
    catalog.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn make_app(config: ServerConfig, catalog: Arc<SongCatalog>, span: tracing::Span) -> Router {
    let state = ServerState::new(config.clone(), catalog, span);

    let mut api_router: OpenApiRouter = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(home))
        .routes(routes!(get_library))
        .routes(routes!(post_song))
        .routes(routes!(get_song, put_song, delete_song))
        .routes(routes!(get_song_text))
        .with_state(state.clone());

    if config.serve_info_stub {
        api_router = api_router.merge(make_info_stub_routes());
    }

    let (app, api_doc) = api_router.split_for_parts();

    app.merge(Scalar::with_url(DOCS_PATH, api_doc.clone()))
        .merge(Scalar::with_url(format!("{}/", DOCS_PATH), api_doc.clone()))
        .route(OPENAPI_PATH, get(move || async move { Json(api_doc) }))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
}

pub async fn run_server(
    config: ServerConfig,
    catalog: Arc<SongCatalog>,
    span: tracing::Span,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, catalog, span.clone());

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!(parent: &span, "Listening on port {}", port);

    Ok(axum::serve(listener, app).await?)
}
