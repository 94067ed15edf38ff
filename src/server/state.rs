use axum::extract::FromRef;

use crate::catalog::SongCatalog;
use std::sync::Arc;
use std::time::Instant;
use tracing::Span;

use super::ServerConfig;

pub type GuardedSongCatalog = Arc<SongCatalog>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub catalog: GuardedSongCatalog,
    pub version: String,
    pub span: Span,
}

impl ServerState {
    pub fn new(config: ServerConfig, catalog: GuardedSongCatalog, span: Span) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            catalog,
            version: env!("CARGO_PKG_VERSION").to_owned(),
            span,
        }
    }
}

impl FromRef<ServerState> for GuardedSongCatalog {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
