use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, info_span, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use song_library_server::catalog::SongCatalog;
use song_library_server::config::{AppConfig, CliConfig, FileConfig};
use song_library_server::enrichment::InfoApiClient;
use song_library_server::server::{run_server, RequestsLoggingLevel, ServerConfig};
use song_library_server::song_store::SqliteSongStore;

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Directory holding the songs.db SQLite database.
    #[clap(long, value_parser = parse_path)]
    pub db_dir: Option<PathBuf>,

    /// Path to the SQLite database file. Takes precedence over --db-dir.
    #[clap(long, env = "DB_PATH", value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, env = "APP_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Base URL of the song information service queried when adding songs.
    #[clap(long, env = "API_BASE_URL")]
    pub info_api_url: Option<String>,

    /// Timeout in seconds for song information requests. No timeout when unset.
    #[clap(long)]
    pub info_api_timeout_sec: Option<u64>,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Serve a stub of the song information service at GET /info.
    #[clap(long)]
    pub serve_info_stub: bool,

    /// Path to a TOML config file. Values in it override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_dir: self.db_dir.clone(),
            db_path: self.db_path.clone(),
            port: self.port,
            logging_level: self.logging_level.clone(),
            info_api_url: self.info_api_url.clone(),
            info_api_timeout_sec: self.info_api_timeout_sec,
            serve_info_stub: self.serve_info_stub,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine, the environment may be set some other way.
    let dotenv_result = dotenvy::dotenv();

    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    if let Err(err) = dotenv_result {
        if !err.not_found() {
            warn!("Failed to load .env file: {}", err);
        }
    }

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!("Opening SQLite song database at {:?}...", config.db_path);
    let store = Arc::new(SqliteSongStore::new(
        &config.db_path,
        info_span!("song_store"),
    )?);

    info!("Song information service at {}", config.info_api_url);
    let info_client = Arc::new(InfoApiClient::new(
        config.info_api_url.clone(),
        config.info_api_timeout_sec,
        info_span!("info_api"),
    )?);

    let catalog = Arc::new(SongCatalog::new(
        store,
        info_client,
        info_span!("catalog"),
    ));

    let server_config = ServerConfig {
        requests_logging_level: config.logging_level,
        port: config.port,
        serve_info_stub: config.serve_info_stub,
    };
    if server_config.serve_info_stub {
        info!("Serving info service stub at /info");
    }

    info!("Ready to serve at port {}!", config.port);
    run_server(server_config, catalog, info_span!("http")).await
}
