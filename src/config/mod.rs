mod file_config;

pub use file_config::FileConfig;

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const DB_FILE_NAME: &str = "songs.db";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub info_api_url: Option<String>,
    pub info_api_timeout_sec: Option<u64>,
    pub serve_info_stub: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub info_api_url: String,
    pub info_api_timeout_sec: Option<u64>,
    pub serve_info_stub: bool,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        // An explicit database file wins over a directory.
        let db_path = match file.db_path.map(PathBuf::from).or_else(|| cli.db_path.clone()) {
            Some(path) => path,
            None => {
                let db_dir = file
                    .db_dir
                    .map(PathBuf::from)
                    .or_else(|| cli.db_dir.clone())
                    .ok_or_else(|| {
                        anyhow::anyhow!(
                            "db_dir or db_path must be specified via CLI, environment or config file"
                        )
                    })?;
                if !db_dir.exists() {
                    bail!("Database directory does not exist: {:?}", db_dir);
                }
                if !db_dir.is_dir() {
                    bail!("db_dir is not a directory: {:?}", db_dir);
                }
                db_dir.join(DB_FILE_NAME)
            }
        };

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let info_api_timeout_sec = file.info_api_timeout_sec.or(cli.info_api_timeout_sec);
        let serve_info_stub = file.serve_info_stub.unwrap_or(cli.serve_info_stub);

        // Without an external service the built-in stub on our own port is used.
        let info_api_url = match file.info_api_url.or_else(|| cli.info_api_url.clone()) {
            Some(url) => url,
            None if serve_info_stub => format!("http://127.0.0.1:{}", port),
            None => bail!(
                "info_api_url must be specified via --info-api-url, API_BASE_URL or config file \
                 (or enable --serve-info-stub)"
            ),
        };

        Ok(Self {
            db_path,
            port,
            logging_level,
            info_api_url,
            info_api_timeout_sec,
            serve_info_stub,
        })
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
