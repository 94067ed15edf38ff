//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own database and upstream stub.

use super::constants::*;
use super::fixtures::create_test_db_with_songs;
use super::upstream::{StubUpstream, UpstreamBehavior};
use song_library_server::catalog::SongCatalog;
use song_library_server::enrichment::InfoApiClient;
use song_library_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use song_library_server::song_store::SqliteSongStore;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tracing::Span;

/// Test server instance with an isolated database
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// Store for direct database access in tests
    pub store: Arc<SqliteSongStore>,

    /// Ids of the seeded songs, in SONG_1, SONG_2, SONG_3 order
    pub seeded_ids: Vec<i64>,

    /// The info service stub the server enriches new songs from
    pub upstream: StubUpstream,

    // Private fields - keep resources alive until drop
    _temp_db_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server whose upstream answers every request successfully
    pub async fn spawn() -> Self {
        Self::spawn_with_upstream(UpstreamBehavior::Succeed).await
    }

    /// Spawns a new test server on a random port
    ///
    /// This function:
    /// 1. Starts a stub info service with the given behavior
    /// 2. Creates a temporary database with the seeded songs
    /// 3. Binds to a random port (127.0.0.1:0)
    /// 4. Spawns the server in a background task
    /// 5. Waits for the server to be ready
    ///
    /// # Panics
    ///
    /// Panics if any of these steps fails or the server doesn't become
    /// ready within timeout.
    pub async fn spawn_with_upstream(behavior: UpstreamBehavior) -> Self {
        let upstream = StubUpstream::spawn(behavior).await;

        let (temp_db_dir, db_path, seeded_ids) =
            create_test_db_with_songs().expect("Failed to create test database");

        let store = Arc::new(
            SqliteSongStore::new(&db_path, Span::none()).expect("Failed to open song store"),
        );
        let info_client = Arc::new(
            InfoApiClient::new(
                upstream.base_url.clone(),
                Some(REQUEST_TIMEOUT_SECS),
                Span::none(),
            )
            .expect("Failed to create info client"),
        );
        let catalog = Arc::new(SongCatalog::new(
            store.clone(),
            info_client,
            Span::none(),
        ));

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            serve_info_stub: false,
        };
        let app = make_app(config, catalog, Span::none());

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            store,
            seeded_ids,
            upstream,
            _temp_db_dir: temp_db_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the / endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
        // TempDir is cleaned up automatically
    }
}
