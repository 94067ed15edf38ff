//! Stub of the external song information service
//!
//! Runs on its own random port so the server under test talks to it over
//! real HTTP through its production client.

use super::constants::*;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

/// How the stub answers `GET /info`
#[derive(Clone, Copy, Debug)]
pub enum UpstreamBehavior {
    /// 200 with the constant UPSTREAM_* detail
    Succeed,
    /// Respond with the given status and an empty body
    FailWith(u16),
    /// 200 with a body that is not a song detail
    Malformed,
}

#[derive(Clone)]
struct UpstreamState {
    behavior: UpstreamBehavior,
    calls: Arc<AtomicUsize>,
}

async fn get_info(
    State(state): State<UpstreamState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.calls.fetch_add(1, Ordering::SeqCst);

    if !params.contains_key("group") || !params.contains_key("song") {
        return StatusCode::BAD_REQUEST.into_response();
    }

    match state.behavior {
        UpstreamBehavior::Succeed => Json(json!({
            "releaseDate": UPSTREAM_RELEASE_DATE,
            "text": UPSTREAM_TEXT,
            "link": UPSTREAM_LINK,
        }))
        .into_response(),
        UpstreamBehavior::FailWith(status) => StatusCode::from_u16(status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        UpstreamBehavior::Malformed => Json(json!({"unexpected": true})).into_response(),
    }
}

/// Running stub upstream. Stops when dropped.
pub struct StubUpstream {
    pub base_url: String,
    calls: Arc<AtomicUsize>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl StubUpstream {
    pub async fn spawn(behavior: UpstreamBehavior) -> Self {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = Router::new().route("/info", get(get_info)).with_state(UpstreamState {
            behavior,
            calls: calls.clone(),
        });

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind upstream stub");
        let addr = listener
            .local_addr()
            .expect("Failed to get upstream stub address");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Upstream stub failed");
        });

        Self {
            base_url: format!("http://{}", addr),
            calls,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Number of `/info` requests received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Drop for StubUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
