//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all song library endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP test client
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    // ========================================================================
    // Server
    // ========================================================================

    /// GET /
    pub async fn get_stats(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Stats request failed")
    }

    /// GET /openapi.json
    pub async fn get_openapi(&self) -> Response {
        self.client
            .get(format!("{}/openapi.json", self.base_url))
            .send()
            .await
            .expect("OpenAPI request failed")
    }

    // ========================================================================
    // Library
    // ========================================================================

    /// GET /library with raw query parameters
    pub async fn get_library(&self, query: &[(&str, &str)]) -> Response {
        self.client
            .get(format!("{}/library", self.base_url))
            .query(query)
            .send()
            .await
            .expect("Library request failed")
    }

    // ========================================================================
    // Songs
    // ========================================================================

    /// GET /song/{id}
    pub async fn get_song(&self, id: i64) -> Response {
        self.client
            .get(format!("{}/song/{}", self.base_url, id))
            .send()
            .await
            .expect("Get song request failed")
    }

    /// GET /song/{id}/text, optionally with ?page=
    pub async fn get_song_text(&self, id: i64, page: Option<&str>) -> Response {
        let mut request = self
            .client
            .get(format!("{}/song/{}/text", self.base_url, id));
        if let Some(page) = page {
            request = request.query(&[("page", page)]);
        }
        request.send().await.expect("Get song text request failed")
    }

    /// POST /song
    pub async fn add_song(&self, group: &str, title: &str) -> Response {
        self.client
            .post(format!("{}/song", self.base_url))
            .json(&json!({ "group": group, "song": title }))
            .send()
            .await
            .expect("Add song request failed")
    }

    /// PUT /song/{id}
    pub async fn update_song(&self, id: i64, body: &Value) -> Response {
        self.client
            .put(format!("{}/song/{}", self.base_url, id))
            .json(body)
            .send()
            .await
            .expect("Update song request failed")
    }

    /// DELETE /song/{id}
    pub async fn delete_song(&self, id: i64) -> Response {
        self.client
            .delete(format!("{}/song/{}", self.base_url, id))
            .send()
            .await
            .expect("Delete song request failed")
    }
}
