//! Integration tests for JSON Shop.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests against the full router
//! cargo test -p jsonshop-integration-tests
//!
//! # Live tests against a running storefront
//! cargo run -p jsonshop-storefront &
//! cargo test -p jsonshop-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `storefront_api` - REST, pages, and event stream through the router
//! - `storefront_live` - the same flows over HTTP (`STOREFRONT_BASE_URL`)

use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    body::{Body, Bytes},
    http::{Method, Request, StatusCode},
};
use serde_json::Value;
use tower::{Layer, ServiceExt};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use jsonshop_storefront::config::StorefrontConfig;
use jsonshop_storefront::db::{CollectionStore, MemoryStore};
use jsonshop_storefront::routes;
use jsonshop_storefront::state::AppState;

/// A storefront router wired the way the binary wires it.
pub struct TestApp {
    pub state: AppState,
    /// Backing store, when the app runs in memory.
    pub store: Option<Arc<MemoryStore>>,
    app: NormalizePath<Router>,
}

impl TestApp {
    /// Storefront over an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    /// Storefront over a prepared in-memory store.
    #[must_use]
    pub fn with_store(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        let shared: Arc<dyn CollectionStore> = store.clone();
        let state = AppState::new(StorefrontConfig::for_data_dir("data"), shared);
        Self {
            app: NormalizePathLayer::trim_trailing_slash().layer(routes::app(state.clone())),
            state,
            store: Some(store),
        }
    }

    /// Storefront over JSON files in `data_dir`.
    #[must_use]
    pub fn with_data_dir(data_dir: &Path) -> Self {
        let state = AppState::with_file_store(StorefrontConfig::for_data_dir(data_dir));
        Self {
            app: NormalizePathLayer::trim_trailing_slash().layer(routes::app(state.clone())),
            state,
            store: None,
        }
    }

    /// The in-memory store behind this app.
    ///
    /// # Panics
    ///
    /// Panics if the app was built over JSON files.
    #[must_use]
    pub fn memory_store(&self) -> &MemoryStore {
        self.store.as_deref().expect("App is not backed by memory")
    }

    /// Send one request and return the raw response.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn send(&self, method: Method, uri: &str, body: &str) -> axum::response::Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .expect("Failed to build request");

        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible")
    }

    /// Send one request and decode the JSON response body.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON.
    pub async fn json(&self, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
        let response = self.send(method, uri, body).await;
        let status = response.status();
        let bytes = body_bytes(response).await;
        let value = serde_json::from_slice(&bytes).expect("Response body is not JSON");
        (status, value)
    }

    /// Send one request and return the body as text.
    pub async fn text(&self, method: Method, uri: &str) -> (StatusCode, String) {
        let response = self.send(method, uri, "").await;
        let status = response.status();
        let bytes = body_bytes(response).await;
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect a full response body.
///
/// # Panics
///
/// Panics if the body stream fails.
pub async fn body_bytes(response: axum::response::Response) -> Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body")
}
