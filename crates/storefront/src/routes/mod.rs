//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Home page (product list)
//! GET  /realtimeproducts              - Product list that updates live
//! GET  /events                        - SSE stream of `updateProducts`
//! GET  /health                        - Health check
//! GET  /static/*                      - Static assets
//!
//! # Products API
//! GET    /api/products                - List products
//! GET    /api/products/{pid}          - Get product
//! POST   /api/products                - Create product
//! PUT    /api/products/{pid}          - Update product
//! DELETE /api/products/{pid}          - Delete product
//!
//! # Carts API
//! POST /api/carts                     - Create cart
//! GET  /api/carts/{cid}               - Cart line items
//! POST /api/carts/{cid}/product/{pid} - Add product to cart
//! ```

pub mod api;
pub mod home;
pub mod realtime;

use axum::{
    Router,
    extract::Request,
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::field::Empty;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the product API router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(api::products::index).post(api::products::create))
        .route(
            "/{pid}",
            get(api::products::show)
                .put(api::products::update)
                .delete(api::products::delete),
        )
}

/// Create the cart API router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(api::carts::create))
        .route("/{cid}", get(api::carts::show))
        .route("/{cid}/product/{pid}", post(api::carts::add_product))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Pages
        .route("/", get(home::home))
        .route("/realtimeproducts", get(realtime::page))
        // Realtime feed
        .route("/events", get(realtime::events))
        // JSON API
        .nest("/api/products", product_routes())
        .nest("/api/carts", cart_routes())
}

/// Build the complete application: routes, health check, static assets,
/// request ids, and request tracing.
pub fn app(state: AppState) -> Router {
    let static_dir = state.config().static_dir.clone();

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = Empty,
            )
        }))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}
