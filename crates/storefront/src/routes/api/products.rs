//! Product API handlers.
//!
//! ```text
//! GET    /api/products        - List products
//! GET    /api/products/{pid}  - Get one product
//! POST   /api/products        - Create product
//! PUT    /api/products/{pid}  - Update product
//! DELETE /api/products/{pid}  - Delete product
//! ```

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};
use tracing::instrument;

use jsonshop_core::{Product, ProductId};

use super::parse_fields;
use crate::error::Result;
use crate::state::AppState;

/// List every product.
///
/// GET /api/products
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.products().list_all().await)
}

/// Get a single product.
///
/// GET /api/products/{pid}
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(pid): Path<String>) -> Result<Json<Product>> {
    let product = state.products().get_by_id(&ProductId::new(pid)).await?;
    Ok(Json(product))
}

/// Create a product from the JSON body.
///
/// POST /api/products
#[instrument(skip(state, body))]
pub async fn create(State(state): State<AppState>, body: Bytes) -> Result<Json<Product>> {
    let fields = parse_fields(&body)?;
    let product = state.products().create(fields).await?;
    Ok(Json(product))
}

/// Merge the JSON body into an existing product.
///
/// PUT /api/products/{pid}
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    Path(pid): Path<String>,
    body: Bytes,
) -> Result<Json<Product>> {
    let fields = parse_fields(&body)?;
    let product = state
        .products()
        .update(&ProductId::new(pid), fields)
        .await?;
    Ok(Json(product))
}

/// Delete a product and return it.
///
/// DELETE /api/products/{pid}
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(pid): Path<String>,
) -> Result<Json<Product>> {
    let product = state.products().remove(&ProductId::new(pid)).await?;
    Ok(Json(product))
}
