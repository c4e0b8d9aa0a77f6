//! Cart API handlers.
//!
//! ```text
//! POST /api/carts                      - Create cart
//! GET  /api/carts/{cid}                - Cart line items ([] if the cart is missing)
//! POST /api/carts/{cid}/product/{pid}  - Add one unit of a product
//! ```

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use jsonshop_core::{Cart, CartId, CartItem, ProductId};

use crate::error::Result;
use crate::state::AppState;

/// Create an empty cart.
///
/// POST /api/carts
#[instrument(skip(state))]
pub async fn create(State(state): State<AppState>) -> Result<Json<Cart>> {
    let cart = state.carts().create().await?;
    Ok(Json(cart))
}

/// Get the line items of a cart.
///
/// GET /api/carts/{cid}
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(cid): Path<String>) -> Json<Vec<CartItem>> {
    Json(state.carts().get_products(&CartId::new(cid)).await)
}

/// Add one unit of a product to a cart.
///
/// POST /api/carts/{cid}/product/{pid}
#[instrument(skip(state))]
pub async fn add_product(
    State(state): State<AppState>,
    Path((cid, pid)): Path<(String, String)>,
) -> Result<Json<Vec<CartItem>>> {
    let items = state
        .carts()
        .add_product(&CartId::new(cid), ProductId::new(pid))
        .await?;
    Ok(Json(items))
}
