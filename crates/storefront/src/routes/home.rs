//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use serde_json::Value;
use tracing::instrument;

use jsonshop_core::Product;

use crate::state::AppState;

/// Fields shown in a card's heading instead of the detail rows.
const TITLE_FIELDS: [&str; 2] = ["title", "name"];
const PRICE_FIELD: &str = "price";

// =============================================================================
// Product Views
// =============================================================================

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub title: String,
    pub price: Option<String>,
    pub details: Vec<FieldView>,
}

/// One remaining product field, rendered as a key/value row.
#[derive(Clone)]
pub struct FieldView {
    pub name: String,
    pub value: String,
}

/// Render a JSON value as plain text.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let title = TITLE_FIELDS
            .iter()
            .find_map(|name| product.field(name))
            .map(display_value)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| format!("Producto {}", product.id));

        let details = product
            .fields
            .iter()
            .filter(|(name, _)| {
                !TITLE_FIELDS.contains(&name.as_str()) && name.as_str() != PRICE_FIELD
            })
            .map(|(name, value)| FieldView {
                name: name.clone(),
                value: display_value(value),
            })
            .collect();

        Self {
            id: product.id.to_string(),
            title,
            price: product.field(PRICE_FIELD).map(display_value),
            details,
        }
    }
}

/// Load the current product list as views.
pub(crate) async fn product_views(state: &AppState) -> Vec<ProductView> {
    state
        .products()
        .list_all()
        .await
        .iter()
        .map(ProductView::from)
        .collect()
}

// =============================================================================
// Templates
// =============================================================================

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<ProductView>,
}

/// Display home page with the current product list.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    HomeTemplate {
        products: product_views(&state).await,
    }
}
