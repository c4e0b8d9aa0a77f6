//! Realtime product page and its event stream.
//!
//! The page renders the current list server-side, then subscribes to
//! `/events` and redraws the list on every `updateProducts` event.

use std::convert::Infallible;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{
        IntoResponse, Sse,
        sse::{Event, KeepAlive},
    },
};
use futures::Stream;
use tracing::{instrument, warn};

use super::home::{ProductView, product_views};
use crate::state::AppState;

/// Name of the event carrying the full product list.
pub const UPDATE_PRODUCTS_EVENT: &str = "updateProducts";

/// Realtime products page template.
#[derive(Template, WebTemplate)]
#[template(path = "realtime_products.html")]
pub struct RealtimeProductsTemplate {
    pub products: Vec<ProductView>,
    pub event_name: &'static str,
}

/// Display the realtime products page.
///
/// GET /realtimeproducts
#[instrument(skip(state))]
pub async fn page(State(state): State<AppState>) -> impl IntoResponse {
    RealtimeProductsTemplate {
        products: product_views(&state).await,
        event_name: UPDATE_PRODUCTS_EVENT,
    }
}

/// Stream product-list updates via SSE.
///
/// GET /events
///
/// Each product mutation yields one `updateProducts` event whose data is the
/// full product array. Nothing is replayed on connect.
pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut subscription = state.notifier().subscribe();

    let stream = async_stream::stream! {
        while let Some(products) = subscription.next().await {
            match Event::default()
                .event(UPDATE_PRODUCTS_EVENT)
                .json_data(products.as_slice())
            {
                Ok(event) => yield Ok::<Event, Infallible>(event),
                Err(e) => warn!(error = %e, "Failed to encode product list event"),
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
