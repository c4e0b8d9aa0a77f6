//! Storefront API tests through the full router.
//!
//! These run in-process against an in-memory store or a temp directory of
//! JSON files. No server or network is needed.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use axum::http::{Method, StatusCode};
use futures::StreamExt;
use serde_json::{Value, json};

use jsonshop_core::Collection;
use jsonshop_integration_tests::TestApp;
use jsonshop_storefront::db::MemoryStore;

const PRODUCT_NOT_FOUND: &str = "Producto no encontrado o no existe en la base de datos.";
const CART_NOT_FOUND: &str = "Carrito no encontrado o no existe en la base de datos.";

fn seeded(products: Value) -> TestApp {
    let Value::Array(records) = products else {
        panic!("seed must be an array");
    };
    TestApp::with_store(MemoryStore::new().with_records(Collection::Products, records))
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_create_product_on_empty_store() {
    let app = TestApp::new();

    let (status, body) = app
        .json(Method::POST, "/api/products", r#"{"name":"Widget","price":10}"#)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "1", "name": "Widget", "price": 10}));

    let (status, body) = app.json(Method::GET, "/api/products", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": "1", "name": "Widget", "price": 10}]));
}

#[tokio::test]
async fn test_create_uses_max_id_plus_one() {
    let app = seeded(json!([
        {"id": "3", "name": "a"},
        {"id": 7, "name": "b"},
        {"id": "x", "name": "c"}
    ]));

    let (_, body) = app
        .json(Method::POST, "/api/products", r#"{"id":"99","name":"d"}"#)
        .await;
    assert_eq!(body["id"], "8");

    let (_, list) = app.json(Method::GET, "/api/products", "").await;
    assert_eq!(list.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_create_with_empty_body() {
    let app = TestApp::new();

    let (status, body) = app.json(Method::POST, "/api/products", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "1"}));
}

#[tokio::test]
async fn test_create_rejects_non_object_body() {
    let app = TestApp::new();

    let (status, body) = app.json(Method::POST, "/api/products", "[1,2]").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = app.json(Method::POST, "/api/products", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = app.json(Method::GET, "/api/products", "").await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_get_missing_product() {
    let app = TestApp::new();

    let (status, body) = app.json(Method::GET, "/api/products/999", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": PRODUCT_NOT_FOUND}));
}

#[tokio::test]
async fn test_get_product_stored_with_numeric_id() {
    let app = seeded(json!([{"id": 1, "name": "Widget"}]));

    let (status, body) = app.json(Method::GET, "/api/products/1", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "1", "name": "Widget"}));
}

#[tokio::test]
async fn test_update_merges_fields() {
    let app = seeded(json!([{"id": 1, "name": "Widget", "price": 10, "stock": 3}]));

    let (status, body) = app
        .json(Method::PUT, "/api/products/1", r#"{"price":12,"id":"55","color":"red"}"#)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id": "1", "name": "Widget", "price": 12, "stock": 3, "color": "red"})
    );

    let (_, stored) = app.json(Method::GET, "/api/products/1", "").await;
    assert_eq!(stored, body);
}

#[tokio::test]
async fn test_update_missing_product() {
    let app = TestApp::new();

    let (status, body) = app
        .json(Method::PUT, "/api/products/4", r#"{"price":1}"#)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], PRODUCT_NOT_FOUND);
}

#[tokio::test]
async fn test_delete_removes_exactly_one() {
    let app = seeded(json!([
        {"id": "1", "name": "a"},
        {"id": "2", "name": "b"},
        {"id": "3", "name": "c"}
    ]));

    let (status, body) = app.json(Method::DELETE, "/api/products/2", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "2", "name": "b"}));

    let (_, list) = app.json(Method::GET, "/api/products", "").await;
    let ids: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["1", "3"]);

    let (status, body) = app.json(Method::DELETE, "/api/products/2", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], PRODUCT_NOT_FOUND);
}

#[tokio::test]
async fn test_delete_matches_ids_exactly() {
    let app = seeded(json!([{"id": 1, "name": "a"}]));

    let (status, _) = app.json(Method::DELETE, "/api/products/01", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.json(Method::DELETE, "/api/products/1", "").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_odd_records_survive_writes() {
    let app = seeded(json!([
        {"id": "1", "name": "A"},
        {"id": "2", "name": "B"},
        {"id": null, "name": "C"},
        {"id": [7], "name": "D"}
    ]));

    let (_, list) = app.json(Method::GET, "/api/products", "").await;
    assert_eq!(list.as_array().unwrap().len(), 3);

    let (status, created) = app
        .json(Method::POST, "/api/products", r#"{"name":"New"}"#)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["id"], "3");

    let stored = app.memory_store().records(Collection::Products).await;
    assert_eq!(
        stored,
        vec![
            json!({"id": "1", "name": "A"}),
            json!({"id": "2", "name": "B"}),
            json!({"id": "", "name": "C"}),
            json!({"id": [7], "name": "D"}),
            json!({"id": "3", "name": "New"}),
        ]
    );
}

#[tokio::test]
async fn test_trailing_slash_is_ignored() {
    let app = TestApp::new();

    let (status, body) = app.json(Method::GET, "/api/products/", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_failed_write_returns_500() {
    let app = TestApp::new();
    app.memory_store().set_fail_writes(true);
    let mut subscription = app.state.notifier().subscribe();

    let (status, body) = app
        .json(Method::POST, "/api/products", r#"{"name":"Widget"}"#)
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Error interno del servidor."}));

    let received = tokio::time::timeout(Duration::from_millis(50), subscription.next()).await;
    assert!(received.is_err(), "failed write must not broadcast");
    assert!(app.memory_store().records(Collection::Products).await.is_empty());
}

// =============================================================================
// Carts
// =============================================================================

#[tokio::test]
async fn test_cart_flow() {
    let app = TestApp::new();

    let (status, cart) = app.json(Method::POST, "/api/carts", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["products"], json!([]));
    let cart_id = cart["id"].as_str().unwrap().to_owned();
    assert!(cart_id.parse::<u64>().is_ok());

    let uri = format!("/api/carts/{cart_id}/product/1");
    let (status, items) = app.json(Method::POST, &uri, "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(items, json!([{"product": "1", "quantity": 1}]));

    let (_, items) = app.json(Method::POST, &uri, "").await;
    assert_eq!(items, json!([{"product": "1", "quantity": 2}]));

    let (_, items) = app
        .json(Method::GET, &format!("/api/carts/{cart_id}"), "")
        .await;
    assert_eq!(items, json!([{"product": "1", "quantity": 2}]));
}

#[tokio::test]
async fn test_cart_ids_are_unique() {
    let app = TestApp::new();

    let (_, first) = app.json(Method::POST, "/api/carts", "").await;
    let (_, second) = app.json(Method::POST, "/api/carts", "").await;

    assert_ne!(first["id"], second["id"]);
}

#[tokio::test]
async fn test_missing_cart_lists_no_products() {
    let app = TestApp::new();

    let (status, body) = app.json(Method::GET, "/api/carts/123", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_add_to_missing_cart() {
    let app = TestApp::new();

    let (status, body) = app
        .json(Method::POST, "/api/carts/123/product/1", "")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": CART_NOT_FOUND}));
}

// =============================================================================
// Pages and Realtime
// =============================================================================

#[tokio::test]
async fn test_home_lists_products() {
    let app = seeded(json!([{"id": "1", "name": "Widget", "price": 10}]));

    let (status, html) = app.text(Method::GET, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Widget"));
    assert!(html.contains("product-list"));
}

#[tokio::test]
async fn test_realtime_page_loads_event_script() {
    let app = TestApp::new();

    let (status, html) = app.text(Method::GET, "/realtimeproducts").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("updateProducts"));
    assert!(html.contains("/static/js/realtime.js"));
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let (status, body) = app.text(Method::GET, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_event_stream_receives_product_list() {
    let app = TestApp::new();

    let response = app.send(Method::GET, "/events", "").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/event-stream"
    );
    let mut stream = response.into_body().into_data_stream();

    let (status, _) = app
        .json(Method::POST, "/api/products", r#"{"name":"Widget"}"#)
        .await;
    assert_eq!(status, StatusCode::OK);

    let mut received = String::new();
    while !received.contains("\n\n") {
        let chunk = tokio::time::timeout(Duration::from_secs(1), stream.next())
            .await
            .expect("no event within a second")
            .expect("stream ended")
            .unwrap();
        received.push_str(&String::from_utf8_lossy(&chunk));
    }

    assert!(received.contains("event: updateProducts"));
    let data = received
        .lines()
        .find_map(|line| line.strip_prefix("data: "))
        .unwrap();
    let products: Value = serde_json::from_str(data).unwrap();
    assert_eq!(products, json!([{"id": "1", "name": "Widget"}]));
}

#[tokio::test]
async fn test_event_stream_ends_on_close() {
    let app = TestApp::new();

    let response = app.send(Method::GET, "/events", "").await;
    let mut stream = response.into_body().into_data_stream();

    app.state.notifier().close();

    let next = tokio::time::timeout(Duration::from_secs(1), stream.next())
        .await
        .expect("stream did not end");
    assert!(next.is_none());
}

// =============================================================================
// JSON Files
// =============================================================================

#[tokio::test]
async fn test_file_store_persists_collections() {
    let dir = tempfile::tempdir().unwrap();
    let app = TestApp::with_data_dir(dir.path());

    app.json(Method::POST, "/api/products", r#"{"name":"Widget","price":10}"#)
        .await;
    let (_, cart) = app.json(Method::POST, "/api/carts", "").await;

    let products: Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("productos.json")).unwrap())
            .unwrap();
    assert_eq!(products, json!([{"id": "1", "name": "Widget", "price": 10}]));

    let carts: Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("carrito.json")).unwrap()).unwrap();
    assert_eq!(carts, json!([cart]));

    let reopened = TestApp::with_data_dir(dir.path());
    let (_, list) = reopened.json(Method::GET, "/api/products", "").await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_corrupt_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("productos.json"), "{ not json").unwrap();
    let app = TestApp::with_data_dir(dir.path());

    let (status, list) = app.json(Method::GET, "/api/products", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([]));

    let (_, created) = app
        .json(Method::POST, "/api/products", r#"{"name":"Widget"}"#)
        .await;
    assert_eq!(created["id"], "1");
}
