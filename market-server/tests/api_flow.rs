//! End-to-end storefront flow over the HTTP API
//!
//! Drives the real router with in-process requests: a seller lists a product,
//! a buyer fills a cart from two sellers and checks out, then the seller
//! works the resulting order through its status lifecycle.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use market_server::{Catalog, Config, MarketStorage, ServerState, api};
use serde_json::{Value, json};
use tower::ServiceExt;

fn test_app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    let storage = MarketStorage::open(config.db_path()).unwrap();
    let state = ServerState::with_storage(config, storage, Catalog::seeded());
    (api::router(state), dir)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_full_storefront_flow() {
    let (app, _dir) = test_app();

    // A seller signs up and lists a product.
    let (status, seller) = send(
        &app,
        "POST",
        "/api/auth/signup",
        Some(json!({
            "name": "Hilltop Orchard",
            "email": "orchard@example.com",
            "password": "pears123",
            "role": "seller",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let seller_id = seller["id"].as_str().unwrap().to_string();

    let (status, listed) = send(
        &app,
        "POST",
        "/api/products",
        Some(json!({
            "name": "Bartlett Pears",
            "description": "Juicy pears from the hill.",
            "price": 3.50,
            "image": "/images/products/pears.jpg",
            "category": "fruit",
            "stock": 20,
            "unit": "lb",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["seller_id"], seller_id.as_str());
    let pear_id = listed["id"].as_str().unwrap().to_string();

    // A buyer signs up; signup switches the current identity.
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/signup",
        Some(json!({
            "name": "Demo Buyer",
            "email": "buyer@example.com",
            "password": "secret1",
            "role": "buyer",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The catalog now holds the seed plus the new listing.
    let (status, products) = send(&app, "GET", "/api/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(products.as_array().unwrap().len(), 9);

    // Fill the cart from two sellers: pears plus seed corn (farmer-2).
    let (status, cart) = send(
        &app,
        "POST",
        "/api/cart/items",
        Some(json!({ "product_id": pear_id, "quantity": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["item_count"], 2);

    let (status, cart) = send(
        &app,
        "POST",
        "/api/cart/items",
        Some(json!({ "product_id": "3", "quantity": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["item_count"], 5);
    assert_eq!(cart["total"], 9.97);

    // Checkout splits the cart into one order per seller and empties it.
    let (status, orders) = send(&app, "POST", "/api/cart/checkout", None).await;
    assert_eq!(status, StatusCode::OK);
    let orders = orders.as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|o| o["status"] == "pending"));

    let (status, cart) = send(&app, "GET", "/api/cart", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["item_count"], 0);
    assert!(cart["items"].as_array().unwrap().is_empty());

    // The seller logs back in and sees only their own order.
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        Some(json!({
            "email": "orchard@example.com",
            "password": "pears123",
            "role": "seller",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, seller_orders) = send(
        &app,
        "GET",
        &format!("/api/orders?seller_id={}", seller_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let seller_orders = seller_orders.as_array().unwrap();
    assert_eq!(seller_orders.len(), 1);
    assert_eq!(seller_orders[0]["total"], 7.00);
    let order_id = seller_orders[0]["id"].as_str().unwrap().to_string();

    // pending -> processing -> shipped
    let (status, order) = send(
        &app,
        "POST",
        &format!("/api/orders/{}/status", order_id),
        Some(json!({ "status": "processing" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "processing");

    let (status, order) = send(
        &app,
        "POST",
        &format!("/api/orders/{}/status", order_id),
        Some(json!({ "status": "shipped" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "shipped");

    // An illegal transition is a no-op, not an error.
    let (status, order) = send(
        &app,
        "POST",
        &format!("/api/orders/{}/status", order_id),
        Some(json!({ "status": "pending" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "shipped");

    // Dashboard counts reflect the shipped order.
    let (status, stats) = send(
        &app,
        "GET",
        &format!("/api/orders/stats/{}", seller_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["pending"], 0);
    assert_eq!(stats["processing"], 0);
    assert_eq!(stats["shipped"], 1);

    // The corn order belongs to farmer-2; this seller cannot touch it.
    let (_, all_orders) = send(&app, "GET", "/api/orders", None).await;
    let other_id = all_orders
        .as_array()
        .unwrap()
        .iter()
        .find(|o| o["id"] != order_id.as_str())
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/orders/{}/status", other_id),
        Some(json!({ "status": "processing" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "E1003");
}

#[tokio::test]
async fn test_cart_validation_and_error_envelopes() {
    let (app, _dir) = test_app();

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/signup",
        Some(json!({
            "name": "Demo Buyer",
            "email": "buyer@example.com",
            "password": "secret1",
            "role": "buyer",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Unknown product id.
    let (status, body) = send(
        &app,
        "POST",
        "/api/cart/items",
        Some(json!({ "product_id": "nonexistent", "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "E0003");

    // Quantity above the listed stock (corn has 100).
    let (status, body) = send(
        &app,
        "POST",
        "/api/cart/items",
        Some(json!({ "product_id": "3", "quantity": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");

    // Checkout with an empty cart.
    let (status, body) = send(&app, "POST", "/api/cart/checkout", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "E4001");

    // After logout, checkout is unauthenticated.
    let (status, _) = send(&app, "POST", "/api/auth/logout", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, "POST", "/api/cart/checkout", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E1001");
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(dir.path().to_string_lossy(), 0);

    {
        let storage = MarketStorage::open(config.db_path()).unwrap();
        let state = ServerState::with_storage(config.clone(), storage, Catalog::seeded());
        let app = api::router(state);
        let (status, _) = send(
            &app,
            "POST",
            "/api/cart/items",
            Some(json!({ "product_id": "1", "quantity": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    // Reopen the same database file; the cart is still there.
    let storage = MarketStorage::open(config.db_path()).unwrap();
    let state = ServerState::with_storage(config, storage, Catalog::seeded());
    let app = api::router(state);

    let (status, cart) = send(&app, "GET", "/api/cart", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["item_count"], 2);
    assert_eq!(cart["items"][0]["product"]["id"], "1");
}
