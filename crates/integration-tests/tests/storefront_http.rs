//! Integration tests for health, CORS and the response header middleware.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use roastery_integration_tests::TestApp;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let resp = app.get("/health", None).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["status"], "healthy");
    assert!(resp.body["timestamp"].is_string());
}

#[tokio::test]
async fn test_unknown_route() {
    let app = TestApp::new();

    let resp = app.get("/api/orders", None).await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_security_headers() {
    let app = TestApp::new();

    let resp = app.get("/api/products", None).await;

    assert_eq!(resp.header("x-content-type-options"), Some("nosniff"));
    assert_eq!(resp.header("x-frame-options"), Some("DENY"));
    assert_eq!(resp.header("referrer-policy"), Some("no-referrer"));
    assert_eq!(resp.header("cache-control"), Some("no-store"));
    assert!(resp.header("content-security-policy").is_some());
}

#[tokio::test]
async fn test_request_id_generated() {
    let app = TestApp::new();

    let resp = app.get("/health", None).await;

    let id = resp.header("x-request-id").unwrap();
    assert_eq!(id.len(), 36);
}

#[tokio::test]
async fn test_request_id_propagated() {
    let app = TestApp::new();
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "upstream-123")
        .body(Body::empty())
        .unwrap();

    let resp = app.send(request).await;

    assert_eq!(resp.header("x-request-id"), Some("upstream-123"));
}

#[tokio::test]
async fn test_cors_allows_configured_origin_with_credentials() {
    let app = TestApp::new();
    let request = Request::builder()
        .uri("/api/cart")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let resp = app.send(request).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.header("access-control-allow-origin"),
        Some("http://localhost:3000")
    );
    assert_eq!(resp.header("access-control-allow-credentials"), Some("true"));
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/cart/1")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let resp = app.send(request).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.header("access-control-allow-origin"),
        Some("http://localhost:3000")
    );
    assert_eq!(resp.header("access-control-allow-methods"), Some("PUT"));
    assert_eq!(
        resp.header("access-control-allow-headers"),
        Some("content-type")
    );
    // Preflights never reach the cart handlers
    assert!(resp.cart_set_cookie().is_none());
    assert!(app.state().carts().is_empty());
}

#[tokio::test]
async fn test_cors_rejects_unlisted_origin() {
    let app = TestApp::new();
    let request = Request::builder()
        .uri("/api/products")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();

    let resp = app.send(request).await;

    assert!(resp.header("access-control-allow-origin").is_none());
}
