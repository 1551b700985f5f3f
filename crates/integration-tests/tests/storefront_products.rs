//! Integration tests for the catalog endpoints.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use roastery_core::Pagination;
use roastery_integration_tests::{TestApp, TestResponse};
use serde_json::Value;

fn product_ids(response: &TestResponse) -> Vec<&str> {
    response.body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|product| product["id"].as_str().unwrap())
        .collect()
}

// ============================================================================
// Listing & Pagination Tests
// ============================================================================

#[tokio::test]
async fn test_list_products_defaults() {
    let app = TestApp::new();

    let resp = app.get("/api/products", None).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(product_ids(&resp), ["1", "2", "3", "4", "5"]);
    assert_eq!(resp.body["total"], 5);
    assert_eq!(resp.body["page"], 1);
    assert_eq!(resp.body["per_page"], 12);

    // Every listing carries the full category list in catalog order
    let categories: Vec<&str> = resp.body["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|category| category["id"].as_str().unwrap())
        .collect();
    assert_eq!(categories, ["beans", "ground", "pods"]);
}

#[tokio::test]
async fn test_list_products_pagination() {
    let app = TestApp::new();

    let first = app.get("/api/products?page=1&per_page=2", None).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(product_ids(&first), ["1", "2"]);
    assert_eq!(first.body["total"], 5);

    let last = app.get("/api/products?page=3&per_page=2", None).await;
    assert_eq!(product_ids(&last), ["5"]);
    assert_eq!(last.body["total"], 5);

    // Past the end is an empty page, not an error
    let beyond = app.get("/api/products?page=4&per_page=2", None).await;
    assert_eq!(beyond.status, StatusCode::OK);
    assert!(product_ids(&beyond).is_empty());
    assert_eq!(beyond.body["total"], 5);
    assert_eq!(beyond.body["page"], 4);
}

#[tokio::test]
async fn test_list_products_by_category() {
    let app = TestApp::new();

    let resp = app.get("/api/products?category=beans", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    // Out-of-stock products are still listed
    assert_eq!(product_ids(&resp), ["1", "3", "4"]);
    assert_eq!(resp.body["total"], 3);

    let paged = app
        .get("/api/products?category=beans&page=2&per_page=2", None)
        .await;
    assert_eq!(product_ids(&paged), ["4"]);
    assert_eq!(paged.body["total"], 3);
}

#[tokio::test]
async fn test_list_products_empty_category() {
    let app = TestApp::new();

    let resp = app.get("/api/products?category=pods", None).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(product_ids(&resp).is_empty());
    assert_eq!(resp.body["total"], 0);
}

#[tokio::test]
async fn test_list_products_blank_category_is_unfiltered() {
    let app = TestApp::new();

    let resp = app.get("/api/products?category=", None).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["total"], 5);
}

#[tokio::test]
async fn test_list_products_invalid_category() {
    let app = TestApp::new();

    let resp = app.get("/api/products?category=tea", None).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.detail(),
        Some("Invalid category. Must be one of: beans, ground, pods")
    );
}

#[tokio::test]
async fn test_list_products_invalid_pagination() {
    let app = TestApp::new();

    let resp = app.get("/api/products?page=0", None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.detail(), Some("Page must be >= 1"));

    let too_many = Pagination::MAX_PER_PAGE + 1;
    let resp = app
        .get(&format!("/api/products?per_page={too_many}"), None)
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.detail().unwrap().starts_with("Per page must be between 1 and 50"));

    let resp = app.get("/api/products?per_page=0", None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    // The largest allowed page size is accepted
    let resp = app.get("/api/products?per_page=50", None).await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn test_list_products_malformed_query() {
    let app = TestApp::new();

    let resp = app.get("/api/products?page=abc", None).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.detail().is_some());
}

// ============================================================================
// Detail & Category Tests
// ============================================================================

#[tokio::test]
async fn test_get_product() {
    let app = TestApp::new();

    let resp = app.get("/api/products/2", None).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["id"], "2");
    assert_eq!(resp.body["name"], "Colombian Supremo");
    assert_eq!(resp.body["category"], "ground");
    assert_eq!(resp.body["in_stock"], true);
    assert!((resp.body["price"].as_f64().unwrap() - 12.5).abs() < f64::EPSILON);
    assert_eq!(resp.body["flavor_notes"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_out_of_stock_product() {
    let app = TestApp::new();

    let resp = app.get("/api/products/3", None).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["in_stock"], false);
}

#[tokio::test]
async fn test_get_unknown_product() {
    let app = TestApp::new();

    let resp = app.get("/api/products/999", None).await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.detail(), Some("Product not found"));
}

#[tokio::test]
async fn test_list_categories() {
    let app = TestApp::new();

    let resp = app.get("/api/categories", None).await;

    assert_eq!(resp.status, StatusCode::OK);
    let categories = resp.body.as_array().unwrap();
    assert_eq!(categories.len(), 3);
    assert_eq!(categories[0]["id"], "beans");
    assert_eq!(categories[0]["name"], "Whole Bean");
    assert_eq!(categories[0]["display_order"], 1);
    assert_eq!(categories[2]["id"], "pods");
}

#[tokio::test]
async fn test_catalog_reads_do_not_create_carts() {
    let app = TestApp::new();

    let resp = app.get("/api/products", None).await;

    assert!(resp.cart_set_cookie().is_none());
    assert!(app.state().carts().is_empty());
    assert_ne!(resp.body, Value::Null);
}
