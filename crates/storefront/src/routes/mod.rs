//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                  - Liveness check
//!
//! # Catalog
//! GET    /api/products            - Paginated listing (?category=&page=&per_page=)
//! GET    /api/products/{id}       - Product detail
//! GET    /api/categories          - Category list
//!
//! # Cart (session via `cart_id` cookie)
//! GET    /api/cart                - Current cart
//! POST   /api/cart                - Add item (accumulates)
//! PUT    /api/cart/{product_id}   - Set quantity (0 removes)
//! DELETE /api/cart/{product_id}   - Remove item
//! ```

pub mod cart;
pub mod health;
pub mod products;

use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        .route("/categories", get(products::categories))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show).post(cart::add))
        .route("/cart/{product_id}", put(cart::update).delete(cart::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .nest("/api", catalog_routes().merge(cart_routes()))
}
