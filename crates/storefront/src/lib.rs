//! Roastery storefront library.
//!
//! Coffee catalog and per-session shopping cart served as a JSON API. The
//! library exposes the stores, the router and its middleware so the binary
//! and the integration tests assemble exactly the same application.
//!
//! # Architecture
//!
//! - [`store::Catalog`] - products and categories, loaded once and read-only
//! - [`store::CartStore`] - in-memory carts keyed by the `cart_id` cookie
//! - [`projector`] - prices carts against the catalog on every read
//! - [`routes`] - axum handlers mapping store outcomes to status codes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod projector;
pub mod routes;
pub mod state;
pub mod store;

use axum::{
    Router,
    http::{HeaderValue, Request},
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Build the application router with its middleware stack.
///
/// Sentry layers are added by the binary, since they are only meaningful once
/// the Sentry client has been initialized.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(state.config().cors_origins.clone());

    routes::routes()
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .layer(cors)
        .with_state(state)
}

/// CORS for the browser frontend.
///
/// Credentials are allowed so the `cart_id` cookie travels with cross-origin
/// requests, which rules out wildcard origins; methods and headers mirror the
/// preflight request instead.
fn cors_layer(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
