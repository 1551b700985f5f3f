//! Integration tests for the Roastery storefront.
//!
//! Tests drive the fully assembled router (middleware included) in-process
//! with `tower::ServiceExt::oneshot`, so no server or network is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p roastery-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_products` - Catalog listing, detail and categories
//! - `storefront_cart` - Cart session and mutations
//! - `storefront_http` - Health, CORS and response headers

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use roastery_storefront::config::StorefrontConfig;
use roastery_storefront::middleware::CART_COOKIE_NAME;
use roastery_storefront::state::AppState;
use roastery_storefront::store::Catalog;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Fixture catalog: five products over three categories, `pods` left empty.
///
/// | id | category | price | in stock |
/// |----|----------|-------|----------|
/// | 1  | beans    | 10.00 | yes      |
/// | 2  | ground   | 12.50 | yes      |
/// | 3  | beans    | 15.99 | no       |
/// | 4  | beans    |  8.99 | yes      |
/// | 5  | ground   | 20.00 | yes      |
#[must_use]
pub fn fixture_catalog() -> Catalog {
    let products = json!({
        "products": [
            product("1", "Ethiopian Yirgacheffe", 10.00, "beans", true),
            product("2", "Colombian Supremo", 12.50, "ground", true),
            product("3", "Sumatra Mandheling", 15.99, "beans", false),
            product("4", "Guatemala Antigua", 8.99, "beans", true),
            product("5", "Kenya AA", 20.00, "ground", true),
        ]
    });
    let categories = json!({
        "categories": [
            category("beans", "Whole Bean", 1),
            category("ground", "Ground Coffee", 2),
            category("pods", "Coffee Pods", 3),
        ]
    });

    Catalog::from_json(&products.to_string(), &categories.to_string())
        .expect("fixture catalog is valid")
}

fn product(id: &str, name: &str, price: f64, category: &str, in_stock: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{name}, freshly roasted."),
        "price": price,
        "category": category,
        "roast_level": "Medium",
        "origin": "Somewhere",
        "image_url": format!("/images/{id}.jpg"),
        "in_stock": in_stock,
        "weight": "12 oz",
        "flavor_notes": ["Chocolate", "Citrus"],
        "processing_method": "Washed",
    })
}

fn category(id: &str, name: &str, display_order: i32) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{name} coffee."),
        "display_order": display_order,
        "image_url": format!("/images/categories/{id}.jpg"),
    })
}

/// A storefront application wired up exactly as the binary does it.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
    state: AppState,
}

impl TestApp {
    /// Build an app over the fixture catalog with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(fixture_catalog())
    }

    /// Build an app over the given catalog.
    #[must_use]
    pub fn with_catalog(catalog: Catalog) -> Self {
        let state = AppState::new(StorefrontConfig::default(), catalog);
        Self {
            router: roastery_storefront::app(state.clone()),
            state,
        }
    }

    /// Shared state behind the router, for asserting on store contents.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Send a request through the full middleware stack.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body is readable");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is JSON")
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// `GET` a path, optionally presenting a cart token.
    pub async fn get(&self, uri: &str, cart: Option<&str>) -> TestResponse {
        self.send(request(Method::GET, uri, cart, Body::empty(), false))
            .await
    }

    /// Send a JSON body, optionally presenting a cart token.
    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        cart: Option<&str>,
        body: &Value,
    ) -> TestResponse {
        self.send(request(method, uri, cart, Body::from(body.to_string()), true))
            .await
    }

    /// `DELETE` a path, optionally presenting a cart token.
    pub async fn delete(&self, uri: &str, cart: Option<&str>) -> TestResponse {
        self.send(request(Method::DELETE, uri, cart, Body::empty(), false))
            .await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a request carrying the cart cookie and a JSON content type as asked.
#[must_use]
pub fn request(
    method: Method,
    uri: &str,
    cart: Option<&str>,
    body: Body,
    is_json: bool,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = cart {
        builder = builder.header(header::COOKIE, format!("{CART_COOKIE_NAME}={token}"));
    }
    if is_json {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    builder.body(body).expect("request is well formed")
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// The full `Set-Cookie` header for the cart cookie, if one was issued.
    #[must_use]
    pub fn cart_set_cookie(&self) -> Option<&str> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|value| value.starts_with(&format!("{CART_COOKIE_NAME}=")))
    }

    /// The cart token issued by this response, if any.
    #[must_use]
    pub fn cart_token(&self) -> Option<String> {
        let cookie = self.cart_set_cookie()?;
        let pair = cookie.split(';').next()?;
        pair.strip_prefix(&format!("{CART_COOKIE_NAME}="))
            .map(str::to_string)
    }

    /// A response header as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// The `detail` message of an error body.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.body.get("detail").and_then(Value::as_str)
    }
}
