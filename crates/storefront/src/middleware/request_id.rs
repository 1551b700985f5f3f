//! Request ID middleware for request tracing and correlation.
//!
//! Reuses the `x-request-id` header from an upstream proxy when present and
//! mints a UUID v4 otherwise. The ID is recorded on the request span, tagged
//! on the Sentry scope, and echoed back in the response headers.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header carrying request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream request ID accepted as-is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Middleware that ensures every request has a unique request ID.
///
/// Upstream IDs that are empty or implausibly long are replaced.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .filter(|value| !value.is_empty() && value.len() <= MAX_REQUEST_ID_LEN)
        .cloned()
        .unwrap_or_else(new_request_id);

    if let Ok(id) = request_id.to_str() {
        Span::current().record("request_id", id);
        sentry::configure_scope(|scope| scope.set_tag("request_id", id));
    }

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(HeaderName::from_static(REQUEST_ID_HEADER), request_id);
    response
}

fn new_request_id() -> HeaderValue {
    // A hyphenated UUID is always a valid header value
    HeaderValue::from_str(&Uuid::new_v4().to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
}
