//! HTTP middleware stack for the storefront API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, binary only)
//! 2. CORS (browser frontend on another origin, credentials allowed)
//! 3. `TraceLayer` (request span with `request_id` field)
//! 4. Request ID (record, tag, echo `x-request-id`)
//! 5. Security headers
//!
//! The cart cookie is handled per route by the [`CartSession`] extractor.

pub mod request_id;
pub mod security_headers;
pub mod session;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::{CART_COOKIE_NAME, CartSession, CartToken, cart_cookie};
