//! Cart session cookie.
//!
//! The browser is correlated with its cart through the `cart_id` cookie,
//! whose value is the cart token itself. [`CartSession`] resolves the cookie
//! to a cart up front; when it has to mint a new cart it also emits the
//! `Set-Cookie` header on the response. [`CartToken`] only reads the cookie,
//! for handlers that must validate their input before a cart may be created.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{
        HeaderMap, HeaderValue,
        header::{COOKIE, SET_COOKIE},
        request::Parts,
    },
    response::{AppendHeaders, IntoResponse, Response},
};
use roastery_core::CartId;
use tower_sessions::cookie::{Cookie, SameSite, time::Duration};

use crate::state::AppState;
use crate::store::Session;

/// Cart cookie name.
pub const CART_COOKIE_NAME: &str = "cart_id";

/// Cart cookie lifetime in seconds (7 days).
const CART_COOKIE_MAX_AGE_SECONDS: i64 = 7 * 24 * 60 * 60;

/// The cart bound to the current request.
///
/// Extracting this always succeeds: a missing, malformed or unknown cookie
/// gets a fresh empty cart.
#[derive(Debug, Clone, Copy)]
pub struct CartSession {
    session: Session,
    secure: bool,
}

impl CartSession {
    /// Bind a resolved session to the cookie policy of `state`.
    #[must_use]
    pub fn new(session: Session, state: &AppState) -> Self {
        Self {
            session,
            secure: state.config().secure_cookies,
        }
    }

    /// The cart this request operates on.
    #[must_use]
    pub const fn cart_id(&self) -> CartId {
        self.session.id
    }

    /// Whether this request created the cart.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.session.is_new
    }

    /// Attach the `Set-Cookie` header if the cart is new.
    ///
    /// The cookie is sent on error responses too, so a cart minted by a
    /// failed read or update is not orphaned.
    pub fn respond(&self, response: impl IntoResponse) -> Response {
        let cookie = self
            .is_new()
            .then(|| cart_cookie(self.cart_id(), self.secure))
            .and_then(|cookie| HeaderValue::from_str(&cookie.to_string()).ok())
            .map(|value| AppendHeaders([(SET_COOKIE, value)]));

        (cookie, response).into_response()
    }
}

impl FromRequestParts<AppState> for CartSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = read_cart_token(&parts.headers);
        let session = state.carts().ensure_session(token.as_deref());

        Ok(Self::new(session, state))
    }
}

/// The raw cart token presented by the client, not yet resolved to a cart.
#[derive(Debug, Clone, Default)]
pub struct CartToken(Option<String>);

impl CartToken {
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CartToken {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(read_cart_token(&parts.headers)))
    }
}

/// Build the cart cookie for a token.
#[must_use]
pub fn cart_cookie(cart_id: CartId, secure: bool) -> Cookie<'static> {
    Cookie::build((CART_COOKIE_NAME, cart_id.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(CART_COOKIE_MAX_AGE_SECONDS))
        .secure(secure)
        .build()
}

/// Read the cart token from the request's `Cookie` headers.
fn read_cart_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == CART_COOKIE_NAME)
        .map(|cookie| cookie.value().to_owned())
}
