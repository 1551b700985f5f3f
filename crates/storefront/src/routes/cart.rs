//! Cart route handlers.
//!
//! Reads, updates and removals resolve the cart through [`CartSession`].
//! Adding only reads the [`CartToken`] and creates the cart once the body and
//! product have been accepted, so a rejected add leaves no cart and sets no
//! cookie. Every handler performs at most one store mutation and answers
//! with a freshly projected [`CartView`]. Adding accumulates onto an
//! existing line; updating overwrites it.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use roastery_core::{ProductId, Quantity};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{CartSession, CartToken};
use crate::models::CartView;
use crate::state::AppState;

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Update-quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub quantity: i64,
}

/// Get the current cart, creating it if the session has none.
#[instrument(skip(state, session), fields(cart_id = %session.cart_id()))]
pub async fn show(State(state): State<AppState>, session: CartSession) -> Response {
    session.respond(Json(state.cart_view(session.cart_id())))
}

/// Add an item to the cart, creating the cart if the request is accepted.
#[instrument(skip(state, token, body), fields(cart_id = tracing::field::Empty))]
pub async fn add(
    State(state): State<AppState>,
    token: CartToken,
    body: std::result::Result<Json<AddToCartRequest>, JsonRejection>,
) -> Response {
    match add_item(&state, &token, body) {
        Ok((session, view)) => session.respond((StatusCode::CREATED, view)),
        Err(e) => e.into_response(),
    }
}

fn add_item(
    state: &AppState,
    token: &CartToken,
    body: std::result::Result<Json<AddToCartRequest>, JsonRejection>,
) -> Result<(CartSession, Json<CartView>)> {
    let Json(body) = body?;
    let quantity = Quantity::new(body.quantity)?;

    let (session, total) = state.carts().add_item_for_token(
        state.catalog(),
        token.as_deref(),
        &body.product_id,
        quantity,
    )?;
    let session = CartSession::new(session, state);
    tracing::Span::current().record("cart_id", tracing::field::display(session.cart_id()));

    add_breadcrumb(
        "cart",
        "Added item",
        Some(&[
            ("product_id", body.product_id.as_str()),
            ("quantity", total.to_string().as_str()),
        ]),
    );

    let view = Json(state.cart_view(session.cart_id()));
    Ok((session, view))
}

/// Set the quantity of an item already in the cart. Zero removes it.
#[instrument(skip(state, session, body), fields(cart_id = %session.cart_id()))]
pub async fn update(
    State(state): State<AppState>,
    session: CartSession,
    Path(product_id): Path<ProductId>,
    body: std::result::Result<Json<UpdateCartRequest>, JsonRejection>,
) -> Response {
    session.respond(update_item(&state, &session, &product_id, body))
}

fn update_item(
    state: &AppState,
    session: &CartSession,
    product_id: &ProductId,
    body: std::result::Result<Json<UpdateCartRequest>, JsonRejection>,
) -> Result<Json<CartView>> {
    let Json(body) = body?;
    let quantity = u32::try_from(body.quantity).map_err(|_| {
        AppError::Validation(format!(
            "quantity must be between 0 and {} (got {})",
            u32::MAX,
            body.quantity
        ))
    })?;

    state
        .carts()
        .set_item_quantity(session.cart_id(), product_id, quantity)?;

    add_breadcrumb(
        "cart",
        "Updated item quantity",
        Some(&[
            ("product_id", product_id.as_str()),
            ("quantity", quantity.to_string().as_str()),
        ]),
    );

    Ok(Json(state.cart_view(session.cart_id())))
}

/// Remove an item from the cart.
#[instrument(skip(state, session), fields(cart_id = %session.cart_id()))]
pub async fn remove(
    State(state): State<AppState>,
    session: CartSession,
    Path(product_id): Path<ProductId>,
) -> Response {
    let result = state
        .carts()
        .remove_item(session.cart_id(), &product_id)
        .map(|()| {
            add_breadcrumb(
                "cart",
                "Removed item",
                Some(&[("product_id", product_id.as_str())]),
            );
            Json(state.cart_view(session.cart_id()))
        })
        .map_err(AppError::from);

    session.respond(result)
}
