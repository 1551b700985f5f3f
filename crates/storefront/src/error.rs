//! Unified error handling for the API.
//!
//! Provides a unified `AppError` type that every route handler returns.
//! Errors are translated once, here, into a status code and a JSON body of
//! the form `{"detail": "<message>"}`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use roastery_core::{PaginationError, QuantityError};
use serde_json::json;
use thiserror::Error;

use crate::store::{CartError, CatalogError};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid request input (pagination, quantity, category, malformed body).
    #[error("{0}")]
    Validation(String),

    /// Unknown product or cart item.
    #[error("{0}")]
    NotFound(String),

    /// Request is well formed but conflicts with current state (e.g. an
    /// out-of-stock product).
    #[error("{0}")]
    Conflict(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            // Out-of-stock is reported as a client error rather than 409
            Self::Validation(_) | Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::ProductNotFound(_) | CartError::ItemNotInCart(_) => {
                Self::NotFound(err.to_string())
            }
            CartError::OutOfStock(_) => Self::Conflict(err.to_string()),
            CartError::QuantityLimit { .. } => Self::Validation(err.to_string()),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<PaginationError> for AppError {
    fn from(err: PaginationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<QuantityError> for AppError {
    fn from(err: QuantityError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for cart actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
