//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use roastery_core::Pagination;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::{Category, Product};
use crate::state::AppState;

/// Listing query parameters.
///
/// Page numbers are taken as signed integers so that `page=0` or
/// `per_page=-5` reach validation and get a descriptive 400.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    pub category: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Product listing response.
#[derive(Debug, Serialize)]
pub struct ProductsResponse<'a> {
    pub products: Vec<&'a Product>,
    pub categories: &'a [Category],
    pub total: usize,
    pub page: u32,
    pub per_page: u32,
}

/// List products, optionally filtered by category.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    query: std::result::Result<Query<ProductsQuery>, QueryRejection>,
) -> Result<Response> {
    let Query(query) = query?;
    let pagination = Pagination::new(
        query.page.unwrap_or(i64::from(Pagination::DEFAULT_PAGE)),
        query.per_page.unwrap_or(i64::from(Pagination::DEFAULT_PER_PAGE)),
    )?;
    // `?category=` is treated as no filter
    let category = query.category.as_deref().filter(|c| !c.is_empty());

    let catalog = state.catalog();
    let page = catalog.list_products(category, pagination)?;

    tracing::info!(
        returned = page.products.len(),
        total = page.total,
        "Listing products"
    );

    Ok(Json(ProductsResponse {
        products: page.products,
        categories: catalog.categories(),
        total: page.total,
        page: pagination.page(),
        per_page: pagination.per_page(),
    })
    .into_response())
}

/// Get a single product.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    state
        .catalog()
        .find_product(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| {
            tracing::info!(product_id = %id, "Product not found");
            AppError::NotFound("Product not found".to_string())
        })
}

/// List all categories in catalog order.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.catalog().categories().to_vec())
}
