//! Catalog records.
//!
//! Field names match the catalog JSON documents and the API responses.

use roastery_core::{CategoryId, Price, ProductId};
use serde::{Deserialize, Serialize};

/// A coffee product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: CategoryId,
    pub roast_level: String,
    pub origin: String,
    pub image_url: String,
    pub in_stock: bool,
    pub weight: String,
    pub flavor_notes: Vec<String>,
    pub processing_method: String,
}

/// A product category.
///
/// `display_order` is passed through to clients; the catalog keeps
/// categories in load order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub display_order: i32,
    pub image_url: String,
}
