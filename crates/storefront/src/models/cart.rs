//! Cart entity and its projected view.

use chrono::{DateTime, Utc};
use roastery_core::{CartId, Price, ProductId, Quantity};
use serde::Serialize;

use super::Product;

/// One product entry in a stored cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: Quantity,
}

/// A per-session shopping cart.
///
/// Lines keep the order in which products were first added. A product
/// appears at most once, and every stored quantity is positive.
#[derive(Debug, Clone)]
pub struct Cart {
    lines: Vec<CartLine>,
    created_at: DateTime<Utc>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Current quantity of a product, if it is in the cart.
    #[cfg(test)]
    fn quantity_of(&self, product_id: &ProductId) -> Option<Quantity> {
        self.position(product_id)
            .and_then(|i| self.lines.get(i))
            .map(|line| line.quantity)
    }

    /// Add `quantity` of a product, accumulating onto an existing line.
    ///
    /// Returns the resulting quantity, or `None` if the sum does not fit a
    /// [`Quantity`]. The cart is unchanged in that case.
    pub fn add(&mut self, product_id: &ProductId, quantity: Quantity) -> Option<Quantity> {
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = line.quantity.checked_add(quantity)?;
            return Some(line.quantity);
        }
        self.lines.push(CartLine {
            product_id: product_id.clone(),
            quantity,
        });
        Some(quantity)
    }

    /// Overwrite the quantity of an existing line.
    ///
    /// Returns `false` if the product is not in the cart.
    pub fn set(&mut self, product_id: &ProductId, quantity: Quantity) -> bool {
        let Some(line) = self.line_mut(product_id) else {
            return false;
        };
        line.quantity = quantity;
        true
    }

    /// Delete a line.
    ///
    /// Returns `false` if the product is not in the cart.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let Some(index) = self.position(product_id) else {
            return false;
        };
        self.lines.remove(index);
        true
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| &line.product_id == product_id)
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| &line.product_id == product_id)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

/// A priced cart line in a [`CartView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub product: Product,
    pub quantity: Quantity,
    pub subtotal: Price,
}

/// Cart contents joined against current catalog prices.
///
/// Built fresh for every response and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub cart_id: CartId,
    pub items: Vec<LineItem>,
    pub total_items: u64,
    pub subtotal: Price,
}
