//! Cart projection: joins stored cart lines with current catalog prices.
//!
//! Totals are never stored. Every read re-prices the cart from the catalog,
//! so a [`CartView`] always reflects authoritative pricing.

use roastery_core::{CartId, Price};

use crate::models::{CartLine, CartView, LineItem};
use crate::store::Catalog;

/// Build the view of a cart.
///
/// Lines whose product is no longer in the catalog are skipped: they do not
/// appear in `items` and do not count toward `total_items` or `subtotal`.
/// The stored lines are left as they are.
#[must_use]
pub fn project(catalog: &Catalog, cart_id: CartId, lines: &[CartLine]) -> CartView {
    let items: Vec<LineItem> = lines
        .iter()
        .filter_map(|line| {
            let Some(product) = catalog.find_product(line.product_id.as_str()) else {
                tracing::debug!(%cart_id, product_id = %line.product_id, "Skipping stale cart line");
                return None;
            };
            Some(LineItem {
                product_id: line.product_id.clone(),
                product: product.clone(),
                quantity: line.quantity,
                subtotal: product.price * line.quantity,
            })
        })
        .collect();

    let total_items = items.iter().map(|item| u64::from(item.quantity.get())).sum();
    let subtotal = items.iter().map(|item| item.subtotal).sum::<Price>();

    CartView {
        cart_id,
        items,
        total_items,
        subtotal,
    }
}
