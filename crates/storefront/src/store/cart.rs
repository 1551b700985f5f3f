//! In-memory cart store keyed by session token.
//!
//! # Concurrency
//!
//! Carts live in a sharded [`DashMap`]. Every mutation runs while holding the
//! write lock of the cart's shard, so accumulate-on-add and delete-on-zero are
//! atomic with respect to concurrent requests for the same cart. Requests for
//! carts in other shards proceed without blocking.
//!
//! Carts are never expired or persisted; they live as long as the process.

use std::num::NonZeroU32;

use dashmap::DashMap;
use roastery_core::{CartId, ProductId, Quantity};
use thiserror::Error;

use crate::models::{Cart, CartLine};
use crate::store::Catalog;

/// Errors returned by cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("Product not found")]
    ProductNotFound(ProductId),

    #[error("Product is out of stock")]
    OutOfStock(ProductId),

    #[error("Item not in cart")]
    ItemNotInCart(ProductId),

    #[error("Quantity would exceed the maximum of {max} per item")]
    QuantityLimit { product: ProductId, max: u32 },
}

/// Result of resolving a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    /// The cart this session is bound to.
    pub id: CartId,
    /// Whether the cart was created by this call, meaning the client has to
    /// be sent the token.
    pub is_new: bool,
}

/// Session-keyed cart storage.
#[derive(Debug, Default)]
pub struct CartStore {
    carts: DashMap<CartId, Cart>,
}

impl CartStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a client-supplied token to a live cart, creating one if needed.
    ///
    /// A token that is missing, malformed, or unknown to this process results
    /// in a fresh cart with a newly minted token.
    pub fn ensure_session(&self, token: Option<&str>) -> Session {
        if let Some(id) = token.and_then(|t| t.parse::<CartId>().ok())
            && self.carts.contains_key(&id)
        {
            return Session { id, is_new: false };
        }

        let id = CartId::generate();
        let created_at = self.carts.entry(id).or_default().created_at();
        tracing::info!(cart_id = %id, %created_at, "Created new cart");

        Session { id, is_new: true }
    }

    /// Add `quantity` of a product to a cart.
    ///
    /// Adding a product that is already in the cart accumulates onto the
    /// existing quantity. Returns the resulting quantity.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` if the product is not in `catalog`,
    /// `OutOfStock` if it is not in stock, and `QuantityLimit` if the
    /// accumulated quantity would not fit. The cart is unchanged on error.
    pub fn add_item(
        &self,
        catalog: &Catalog,
        cart_id: CartId,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> Result<Quantity, CartError> {
        check_addable(catalog, product_id)?;
        self.accumulate(cart_id, product_id, quantity)
    }

    /// Add an item on behalf of a client token, creating the cart only once
    /// the product has been accepted.
    ///
    /// A request for an unknown or out-of-stock product therefore never
    /// allocates a cart.
    ///
    /// # Errors
    ///
    /// Same as [`CartStore::add_item`].
    pub fn add_item_for_token(
        &self,
        catalog: &Catalog,
        token: Option<&str>,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> Result<(Session, Quantity), CartError> {
        check_addable(catalog, product_id)?;
        let session = self.ensure_session(token);
        let total = self.accumulate(session.id, product_id, quantity)?;
        Ok((session, total))
    }

    fn accumulate(
        &self,
        cart_id: CartId,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> Result<Quantity, CartError> {
        let total = self
            .carts
            .entry(cart_id)
            .or_default()
            .add(product_id, quantity)
            .ok_or_else(|| CartError::QuantityLimit {
                product: product_id.clone(),
                max: u32::MAX,
            })?;

        tracing::debug!(%cart_id, %product_id, %quantity, %total, "Added item to cart");
        Ok(total)
    }

    /// Overwrite the quantity of a product already in the cart.
    ///
    /// A quantity of zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotInCart` if the cart has no line for the product.
    pub fn set_item_quantity(
        &self,
        cart_id: CartId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), CartError> {
        let mut cart = self
            .carts
            .get_mut(&cart_id)
            .ok_or_else(|| CartError::ItemNotInCart(product_id.clone()))?;

        let found = match NonZeroU32::new(quantity) {
            Some(quantity) => cart.set(product_id, Quantity::from(quantity)),
            None => cart.remove(product_id),
        };
        if !found {
            return Err(CartError::ItemNotInCart(product_id.clone()));
        }

        tracing::debug!(%cart_id, %product_id, quantity, "Updated cart item");
        Ok(())
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotInCart` if the cart has no line for the product.
    pub fn remove_item(&self, cart_id: CartId, product_id: &ProductId) -> Result<(), CartError> {
        let removed = self
            .carts
            .get_mut(&cart_id)
            .is_some_and(|mut cart| cart.remove(product_id));
        if !removed {
            return Err(CartError::ItemNotInCart(product_id.clone()));
        }

        tracing::debug!(%cart_id, %product_id, "Removed cart item");
        Ok(())
    }

    /// Snapshot of a cart's lines, in insertion order.
    ///
    /// An unknown cart reads as empty.
    #[must_use]
    pub fn get_cart(&self, cart_id: CartId) -> Vec<CartLine> {
        self.carts
            .get(&cart_id)
            .map(|cart| cart.lines().to_vec())
            .unwrap_or_default()
    }

    /// Number of carts held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.carts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.carts.is_empty()
    }
}

fn check_addable(catalog: &Catalog, product_id: &ProductId) -> Result<(), CartError> {
    let product = catalog
        .find_product(product_id.as_str())
        .ok_or_else(|| CartError::ProductNotFound(product_id.clone()))?;
    if !product.in_stock {
        return Err(CartError::OutOfStock(product_id.clone()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::catalog::tests::sample_catalog;

    fn qty(n: i64) -> Quantity {
        Quantity::new(n).unwrap()
    }

    fn pid(id: &str) -> ProductId {
        ProductId::new(id)
    }

    #[test]
    fn test_ensure_session_creates_then_reuses() {
        let store = CartStore::new();

        let first = store.ensure_session(None);
        assert!(first.is_new);
        assert_eq!(store.len(), 1);

        let token = first.id.to_string();
        let again = store.ensure_session(Some(&token));
        assert_eq!(again, Session { id: first.id, is_new: false });
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_ensure_session_replaces_unknown_or_malformed_token() {
        let store = CartStore::new();

        let unknown = CartId::generate().to_string();
        let session = store.ensure_session(Some(&unknown));
        assert!(session.is_new);
        assert_ne!(session.id.to_string(), unknown);

        let session = store.ensure_session(Some("garbage"));
        assert!(session.is_new);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_add_accumulates() {
        let catalog = sample_catalog();
        let store = CartStore::new();
        let cart = store.ensure_session(None).id;

        store.add_item(&catalog, cart, &pid("1"), qty(2)).unwrap();
        let total = store.add_item(&catalog, cart, &pid("1"), qty(3)).unwrap();
        assert_eq!(total, qty(5));

        let lines = store.get_cart(cart);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, qty(5));
    }

    #[test]
    fn test_add_unknown_product() {
        let catalog = sample_catalog();
        let store = CartStore::new();
        let cart = store.ensure_session(None).id;

        let err = store.add_item(&catalog, cart, &pid("99"), qty(1));
        assert_eq!(err, Err(CartError::ProductNotFound(pid("99"))));
        assert!(store.get_cart(cart).is_empty());
    }

    #[test]
    fn test_add_out_of_stock_regardless_of_quantity() {
        let catalog = sample_catalog();
        let store = CartStore::new();
        let cart = store.ensure_session(None).id;

        for n in [1, 2, 1_000] {
            let err = store.add_item(&catalog, cart, &pid("3"), qty(n));
            assert_eq!(err, Err(CartError::OutOfStock(pid("3"))));
        }
        assert!(store.get_cart(cart).is_empty());
    }

    #[test]
    fn test_add_past_quantity_limit_is_rejected() {
        let catalog = sample_catalog();
        let store = CartStore::new();
        let cart = store.ensure_session(None).id;
        let max = qty(i64::from(u32::MAX));

        store.add_item(&catalog, cart, &pid("1"), max).unwrap();
        assert_eq!(
            store.add_item(&catalog, cart, &pid("1"), qty(1)),
            Err(CartError::QuantityLimit {
                product: pid("1"),
                max: u32::MAX,
            })
        );
        assert_eq!(store.get_cart(cart)[0].quantity, max);
    }

    #[test]
    fn test_add_for_token_creates_cart_only_on_success() {
        let catalog = sample_catalog();
        let store = CartStore::new();

        assert_eq!(
            store.add_item_for_token(&catalog, None, &pid("99"), qty(1)),
            Err(CartError::ProductNotFound(pid("99")))
        );
        assert_eq!(
            store.add_item_for_token(&catalog, Some("garbage"), &pid("3"), qty(1)),
            Err(CartError::OutOfStock(pid("3")))
        );
        assert!(store.is_empty());

        let (session, total) = store
            .add_item_for_token(&catalog, None, &pid("1"), qty(2))
            .unwrap();
        assert!(session.is_new);
        assert_eq!(total, qty(2));
        assert_eq!(store.len(), 1);

        let token = session.id.to_string();
        let (again, total) = store
            .add_item_for_token(&catalog, Some(&token), &pid("1"), qty(3))
            .unwrap();
        assert_eq!(again, Session { id: session.id, is_new: false });
        assert_eq!(total, qty(5));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_set_quantity_overwrites() {
        let catalog = sample_catalog();
        let store = CartStore::new();
        let cart = store.ensure_session(None).id;
        store.add_item(&catalog, cart, &pid("1"), qty(2)).unwrap();

        store.set_item_quantity(cart, &pid("1"), 7).unwrap();
        assert_eq!(store.get_cart(cart)[0].quantity, qty(7));
    }

    #[test]
    fn test_set_zero_removes_then_item_not_in_cart() {
        let catalog = sample_catalog();
        let store = CartStore::new();
        let cart = store.ensure_session(None).id;
        store.add_item(&catalog, cart, &pid("1"), qty(2)).unwrap();

        store.set_item_quantity(cart, &pid("1"), 0).unwrap();
        assert!(store.get_cart(cart).is_empty());

        assert_eq!(
            store.set_item_quantity(cart, &pid("1"), 1),
            Err(CartError::ItemNotInCart(pid("1")))
        );
        assert_eq!(
            store.remove_item(cart, &pid("1")),
            Err(CartError::ItemNotInCart(pid("1")))
        );
    }

    #[test]
    fn test_set_quantity_item_not_in_cart() {
        let store = CartStore::new();
        let cart = store.ensure_session(None).id;

        assert_eq!(
            store.set_item_quantity(cart, &pid("1"), 3),
            Err(CartError::ItemNotInCart(pid("1")))
        );
        // Zero on a missing line is still an error, not a silent no-op
        assert_eq!(
            store.set_item_quantity(cart, &pid("1"), 0),
            Err(CartError::ItemNotInCart(pid("1")))
        );
    }

    #[test]
    fn test_remove_item() {
        let catalog = sample_catalog();
        let store = CartStore::new();
        let cart = store.ensure_session(None).id;
        store.add_item(&catalog, cart, &pid("1"), qty(1)).unwrap();
        store.add_item(&catalog, cart, &pid("2"), qty(1)).unwrap();

        store.remove_item(cart, &pid("1")).unwrap();
        let lines = store.get_cart(cart);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product_id, pid("2"));
    }

    #[test]
    fn test_unknown_cart_reads_empty() {
        let store = CartStore::new();
        assert!(store.get_cart(CartId::generate()).is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_carts_are_isolated() {
        let catalog = sample_catalog();
        let store = CartStore::new();
        let a = store.ensure_session(None).id;
        let b = store.ensure_session(None).id;

        store.add_item(&catalog, a, &pid("1"), qty(1)).unwrap();
        assert!(store.get_cart(b).is_empty());
        assert_eq!(
            store.remove_item(b, &pid("1")),
            Err(CartError::ItemNotInCart(pid("1")))
        );
    }

    #[test]
    fn test_concurrent_adds_to_same_cart_are_not_lost() {
        let catalog = Arc::new(sample_catalog());
        let store = Arc::new(CartStore::new());
        let cart = store.ensure_session(None).id;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let catalog = Arc::clone(&catalog);
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        store.add_item(&catalog, cart, &pid("1"), qty(1)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get_cart(cart)[0].quantity, qty(800));
    }
}
