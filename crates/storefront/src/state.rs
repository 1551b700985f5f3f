//! Application state shared across handlers.

use std::sync::Arc;

use roastery_core::CartId;

use crate::config::StorefrontConfig;
use crate::models::CartView;
use crate::projector;
use crate::store::{CartStore, Catalog};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and owns the single catalog and
/// cart store of the process. Tests build a fresh state per case.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    carts: CartStore,
}

impl AppState {
    /// Create a new application state with an empty cart store.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Fully loaded and validated catalog
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                carts: CartStore::new(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn carts(&self) -> &CartStore {
        &self.inner.carts
    }

    /// Project a cart against the current catalog.
    #[must_use]
    pub fn cart_view(&self, cart_id: CartId) -> CartView {
        let lines = self.carts().get_cart(cart_id);
        projector::project(self.catalog(), cart_id, &lines)
    }
}
