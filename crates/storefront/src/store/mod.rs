//! In-memory stores.
//!
//! - [`catalog`] - Immutable product/category catalog, loaded once at startup
//! - [`cart`] - Mutable per-session carts
//!
//! Both are plain owned objects. The application builds one of each at
//! startup and hands them to the router through [`crate::state::AppState`].

pub mod cart;
pub mod catalog;

pub use cart::{CartError, CartStore, Session};
pub use catalog::{Catalog, CatalogError, CatalogLoadError, ProductPage};
