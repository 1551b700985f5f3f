//! Domain models for the storefront.
//!
//! - [`catalog`] - Immutable products and categories loaded at startup
//! - [`cart`] - Per-session carts and the derived [`CartView`]

pub mod cart;
pub mod catalog;

pub use cart::{Cart, CartLine, CartView, LineItem};
pub use catalog::{Category, Product};
