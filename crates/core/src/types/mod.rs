//! Core types for Roastery.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod pagination;
pub mod price;
pub mod quantity;

pub use id::*;
pub use pagination::{Pagination, PaginationError};
pub use price::{Price, PriceError};
pub use quantity::{Quantity, QuantityError};
