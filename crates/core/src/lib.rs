//! Roastery Core - Shared domain types.
//!
//! This crate provides the types shared by the storefront API and its tests:
//! - `storefront` - Catalog and cart HTTP API
//! - `integration-tests` - Black-box tests against the assembled router
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP, no
//! global state. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, quantities and pagination

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
