//! Products catalog module.
//!
//! This crate owns the product collection: the record type, the in-memory
//! store (identity assignment, lookup, filtering, patch merging) and the
//! service facade the transport layer talks to. No HTTP concerns live here.

pub mod product;
pub mod service;
pub mod store;

pub use product::Product;
pub use service::CatalogService;
pub use store::{InMemoryProductStore, ProductStore};
