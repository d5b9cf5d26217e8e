//! `stockbook-products` — the product stock store.
//!
//! Holds the denormalized "current state" side of the system: one row per
//! product carrying its live stock level. The ledger explains how the
//! stock got there; this crate guards how it changes (compare-and-swap).

pub mod in_memory;
pub mod product;
pub mod store;

pub use in_memory::InMemoryProductStore;
pub use product::Product;
pub use store::{ProductStore, StoreError};
