//! The product stock storage abstraction.

use std::sync::Arc;

use stockbook_core::ProductId;
use thiserror::Error;

use crate::product::Product;

/// Product store operation error.
///
/// These are **infrastructure errors** (missing rows, lost writes,
/// unreachable storage) as opposed to the ledger's business errors; the
/// engine maps them into the public taxonomy at its boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("product not found")]
    NotFound,

    /// The compare-and-swap guard failed: someone else wrote the stock
    /// between our read and our write.
    #[error("stock write conflict: expected {expected}, found {actual}")]
    Conflict { expected: i64, actual: i64 },

    /// The write itself is ill-formed (e.g. negative stock).
    #[error("invalid write: {0}")]
    InvalidWrite(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Keyed store of product rows with a guarded stock write.
///
/// ## Write semantics
///
/// `update_stock()` is a compare-and-swap: the write succeeds only if the
/// stored stock still equals `expected_stock`. This is the lost-update
/// protection for the read-compute-write cycle; callers re-read and retry
/// on `Conflict`. The stock value itself is the version: two writers that
/// both read stock `n` cannot both land, because the first to commit
/// changes the comparison target for the second.
///
/// `upsert()` exists for seeding and catalog-side writes; the ledger
/// engine itself never writes stock through anything but `update_stock`.
pub trait ProductStore: Send + Sync {
    /// Load a product row.
    fn get(&self, id: ProductId) -> Result<Product, StoreError>;

    /// Compare-and-swap the stock level, refreshing `updated_at`.
    ///
    /// Fails with `Conflict` if the stored stock no longer equals
    /// `expected_stock`, and with `InvalidWrite` if `new_stock` is
    /// negative. Returns the updated row.
    fn update_stock(
        &self,
        id: ProductId,
        expected_stock: i64,
        new_stock: i64,
    ) -> Result<Product, StoreError>;

    /// All product rows (feeds the alerting projection).
    fn list(&self) -> Result<Vec<Product>, StoreError>;

    /// Insert or replace a product row.
    fn upsert(&self, product: Product) -> Result<(), StoreError>;
}

impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    fn get(&self, id: ProductId) -> Result<Product, StoreError> {
        (**self).get(id)
    }

    fn update_stock(
        &self,
        id: ProductId,
        expected_stock: i64,
        new_stock: i64,
    ) -> Result<Product, StoreError> {
        (**self).update_stock(id, expected_stock, new_stock)
    }

    fn list(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list()
    }

    fn upsert(&self, product: Product) -> Result<(), StoreError> {
        (**self).upsert(product)
    }
}
