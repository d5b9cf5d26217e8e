//! The ledger storage abstraction.

use std::sync::Arc;

use stockbook_core::{LedgerError, MovementId, ProductId};

use crate::movement::{Movement, NewMovement};
use crate::query::{MovementFilter, MovementPage, Pagination};

/// Append-only store of stock movements.
///
/// The ledger holds one logical stream per product. Within a stream,
/// movements carry 1-based, monotonically increasing sequence numbers
/// assigned at append, so each product's history reads as a chain:
/// every `stock_before` equals the previous movement's `stock_after`.
///
/// ## Append semantics
///
/// `append()` validates the movement (non-zero quantity, consistent
/// before/after arithmetic), assigns a fresh [`MovementId`] plus the next
/// sequence number for the product, and persists it. There is no update
/// and no delete anywhere on this trait: the single permitted mutation is
/// the one-way `is_reverted` flip via `mark_reverted()`.
///
/// ## Read semantics
///
/// `find()` filters across all products and orders newest-first
/// (`movement_date` descending, sequence descending as tiebreak).
/// `history()` returns one product's stream in insertion order, which is
/// what replay and chain verification consume.
///
/// ## Implementation requirements
///
/// - Assign sequence numbers monotonically per product (no gaps).
/// - Never reorder or rewrite stored movements.
/// - Make `mark_reverted` fail on a second flip, never overwrite silently.
pub trait MovementLedger: Send + Sync {
    /// Validate and persist a movement, assigning its id and sequence.
    fn append(&self, movement: NewMovement) -> Result<Movement, LedgerError>;

    /// Load a single movement by id.
    fn get(&self, id: MovementId) -> Result<Movement, LedgerError>;

    /// Query movements with filters and pagination, newest first.
    fn find(
        &self,
        filter: &MovementFilter,
        pagination: Pagination,
    ) -> Result<MovementPage, LedgerError>;

    /// Flip `is_reverted` on a movement (one-way).
    ///
    /// Fails with `NotFound` if the movement does not exist and with
    /// `AlreadyReverted` if the flag is already set.
    fn mark_reverted(&self, id: MovementId) -> Result<Movement, LedgerError>;

    /// Full history of one product in insertion order.
    fn history(&self, product_id: ProductId) -> Result<Vec<Movement>, LedgerError>;
}

impl<S> MovementLedger for Arc<S>
where
    S: MovementLedger + ?Sized,
{
    fn append(&self, movement: NewMovement) -> Result<Movement, LedgerError> {
        (**self).append(movement)
    }

    fn get(&self, id: MovementId) -> Result<Movement, LedgerError> {
        (**self).get(id)
    }

    fn find(
        &self,
        filter: &MovementFilter,
        pagination: Pagination,
    ) -> Result<MovementPage, LedgerError> {
        (**self).find(filter, pagination)
    }

    fn mark_reverted(&self, id: MovementId) -> Result<Movement, LedgerError> {
        (**self).mark_reverted(id)
    }

    fn history(&self, product_id: ProductId) -> Result<Vec<Movement>, LedgerError> {
        (**self).history(product_id)
    }
}
