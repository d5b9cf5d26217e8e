//! The stock mutation protocol (application-level orchestration).
//!
//! Every change to product stock flows through [`StockEngine`]. The engine
//! owns the two-write sequence across the product store and the movement
//! ledger, which have no shared transaction:
//!
//! ```text
//! Input
//!   ↓
//! 1. Validate input (pure, before any IO)
//!   ↓
//! 2. Read the product row (fresh per attempt)
//!   ↓
//! 3. Compute stock_before/stock_after; reject negative results
//!   ↓
//! 4. CAS-write the product stock (lost race → retry from 2)
//!   ↓
//! 5. Append the movement to the ledger (bounded retries)
//!   ↓
//! 6. (revert only) mark the original movement reverted
//! ```
//!
//! A failure at or before step 4 leaves both stores untouched. A failure
//! in step 5 after the product write leaves the product row ahead of the
//! ledger; the engine logs a reconciliation alert and surfaces the error
//! so the drift is loud instead of silent. `reconcile()` detects it.

use chrono::{DateTime, Utc};

use stockbook_core::{Actor, LedgerError, MovementId, ProductId};
use stockbook_ledger::{
    replay, Movement, MovementFilter, MovementLedger, MovementPage, MovementType, NewMovement,
    Pagination,
};
use stockbook_products::{Product, ProductStore, StoreError};

use crate::config::RetryPolicy;

/// Goods-received input for [`StockEngine::record_stock_in`].
#[derive(Debug, Clone)]
pub struct StockInInput {
    pub product_id: ProductId,
    /// Units received. Must be at least 1.
    pub quantity: i64,
    pub batch_expiry_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Manual-correction input for [`StockEngine::record_adjustment`].
#[derive(Debug, Clone)]
pub struct AdjustmentInput {
    pub product_id: ProductId,
    /// Signed stock delta. Must not be zero.
    pub quantity_change: i64,
    /// Why the correction happened. Required; folded into the notes.
    pub reason: String,
    pub notes: Option<String>,
}

/// Outcome of replaying a product's ledger against its stored stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub product_id: ProductId,
    /// Stock according to the product row.
    pub product_stock: i64,
    /// Stock according to the ledger (`None` for an empty history).
    pub ledger_stock: Option<i64>,
    pub movement_count: usize,
    /// Whether the history verifies as an unbroken chain.
    pub chain_intact: bool,
}

impl Reconciliation {
    /// The row and the trail agree. An empty trail cannot disagree with
    /// any stock level, so it counts as consistent.
    pub fn is_consistent(&self) -> bool {
        self.chain_intact
            && self
                .ledger_stock
                .map_or(true, |stock| stock == self.product_stock)
    }
}

/// Orchestrates stock mutations across the product store and the ledger.
///
/// Generic over the two stores so tests can inject in-memory or
/// fault-injecting implementations. The engine holds no mutable state of
/// its own; a request layer shares one instance behind an `Arc`.
#[derive(Debug)]
pub struct StockEngine<P, L> {
    products: P,
    ledger: L,
    policy: RetryPolicy,
}

impl<P, L> StockEngine<P, L> {
    pub fn new(products: P, ledger: L) -> Self {
        Self {
            products,
            ledger,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(products: P, ledger: L, policy: RetryPolicy) -> Self {
        Self {
            products,
            ledger,
            policy,
        }
    }
}

impl<P, L> StockEngine<P, L>
where
    P: ProductStore,
    L: MovementLedger,
{
    /// Record goods received: stock rises by `quantity`.
    pub fn record_stock_in(
        &self,
        actor: &Actor,
        input: StockInInput,
    ) -> Result<Movement, LedgerError> {
        if input.quantity < 1 {
            return Err(LedgerError::validation(
                "stock-in quantity must be at least 1",
            ));
        }

        self.run_mutation(input.product_id, input.quantity, |product, before, after| {
            NewMovement {
                product_id: product.id,
                product_name: product.name.clone(),
                movement_type: MovementType::StockIn,
                quantity: input.quantity,
                stock_before: before,
                stock_after: after,
                movement_date: Utc::now(),
                user_id: actor.user_id,
                user_name: actor.user_name.clone(),
                batch_expiry_date: input.batch_expiry_date,
                notes: input.notes.clone(),
                related_order_id: None,
                reverted_from_id: None,
            }
        })
    }

    /// Record a manual correction in either direction.
    ///
    /// The movement type follows the sign of `quantity_change`; the
    /// mandatory reason is folded into the stored notes as free text.
    pub fn record_adjustment(
        &self,
        actor: &Actor,
        input: AdjustmentInput,
    ) -> Result<Movement, LedgerError> {
        if input.quantity_change == 0 {
            return Err(LedgerError::validation(
                "adjustment quantity change must not be zero",
            ));
        }
        if input.reason.trim().is_empty() {
            return Err(LedgerError::validation("adjustment reason is required"));
        }

        let movement_type = if input.quantity_change > 0 {
            MovementType::AdjustmentAdd
        } else {
            MovementType::AdjustmentRemove
        };
        let notes = compose_adjustment_notes(&input.reason, input.notes.as_deref());

        self.run_mutation(
            input.product_id,
            input.quantity_change,
            |product, before, after| NewMovement {
                product_id: product.id,
                product_name: product.name.clone(),
                movement_type,
                quantity: input.quantity_change,
                stock_before: before,
                stock_after: after,
                movement_date: Utc::now(),
                user_id: actor.user_id,
                user_name: actor.user_name.clone(),
                batch_expiry_date: None,
                notes: Some(notes.clone()),
                related_order_id: None,
                reverted_from_id: None,
            },
        )
    }

    /// Append a compensating movement for `movement_id` and flag the
    /// original as reverted.
    ///
    /// The compensation is always an `adjustment-remove` carrying the
    /// original's quantity negated, and it snapshots the product name from
    /// the original movement: the trail records the world as it was.
    pub fn revert_movement(
        &self,
        actor: &Actor,
        movement_id: MovementId,
    ) -> Result<Movement, LedgerError> {
        let original = self.ledger.get(movement_id)?;

        if original.is_reverted {
            return Err(LedgerError::already_reverted(movement_id.to_string()));
        }
        if !original.movement_type.is_revertible() {
            return Err(LedgerError::non_revertible(original.movement_type.as_str()));
        }

        let compensation = self
            .run_mutation(original.product_id, -original.quantity, |_, before, after| {
                NewMovement {
                    product_id: original.product_id,
                    product_name: original.product_name.clone(),
                    movement_type: MovementType::AdjustmentRemove,
                    quantity: -original.quantity,
                    stock_before: before,
                    stock_after: after,
                    movement_date: Utc::now(),
                    user_id: actor.user_id,
                    user_name: actor.user_name.clone(),
                    batch_expiry_date: None,
                    notes: Some(format!("Reverted movement ID: {}", original.id)),
                    related_order_id: None,
                    reverted_from_id: Some(original.id),
                }
            })
            .map_err(|err| {
                if matches!(err, LedgerError::NotFound(_)) {
                    // Data-integrity fault: a movement outlived its product.
                    tracing::warn!(
                        "revert of movement {} found no product {}",
                        original.id,
                        original.product_id
                    );
                }
                err
            })?;

        // Flag last. A crash before this line leaves the original
        // revertible-looking with the compensation applied (detectable via
        // reconcile); the reverse order could flag without compensating.
        self.ledger.mark_reverted(original.id)?;

        Ok(compensation)
    }

    /// Query the movement history (newest first).
    pub fn movements(
        &self,
        filter: &MovementFilter,
        pagination: Pagination,
    ) -> Result<MovementPage, LedgerError> {
        self.ledger.find(filter, pagination)
    }

    /// Load a single movement.
    pub fn movement(&self, id: MovementId) -> Result<Movement, LedgerError> {
        self.ledger.get(id)
    }

    /// Replay a product's ledger history against its stored stock.
    ///
    /// This is the recovery read for the drift the two-write sequence can
    /// leave behind: a product row ahead of its ledger, or a broken chain.
    pub fn reconcile(&self, product_id: ProductId) -> Result<Reconciliation, LedgerError> {
        let product = self
            .products
            .get(product_id)
            .map_err(|err| map_store_error(err, product_id))?;
        let history = self.ledger.history(product_id)?;

        let report = Reconciliation {
            product_id,
            product_stock: product.stock,
            ledger_stock: replay::final_stock(&history),
            movement_count: history.len(),
            chain_intact: replay::verify_chain(&history).is_ok(),
        };

        if !report.is_consistent() {
            tracing::warn!(
                "product {product_id} is out of sync with its ledger: row has {}, replay yields {:?}",
                report.product_stock,
                report.ledger_stock
            );
        }

        Ok(report)
    }

    /// The shared read-check-write-append cycle (steps 2-5).
    ///
    /// Retries the whole cycle with a fresh read while the CAS write loses
    /// races or the product store is unavailable, up to the write budget.
    /// `build` constructs the movement once the stock write has landed.
    fn run_mutation(
        &self,
        product_id: ProductId,
        delta: i64,
        build: impl Fn(&Product, i64, i64) -> NewMovement,
    ) -> Result<Movement, LedgerError> {
        let attempts = self.policy.max_write_attempts.max(1);
        let mut last_unavailable: Option<String> = None;

        for attempt in 1..=attempts {
            let product = match self.products.get(product_id) {
                Ok(product) => product,
                Err(StoreError::Unavailable(msg)) => {
                    tracing::warn!("product read attempt {attempt} failed: {msg}");
                    last_unavailable = Some(msg);
                    continue;
                }
                Err(err) => return Err(map_store_error(err, product_id)),
            };

            let stock_before = product.stock;
            let stock_after = stock_before.checked_add(delta).ok_or_else(|| {
                LedgerError::validation(format!(
                    "stock change {delta} overflows the stock level {stock_before}"
                ))
            })?;
            if stock_after < 0 {
                return Err(LedgerError::negative_stock(stock_before, delta));
            }

            match self
                .products
                .update_stock(product_id, stock_before, stock_after)
            {
                Ok(updated) => {
                    let movement = build(&updated, stock_before, stock_after);
                    return self.append_after_write(movement, stock_before, stock_after);
                }
                Err(StoreError::Conflict { expected, actual }) => {
                    tracing::debug!(
                        "stock write for product {product_id} lost the race on attempt {attempt} (expected {expected}, found {actual})"
                    );
                    last_unavailable = None;
                }
                Err(StoreError::Unavailable(msg)) => {
                    tracing::warn!("stock write attempt {attempt} failed: {msg}");
                    last_unavailable = Some(msg);
                }
                Err(err) => return Err(map_store_error(err, product_id)),
            }
        }

        match last_unavailable {
            Some(msg) => Err(LedgerError::unavailable(msg)),
            None => Err(LedgerError::concurrent_modification(attempts)),
        }
    }

    /// Step 5: append the movement after the product write has landed.
    ///
    /// Only availability failures are retried; deterministic ones cannot
    /// improve. Any failure here means the product row is ahead of the
    /// ledger, so the alert fires before the error surfaces.
    fn append_after_write(
        &self,
        movement: NewMovement,
        stock_before: i64,
        stock_after: i64,
    ) -> Result<Movement, LedgerError> {
        let attempts = self.policy.max_append_attempts.max(1);
        let mut last_error = LedgerError::unavailable("ledger append not attempted");

        for attempt in 1..=attempts {
            match self.ledger.append(movement.clone()) {
                Ok(stored) => return Ok(stored),
                Err(LedgerError::StoreUnavailable(msg)) => {
                    tracing::warn!("ledger append attempt {attempt} failed: {msg}");
                    last_error = LedgerError::unavailable(msg);
                }
                Err(err) => {
                    last_error = err;
                    break;
                }
            }
        }

        tracing::error!(
            "reconciliation required: product {} stock moved {stock_before} -> {stock_after} but its {} movement failed to append: {last_error}",
            movement.product_id,
            movement.movement_type
        );
        Err(last_error)
    }
}

/// Map store errors that terminate the mutation cycle into the taxonomy.
fn map_store_error(err: StoreError, product_id: ProductId) -> LedgerError {
    match err {
        StoreError::NotFound => LedgerError::not_found(format!("product {product_id}")),
        StoreError::Conflict { .. } => LedgerError::concurrent_modification(1),
        StoreError::InvalidWrite(msg) => LedgerError::validation(msg),
        StoreError::Unavailable(msg) => LedgerError::unavailable(msg),
    }
}

/// Fold the adjustment reason into the notes field.
///
/// The reason leads; free-form notes follow when present:
/// `"Reason: Damaged stock. Dropped during unloading"`.
fn compose_adjustment_notes(reason: &str, notes: Option<&str>) -> String {
    let reason = reason.trim();
    match notes.map(str::trim) {
        Some(notes) if !notes.is_empty() => format!("Reason: {reason}. {notes}"),
        _ => format!("Reason: {reason}."),
    }
}
