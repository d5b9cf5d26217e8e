//! Movement model: the ledger's unit of record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{LedgerError, MovementId, OrderId, ProductId, UserId};

/// Kind of stock change a movement records.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovementType {
    StockIn,
    StockOut,
    AdjustmentAdd,
    AdjustmentRemove,
    Sale,
}

impl MovementType {
    /// Wire/display name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StockIn => "stock-in",
            Self::StockOut => "stock-out",
            Self::AdjustmentAdd => "adjustment-add",
            Self::AdjustmentRemove => "adjustment-remove",
            Self::Sale => "sale",
        }
    }

    /// Whether movements of this type may be reverted.
    ///
    /// `stock-out` and `sale` flow from the order lifecycle; reverting them
    /// from the ledger side would desynchronize the two systems.
    pub fn is_revertible(self) -> bool {
        !matches!(self, Self::StockOut | Self::Sale)
    }

    /// Sign convention of the `quantity` field: +1 for inbound types,
    /// -1 for outbound ones.
    pub fn sign(self) -> i64 {
        match self {
            Self::StockIn | Self::AdjustmentAdd => 1,
            Self::StockOut | Self::AdjustmentRemove | Self::Sale => -1,
        }
    }
}

impl core::fmt::Display for MovementType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A movement ready to be appended (not yet assigned an id or sequence).
///
/// The ledger assigns the `MovementId` and the per-product sequence number
/// during append. `product_name` and `user_name` are point-in-time
/// snapshots: later renames must not rewrite the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMovement {
    pub product_id: ProductId,
    /// Product display name at the time of the movement (snapshot).
    pub product_name: String,
    pub movement_type: MovementType,
    /// Signed stock delta: positive for `stock-in`/`adjustment-add`,
    /// negative for `stock-out`/`adjustment-remove`/`sale`. Reversals are
    /// the one exception: always `adjustment-remove` carrying the
    /// original's quantity negated, whichever direction that is.
    pub quantity: i64,
    /// Product stock immediately before this movement was applied.
    pub stock_before: i64,
    /// Product stock immediately after: `stock_before + quantity`.
    pub stock_after: i64,
    pub movement_date: DateTime<Utc>,
    pub user_id: UserId,
    /// Actor display name at the time of the movement (snapshot).
    pub user_name: String,
    pub batch_expiry_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub related_order_id: Option<OrderId>,
    /// Set on compensating movements: the movement this one reverts.
    pub reverted_from_id: Option<MovementId>,
}

impl NewMovement {
    /// Append-time validation: no zero-quantity movements, and the
    /// before/after/quantity arithmetic must hold (without wrapping).
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.quantity == 0 {
            return Err(LedgerError::validation(
                "movement quantity must not be zero",
            ));
        }
        let expected_after = self.stock_before.checked_add(self.quantity).ok_or_else(|| {
            LedgerError::validation(format!(
                "movement arithmetic overflows: {} + {}",
                self.stock_before, self.quantity
            ))
        })?;
        if self.stock_after != expected_after {
            return Err(LedgerError::validation(format!(
                "movement arithmetic mismatch: {} + {} != {}",
                self.stock_before, self.quantity, self.stock_after
            )));
        }
        Ok(())
    }
}

/// A stored ledger movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub id: MovementId,
    /// 1-based position in the product's history, assigned at append.
    pub sequence: u64,
    pub product_id: ProductId,
    pub product_name: String,
    pub movement_type: MovementType,
    pub quantity: i64,
    pub stock_before: i64,
    pub stock_after: i64,
    pub movement_date: DateTime<Utc>,
    pub user_id: UserId,
    pub user_name: String,
    pub batch_expiry_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub related_order_id: Option<OrderId>,
    /// One-way flag: set once a compensating movement for this one exists.
    pub is_reverted: bool,
    pub reverted_from_id: Option<MovementId>,
}

impl Movement {
    /// Whether this movement can be reverted right now.
    ///
    /// Derived on read, never stored: the type must be revertible and the
    /// movement must not already have been reverted.
    pub fn is_revertible(&self) -> bool {
        self.movement_type.is_revertible() && !self.is_reverted
    }
}
