//! Ledger error model.

use thiserror::Error;

/// Result type used across the ledger.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// The error taxonomy every ledger operation draws from.
///
/// Deterministic business failures and storage-layer failures share this
/// enum so callers match on a single type; `is_retriable` tells them apart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A value failed validation (malformed input, zero quantity, broken
    /// movement arithmetic).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced product or movement does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The mutation would drive stock below zero. Nothing was written.
    #[error("insufficient stock: current {current}, change {change}")]
    NegativeStock { current: i64, change: i64 },

    /// Revert was requested for a movement type that cannot be reverted.
    #[error("movement type '{0}' cannot be reverted")]
    NonRevertibleType(String),

    /// Revert was requested for a movement that is already reverted.
    #[error("movement {0} is already reverted")]
    AlreadyReverted(String),

    /// The optimistic stock write lost every attempt in its retry budget.
    #[error("concurrent modification: gave up after {attempts} attempts")]
    ConcurrentModification { attempts: u32 },

    /// The backing store could not serve the request.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn negative_stock(current: i64, change: i64) -> Self {
        Self::NegativeStock { current, change }
    }

    pub fn non_revertible(movement_type: impl Into<String>) -> Self {
        Self::NonRevertibleType(movement_type.into())
    }

    pub fn already_reverted(movement_id: impl Into<String>) -> Self {
        Self::AlreadyReverted(movement_id.into())
    }

    pub fn concurrent_modification(attempts: u32) -> Self {
        Self::ConcurrentModification { attempts }
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    /// Whether a caller may retry the operation as-is.
    ///
    /// True only for failures that originate in the storage layer; every
    /// other variant is deterministic and will fail again unchanged.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::ConcurrentModification { .. } | Self::StoreUnavailable(_)
        )
    }
}
