//! `stockbook-ledger` — the append-only movement ledger.
//!
//! Every stock change is recorded as an immutable [`Movement`]. The ledger
//! is the audit trail: movements are never updated (the one-way
//! `is_reverted` flip is the single exception) and never deleted.

pub mod in_memory;
pub mod movement;
pub mod query;
pub mod replay;
pub mod store;

pub use in_memory::InMemoryMovementLedger;
pub use movement::{Movement, MovementType, NewMovement};
pub use query::{MovementFilter, MovementPage, Pagination};
pub use store::MovementLedger;
