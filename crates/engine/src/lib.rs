//! `stockbook-engine` — the stock mutation protocol.
//!
//! The only path by which product stock changes. Every mutation is a
//! two-write sequence (CAS the product row, then append the ledger
//! movement) orchestrated by [`StockEngine`]; the alerting projection and
//! reconciliation reads live alongside it.

pub mod alerts;
pub mod config;
pub mod protocol;


pub use alerts::{AlertsProjection, InventoryAlerts, DEFAULT_ALERT_LIMIT};
pub use config::RetryPolicy;
pub use protocol::{AdjustmentInput, Reconciliation, StockEngine, StockInInput};
