//! `stockbook-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no storage concerns).

pub mod actor;
pub mod error;
pub mod id;

pub use actor::Actor;
pub use error::{LedgerError, LedgerResult};
pub use id::{MovementId, OrderId, ProductId, UserId};
