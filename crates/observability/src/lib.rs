//! `stockbook-observability` — shared tracing setup.
//!
//! The ledger crates emit through the `tracing` macros and stay agnostic
//! about where the events go; binaries and integration tests wire the
//! subscriber by calling [`init`] once at startup.

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, formatting).
pub mod tracing;
