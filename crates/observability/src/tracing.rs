//! Tracing/logging initialization.
//!
//! The mutation protocol logs its decision points (CAS retries, budget
//! exhaustion, reconciliation alerts); this module turns those events
//! into JSON lines on stderr.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// The filter comes from `RUST_LOG` when set and defaults to `info`;
/// retry chatter in the engine sits at `debug`. Safe to call multiple
/// times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
