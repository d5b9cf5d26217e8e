//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Retry budgets for the stock mutation protocol.
///
/// Retries are immediate, each with a fresh product read; there is no
/// backoff delay and no lock held between attempts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Attempts for the read-check-CAS cycle (0 is treated as 1).
    pub max_write_attempts: u32,
    /// Attempts for the ledger append after the product write (0 is treated as 1).
    pub max_append_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_write_attempts: 3,
            max_append_attempts: 3,
        }
    }
}

impl RetryPolicy {
    /// Create a policy that gives every step exactly one attempt.
    pub fn no_retry() -> Self {
        Self {
            max_write_attempts: 1,
            max_append_attempts: 1,
        }
    }

    pub fn new(max_write_attempts: u32, max_append_attempts: u32) -> Self {
        Self {
            max_write_attempts,
            max_append_attempts,
        }
    }

    /// Read the policy from the environment, falling back to defaults.
    ///
    /// `STOCKBOOK_MAX_WRITE_ATTEMPTS` / `STOCKBOOK_MAX_APPEND_ATTEMPTS`;
    /// unparsable values fall back rather than fail.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_write_attempts: env_u32("STOCKBOOK_MAX_WRITE_ATTEMPTS", defaults.max_write_attempts),
            max_append_attempts: env_u32(
                "STOCKBOOK_MAX_APPEND_ATTEMPTS",
                defaults.max_append_attempts,
            ),
        }
    }
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .unwrap_or(default)
}
