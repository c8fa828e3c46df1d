use std::time::Duration;

use crate::error::{ErrorKind, FetchError};

/// Bounded fixed-delay retry. No backoff growth: the spacing between
/// attempts is always `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum additional attempts after the first one.
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Whether a failed attempt should be retried. `attempts_used` counts
    /// retries already performed for this logical call.
    ///
    /// Auth failures are never retried: retrying will not fix an expired
    /// or invalid credential.
    pub fn should_retry(&self, error: &FetchError, attempts_used: u32) -> bool {
        if error.kind == ErrorKind::Auth {
            return false;
        }
        attempts_used < self.max_retries
    }
}
