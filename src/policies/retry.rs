//! # Retry policy.
//!
//! [`RetryPolicy`] decides **how many** attempts a task gets and, through its
//! [`BackoffPolicy`], **how long** to wait between them.
//!
//! ```text
//! attempt 1 ─► Err ─► sleep(backoff.delay_after(1)) ─► attempt 2 ─► Err ─► ... ─► attempt N ─► Err ─► give up
//!                                                                   └─► Ok ─► done (no further delay)
//! ```
//!
//! `max_attempts` counts every attempt including the first one: `1` means a single
//! attempt and no retry. `0` is treated as `1`.

use std::time::Duration;

use crate::policies::BackoffPolicy;

/// How many attempts a task gets and how long to wait between them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay schedule between attempts.
    pub backoff: BackoffPolicy,
}

impl Default for RetryPolicy {
    /// A single attempt (no retry).
    fn default() -> Self {
        Self::never()
    }
}

impl RetryPolicy {
    /// Creates a policy with explicit parameters.
    pub fn new(max_attempts: u32, backoff: BackoffPolicy) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// One attempt, no retry.
    pub fn never() -> Self {
        Self::new(1, BackoffPolicy::default())
    }

    /// Up to `max_attempts` attempts waiting `base × 2^(attempt-1)` after each failure.
    pub fn exponential(max_attempts: u32, base: Duration) -> Self {
        Self::new(max_attempts, BackoffPolicy::exponential(base))
    }

    /// Effective attempt budget (at least one).
    #[inline]
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// True when a task under this policy may run more than once.
    #[inline]
    pub fn retries(&self) -> bool {
        self.attempts() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_attempts_means_one() {
        let policy = RetryPolicy::new(0, BackoffPolicy::default());
        assert_eq!(policy.attempts(), 1);
        assert!(!policy.retries());
        assert_eq!(RetryPolicy::default(), RetryPolicy::never());
    }

    #[test]
    fn exponential_uses_base_delay() {
        let policy = RetryPolicy::exponential(3, Duration::from_millis(10));
        assert!(policy.retries());
        assert_eq!(policy.backoff.delay_after(1), Duration::from_millis(10));
        assert_eq!(policy.backoff.delay_after(2), Duration::from_millis(20));
    }
}
