//! # Pool configuration.
//!
//! [`Config`] defines how a [`Pool`](crate::Pool) runs its tasks: concurrency limit,
//! failure policy, event bus capacity, and the defaults inherited by
//! [`TaskSpec::with_defaults`](crate::TaskSpec::with_defaults).
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use taskweave::{Config, FailurePolicy, RetryPolicy};
//!
//! let mut cfg = Config::default();
//! cfg.limit = 4;
//! cfg.failure = FailurePolicy::Drain;
//! cfg.timeout = Duration::from_secs(5);
//! cfg.retry = RetryPolicy::exponential(3, Duration::from_millis(100));
//!
//! assert_eq!(cfg.concurrency_limit(), Some(4));
//! assert_eq!(cfg.default_timeout(), Some(Duration::from_secs(5)));
//! ```

use std::time::Duration;

use crate::policies::{FailurePolicy, RetryPolicy};

/// Configuration for a [`Pool`](crate::Pool).
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum number of tasks running at once (0 = unlimited).
    pub limit: usize,
    /// What a failing task does to the rest of the run.
    pub failure: FailurePolicy,
    /// Capacity of the event bus channel.
    pub bus_capacity: usize,
    /// Default per-attempt timeout for task specs (0 = no timeout).
    pub timeout: Duration,
    /// Default retry policy for task specs.
    pub retry: RetryPolicy,
}

impl Config {
    /// Creates the default configuration with a concurrency limit.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Returns the concurrency limit as an `Option`.
    ///
    /// - `None` → unlimited
    /// - `Some(n)` → at most `n` tasks in flight
    #[inline]
    pub fn concurrency_limit(&self) -> Option<usize> {
        if self.limit == 0 {
            None
        } else {
            Some(self.limit)
        }
    }

    /// Returns the default per-attempt timeout as an `Option`.
    #[inline]
    pub fn default_timeout(&self) -> Option<Duration> {
        if self.timeout == Duration::ZERO {
            None
        } else {
            Some(self.timeout)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Provides a default configuration:
    /// - `limit = 0` (unlimited)
    /// - `failure = FailurePolicy::FailFast`
    /// - `bus_capacity = 1024`
    /// - `timeout = 0s` (no timeout)
    /// - `retry = RetryPolicy::never()`
    fn default() -> Self {
        Self {
            limit: 0,
            failure: FailurePolicy::default(),
            bus_capacity: 1024,
            timeout: Duration::ZERO,
            retry: RetryPolicy::never(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sentinels_mean_unset() {
        let cfg = Config {
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.concurrency_limit(), None);
        assert_eq!(cfg.default_timeout(), None);
        assert_eq!(cfg.bus_capacity_clamped(), 1);
        assert_eq!(cfg.failure, FailurePolicy::FailFast);
        assert!(!cfg.retry.retries());
    }

    #[test]
    fn with_limit_keeps_other_defaults() {
        let cfg = Config::with_limit(3);
        assert_eq!(cfg.concurrency_limit(), Some(3));
        assert_eq!(cfg.bus_capacity, 1024);
    }
}
