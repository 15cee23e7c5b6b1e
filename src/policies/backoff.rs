//! # Backoff policy for retried tasks.
//!
//! [`BackoffPolicy`] controls how the wait between attempts grows after repeated failures.
//! It is parameterized by:
//! - [`BackoffPolicy::first`] the delay after the first failed attempt;
//! - [`BackoffPolicy::factor`] the multiplicative growth factor;
//! - [`BackoffPolicy::max`] the maximum delay cap.
//!
//! The delay after failed attempt `n` (1-based) is `first × factor^(n-1)`, clamped to `max`,
//! then jitter is applied. The base delay is derived from the attempt number alone, so jitter
//! output never feeds back into later delays.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use taskweave::{BackoffPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy {
//!     first: Duration::from_millis(100),
//!     max: Duration::from_secs(10),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//!
//! assert_eq!(backoff.delay_after(1), Duration::from_millis(100));
//! assert_eq!(backoff.delay_after(2), Duration::from_millis(200));
//! // 100ms × 2^10 = 102_400ms → capped at max=10s
//! assert_eq!(backoff.delay_after(11), Duration::from_secs(10));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Retry backoff policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Delay after the first failed attempt.
    pub first: Duration,
    /// Maximum delay cap.
    pub max: Duration,
    /// Multiplicative growth factor (`>= 1.0` recommended).
    pub factor: f64,
    /// Jitter policy to prevent synchronized retries.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Returns a policy with:
    /// - `first = 100ms`;
    /// - `factor = 2.0` (doubling);
    /// - `max = 30s`;
    /// - no jitter.
    fn default() -> Self {
        Self {
            first: Duration::from_millis(100),
            max: Duration::from_secs(30),
            factor: 2.0,
            jitter: JitterPolicy::None,
        }
    }
}

impl BackoffPolicy {
    /// Doubling delays starting at `base`, uncapped and without jitter.
    ///
    /// The delay after failed attempt `n` is exactly `base × 2^(n-1)`.
    pub fn exponential(base: Duration) -> Self {
        Self {
            first: base,
            max: Duration::MAX,
            factor: 2.0,
            jitter: JitterPolicy::None,
        }
    }

    /// The same delay after every failed attempt.
    pub fn constant(delay: Duration) -> Self {
        Self {
            first: delay,
            max: delay,
            factor: 1.0,
            jitter: JitterPolicy::None,
        }
    }

    /// Returns a copy with a different jitter policy.
    pub fn with_jitter(mut self, jitter: JitterPolicy) -> Self {
        self.jitter = jitter;
        self
    }

    /// Computes the wait after failed attempt number `attempt` (1-based).
    ///
    /// `attempt = 0` is treated as `1`.
    ///
    /// # Notes
    /// - `factor < 1.0` makes delays shrink (not typical).
    /// - `factor == 1.0` keeps the delay constant at `first` (up to `max`).
    /// - Non-finite or overflowing intermediate values clamp to `max`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let unclamped_secs = self.first.as_secs_f64() * self.factor.powi(exp);

        let base = if !unclamped_secs.is_finite() || unclamped_secs < 0.0 {
            self.max
        } else {
            Duration::try_from_secs_f64(unclamped_secs)
                .map_or(self.max, |d| d.min(self.max))
        };

        match self.jitter {
            JitterPolicy::Decorrelated => {
                self.jitter
                    .apply_decorrelated(self.first.min(self.max), base, self.max)
            }
            _ => self.jitter.apply(base),
        }
    }
}
