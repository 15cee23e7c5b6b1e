//! # Jitter policy for retry delays.
//!
//! [`JitterPolicy`] randomizes backoff delays so that many tasks failing together do
//! not all retry in the same instant.
//!
//! - [`JitterPolicy::None`]: exact delays
//! - [`JitterPolicy::Full`]: random delay in `[0, delay]`
//! - [`JitterPolicy::Equal`]: `delay/2 + random[0, delay/2]`
//! - [`JitterPolicy::Decorrelated`]: random delay in `[floor, prev × 3]`, capped

use rand::Rng;
use std::time::Duration;

/// Policy controlling randomization of retry delays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// Exact backoff delay. Predictable; good for tests and single callers.
    #[default]
    None,

    /// Random delay in `[0, delay]`. Spreads load the most.
    Full,

    /// `delay/2 + random[0, delay/2]`. Keeps about 75% of the delay on average.
    Equal,

    /// Random delay in `[floor, prev × 3]`, capped at the policy maximum.
    ///
    /// Needs extra context; see [`apply_decorrelated`](Self::apply_decorrelated).
    Decorrelated,
}

impl JitterPolicy {
    /// Applies jitter to the given delay.
    ///
    /// `Decorrelated` returns the input unchanged here; it needs
    /// [`apply_decorrelated`](Self::apply_decorrelated).
    pub fn apply(&self, delay: Duration) -> Duration {
        match self {
            JitterPolicy::None | JitterPolicy::Decorrelated => delay,
            JitterPolicy::Full => full_jitter(delay),
            JitterPolicy::Equal => equal_jitter(delay),
        }
    }

    /// Applies decorrelated jitter given a floor, the previous delay, and a cap.
    ///
    /// Falls back to [`apply`](Self::apply) on `prev` for the other variants.
    pub fn apply_decorrelated(&self, floor: Duration, prev: Duration, max: Duration) -> Duration {
        if !matches!(self, JitterPolicy::Decorrelated) {
            return self.apply(prev);
        }

        let floor_ms = millis(floor);
        let upper = millis(prev).saturating_mul(3).min(millis(max)).max(floor_ms);
        if floor_ms >= upper {
            return floor;
        }
        Duration::from_millis(rand::rng().random_range(floor_ms..=upper))
    }
}

fn millis(d: Duration) -> u64 {
    d.as_millis().min(u128::from(u64::MAX)) as u64
}

/// random[0, delay]
fn full_jitter(delay: Duration) -> Duration {
    let ms = millis(delay);
    if ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::rng().random_range(0..=ms))
}

/// delay/2 + random[0, delay/2]
fn equal_jitter(delay: Duration) -> Duration {
    let ms = millis(delay);
    let half = ms / 2;
    if half == 0 {
        return Duration::from_millis(ms);
    }
    Duration::from_millis(half + rand::rng().random_range(0..=half))
}
