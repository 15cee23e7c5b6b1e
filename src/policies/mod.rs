//! Retry, backoff and failure policies.
//!
//! This module groups the knobs that control **whether** a task is retried, **how long**
//! to wait between attempts, and **what a pool does** when a task fails.
//!
//! ## Contents
//! - [`RetryPolicy`]   how many attempts a task gets
//! - [`BackoffPolicy`] how retry delays evolve (first / factor / max + jitter)
//! - [`JitterPolicy`]  randomization strategy to avoid synchronized retries
//! - [`FailurePolicy`] fail-fast vs drain for bounded pools
//!
//! ## Quick wiring
//! ```text
//! TaskSpec { retry: RetryPolicy, timeout: Option<Duration> }
//!      └─► RetryTask uses:
//!           - retry.attempts() to decide continue/give up
//!           - retry.backoff.delay_after(attempt) to schedule the next attempt
//! Config { failure: FailurePolicy, .. }
//!      └─► Pool decides fail-fast vs drain
//! ```
//!
//! ## Defaults
//! - `RetryPolicy::default()` → one attempt, no retry.
//! - `BackoffPolicy::default()` → first=100ms, factor=2.0, max=30s, jitter=None.
//! - `FailurePolicy::FailFast`.

mod backoff;
mod failure;
mod jitter;
mod retry;

pub use backoff::BackoffPolicy;
pub use failure::FailurePolicy;
pub use jitter::JitterPolicy;
pub use retry::RetryPolicy;
