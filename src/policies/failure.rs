//! # Failure policy for bounded pools.
//!
//! [`FailurePolicy`] decides what a [`Pool`](crate::Pool) does when one of its tasks fails.
//!
//! ```text
//! FailFast  → first failure (by completion) cancels the run, aborts in-flight tasks,
//!             launches nothing more, and is returned immediately
//! Drain     → every task runs to completion; the first failure in input order is returned
//! ```
//!
//! [`Pool::run_settled`](crate::Pool::run_settled) ignores this policy: it always drains
//! and reports every outcome.

/// What a pool does when a task fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failure, matching [`all`](crate::all) (default).
    #[default]
    FailFast,
    /// Run everything, then report the first failure in input order.
    Drain,
}
