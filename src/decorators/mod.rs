//! # Decorators that change how a single task runs.
//!
//! | Decorator | Future-level | Task-level |
//! |---|---|---|
//! | deadline | [`with_timeout`] | [`TimeoutTask`] |
//! | retry | [`retry_with_backoff`], [`Retry`] | [`RetryTask`] |
//! | circuit breaker | [`CircuitBreaker::call`] | - |
//!
//! Task-level decorators wrap a [`TaskRef`](crate::TaskRef) and return another one,
//! so they compose with each other and with [`Pool`](crate::Pool):
//!
//! ```text
//! RetryTask ─► TimeoutTask ─► user task
//!  (outer)       (per attempt)
//! ```

mod circuit_breaker;
mod retry;
mod timeout;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerPolicy, CircuitState};
pub use retry::{Retry, RetryTask, retry_with_backoff};
pub use timeout::{TimeoutTask, with_timeout};
