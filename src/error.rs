//! Error types used by the coordination layer and the built-in task error.
//!
//! - [`TaskError`]: a ready-made failure type for tasks (fail / timeout / circuit open / canceled).
//! - [`Elapsed`]: the distinct error produced by timeout decorators.
//! - [`CircuitOpen`]: the distinct error produced by an open [`CircuitBreaker`](crate::CircuitBreaker).
//! - [`AggregateError`]: every failure of an [`any`](crate::any) or [`fallback`](crate::fallback) call, in input order.
//! - [`FirstNError`]: a [`first_n`](crate::first_n) call that ran out of tasks before reaching its target.
//!
//! Decorators never force a concrete error type on the caller: they return the caller's `E`
//! and require `E: From<Elapsed>` or `E: From<CircuitOpen>` where they synthesize a failure.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// # Errors produced by task execution.
///
/// A convenient failure type for tasks that do not carry their own.
/// Converts from [`Elapsed`] and [`CircuitOpen`], so it works with every decorator.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Task execution exceeded its deadline.
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The deadline that was exceeded.
        timeout: Duration,
    },

    /// Task execution failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Call rejected by an open circuit breaker.
    #[error("circuit is open")]
    CircuitOpen,

    /// Task stopped because its cancellation token fired.
    #[error("context cancelled")]
    Canceled,
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskweave::TaskError;
    /// use std::time::Duration;
    ///
    /// let err = TaskError::Timeout { timeout: Duration::from_secs(1) };
    /// assert_eq!(err.as_label(), "task_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Timeout { .. } => "task_timeout",
            TaskError::Fail { .. } => "task_failed",
            TaskError::CircuitOpen => "circuit_open",
            TaskError::Canceled => "task_canceled",
        }
    }

    /// True when the failure came from a deadline rather than the task's own work.
    pub fn is_timeout(&self) -> bool {
        matches!(self, TaskError::Timeout { .. })
    }
}

/// Deadline exceeded before the wrapped task settled.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("timed out after {timeout:?}")]
pub struct Elapsed {
    /// The deadline that fired.
    pub timeout: Duration,
}

impl From<Elapsed> for TaskError {
    fn from(e: Elapsed) -> Self {
        TaskError::Timeout { timeout: e.timeout }
    }
}

/// Call rejected without running because the circuit is open.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("circuit is open")]
pub struct CircuitOpen;

impl From<CircuitOpen> for TaskError {
    fn from(_: CircuitOpen) -> Self {
        TaskError::CircuitOpen
    }
}

/// Every task failed; reasons are kept in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateError<E> {
    errors: Vec<E>,
}

impl<E> AggregateError<E> {
    /// Wraps the collected reasons.
    pub fn new(errors: Vec<E>) -> Self {
        Self { errors }
    }

    /// The collected reasons, one per input task.
    pub fn errors(&self) -> &[E] {
        &self.errors
    }

    /// Consumes the error and returns the reasons.
    pub fn into_errors(self) -> Vec<E> {
        self.errors
    }

    /// Number of collected reasons.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True when no task was supplied at all.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<E: fmt::Display> fmt::Display for AggregateError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "all {} tasks failed", self.errors.len())?;
        if let Some(first) = self.errors.first() {
            write!(f, "; first: {first}")?;
        }
        Ok(())
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for AggregateError<E> {}

/// Every task settled before `needed` of them succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstNError<T, E> {
    /// Number of successes the caller asked for.
    pub needed: usize,
    /// Successes that did arrive, in completion order.
    pub values: Vec<T>,
    /// Failures, in input order.
    pub errors: Vec<E>,
}

impl<T, E> fmt::Display for FirstNError<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "only {} of {} required tasks succeeded ({} failed)",
            self.values.len(),
            self.needed,
            self.errors.len()
        )
    }
}

impl<T: fmt::Debug, E: fmt::Debug> std::error::Error for FirstNError<T, E> {}
