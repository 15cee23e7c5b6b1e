//! # Task abstraction.
//!
//! A [`Task`] is a named factory of asynchronous, cancelable work. Every call to
//! [`Task::spawn`] creates a **fresh** future, which is what lets the pool defer
//! starting a task until a slot frees up and lets retry decorators run it again.
//!
//! The common handle type is [`TaskRef`], an `Arc<dyn Task<T, E>>` suitable for sharing
//! across the runtime.
//!
//! A task receives a [`CancellationToken`] and should check it to stop cooperatively
//! when its result is no longer wanted (a pool aborting, a deadline firing).

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

/// Boxed future returned by [`Task::spawn`].
pub type BoxTaskFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'static>>;

/// Shared handle to a task object.
pub type TaskRef<T, E> = Arc<dyn Task<T, E>>;

/// # Asynchronous, cancelable unit of work producing `Result<T, E>`.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use taskweave::{BoxTaskFuture, Task, TaskError};
///
/// struct Ping;
///
/// impl Task<&'static str, TaskError> for Ping {
///     fn name(&self) -> &str { "ping" }
///
///     fn spawn(&self, ctx: CancellationToken) -> BoxTaskFuture<&'static str, TaskError> {
///         Box::pin(async move {
///             if ctx.is_cancelled() {
///                 return Err(TaskError::Canceled);
///             }
///             Ok("pong")
///         })
///     }
/// }
/// ```
pub trait Task<T, E>: Send + Sync + 'static {
    /// Returns a stable, human-readable task name.
    fn name(&self) -> &str;

    /// Creates a new future that performs one execution of the task.
    ///
    /// Implementations should watch `ctx` and exit quickly once it is cancelled.
    fn spawn(&self, ctx: CancellationToken) -> BoxTaskFuture<T, E>;
}
