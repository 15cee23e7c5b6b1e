//! # Task specification.
//!
//! Defines [`TaskSpec`]: a task bundled with the retry policy and per-attempt timeout
//! it should run under.
//!
//! A spec can be created:
//! - **Explicitly** with [`TaskSpec::new`] (full control)
//! - **From config** with [`TaskSpec::with_defaults`] (inherit defaults)
//! - **Fluently** with [`TaskSpecBuilder`](crate::TaskSpecBuilder)
//!
//! ## Rules
//! - A spec turns into a decorated [`TaskRef`] with [`TaskSpec::into_task`], or with
//!   [`Pool::task`](crate::Pool::task) to publish decorator events on the pool's bus.
//! - The timeout applies to each attempt; the retry policy wraps the timed attempts.
//!
//! ```text
//! into_task():
//!   retry.retries()?  ── no ──┐
//!        │ yes                │
//!   RetryTask( ───────────────┤
//!     timeout set? ── no ──► task
//!        │ yes
//!     TimeoutTask(task)
//!   )
//! ```

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::decorators::{RetryTask, TimeoutTask};
use crate::error::Elapsed;
use crate::events::Bus;
use crate::policies::RetryPolicy;
use crate::tasks::task::TaskRef;

/// Specification for running a task under a retry policy and timeout.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// use taskweave::{Config, RetryPolicy, TaskError, TaskFn, TaskRef, TaskSpec};
///
/// let fetch: TaskRef<u32, TaskError> = TaskFn::arc("fetch", |_ctx: CancellationToken| async move {
///     Ok::<_, TaskError>(200)
/// });
///
/// // Explicit configuration:
/// let spec = TaskSpec::new(
///     fetch.clone(),
///     RetryPolicy::exponential(3, Duration::from_millis(50)),
///     Some(Duration::from_secs(1)),
/// );
/// assert_eq!(spec.retry().attempts(), 3);
///
/// // Inherit from config (`timeout = 0s` is treated as `None`):
/// let spec = TaskSpec::with_defaults(fetch, &Config::default());
/// assert!(spec.timeout().is_none());
/// ```
pub struct TaskSpec<T, E> {
    task: TaskRef<T, E>,
    retry: RetryPolicy,
    timeout: Option<Duration>,
}

impl<T, E> Clone for TaskSpec<T, E> {
    fn clone(&self) -> Self {
        Self {
            task: self.task.clone(),
            retry: self.retry,
            timeout: self.timeout,
        }
    }
}

impl<T, E> TaskSpec<T, E> {
    /// Creates a new task specification with explicit parameters.
    ///
    /// ### Parameters
    /// - `task`: Task to execute
    /// - `retry`: How many attempts and how long to wait between them
    /// - `timeout`: Optional per-attempt timeout (`None` or zero = no timeout)
    pub fn new(task: TaskRef<T, E>, retry: RetryPolicy, timeout: Option<Duration>) -> Self {
        Self {
            task,
            retry,
            timeout,
        }
    }

    /// Creates a task specification inheriting retry and timeout from `cfg`.
    pub fn with_defaults(task: TaskRef<T, E>, cfg: &Config) -> Self {
        Self {
            task,
            retry: cfg.retry,
            timeout: cfg.default_timeout(),
        }
    }

    /// Returns reference to the task.
    pub fn task(&self) -> &TaskRef<T, E> {
        &self.task
    }

    /// Convenience: returns the task name.
    pub fn name(&self) -> &str
    where
        T: 'static,
        E: 'static,
    {
        self.task.name()
    }

    /// Returns the retry policy.
    pub fn retry(&self) -> RetryPolicy {
        self.retry
    }

    /// Returns the timeout, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.filter(|d| !d.is_zero())
    }

    /// Returns a new spec with updated timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns a new spec with updated retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl<T, E> TaskSpec<T, E>
where
    T: Send + 'static,
    E: From<Elapsed> + Display + Send + 'static,
{
    /// Applies the spec's decorators and returns the resulting task.
    ///
    /// Returns the original task unchanged when neither a timeout nor retries are set.
    pub fn into_task(self) -> TaskRef<T, E> {
        self.decorate(None)
    }

    pub(crate) fn decorate(self, bus: Option<&Bus>) -> TaskRef<T, E> {
        let timeout = self.timeout();
        let mut task = self.task;

        if let Some(d) = timeout {
            let mut timed = TimeoutTask::new(task, d);
            if let Some(bus) = bus {
                timed = timed.with_bus(bus.clone());
            }
            task = Arc::new(timed);
        }
        if self.retry.retries() {
            let mut retried = RetryTask::new(task, self.retry);
            if let Some(bus) = bus {
                retried = retried.with_bus(bus.clone());
            }
            task = Arc::new(retried);
        }
        task
    }
}
