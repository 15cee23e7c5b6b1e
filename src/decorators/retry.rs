//! # Retry with backoff.
//!
//! [`Retry`] re-invokes a factory until it succeeds or the [`RetryPolicy`] runs out
//! of attempts, sleeping between attempts according to the policy's backoff.
//!
//! ```text
//! attempt 1 ─► Ok  ─► return (no delay)
//!           └► Err ─► attempts left? ── no ──► publish RetryExhausted ─► return last Err
//!                           │
//!                          yes
//!                           ▼
//!               publish BackoffScheduled ─► sleep(delay) ─► attempt 2 ...
//!                                             └─ cancel token fired ─► return last Err
//! ```
//!
//! [`retry_with_backoff`] is the short form with a doubling delay, and [`RetryTask`]
//! applies a policy to every spawn of a [`TaskRef`].

use std::fmt::Display;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event, EventKind, emit};
use crate::policies::RetryPolicy;
use crate::tasks::{BoxTaskFuture, Task, TaskRef};

/// Invokes `factory` up to `max_attempts` times, waiting `base_delay × 2^(attempt-1)`
/// after each failure.
///
/// Returns the first success, or the last failure once the attempts are exhausted.
/// `max_attempts` counts the first attempt; `0` behaves like `1`.
///
/// # Example
/// ```
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
/// use taskweave::{retry_with_backoff, TaskError};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let calls = AtomicU32::new(0);
/// let res = retry_with_backoff(
///     || async {
///         if calls.fetch_add(1, Ordering::SeqCst) < 2 {
///             Err(TaskError::fail("not yet"))
///         } else {
///             Ok("ok")
///         }
///     },
///     5,
///     Duration::from_millis(1),
/// )
/// .await;
/// assert_eq!(res, Ok("ok"));
/// assert_eq!(calls.load(Ordering::SeqCst), 3);
/// # }
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(
    factory: F,
    max_attempts: u32,
    base_delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    Retry::new(RetryPolicy::exponential(max_attempts, base_delay))
        .run_opaque(factory)
        .await
}

/// Runs factories under a [`RetryPolicy`].
#[derive(Clone, Debug, Default)]
pub struct Retry {
    policy: RetryPolicy,
    name: Option<Arc<str>>,
    bus: Option<Bus>,
    cancel: Option<CancellationToken>,
}

impl Retry {
    /// Creates a runner for `policy`.
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            name: None,
            bus: None,
            cancel: None,
        }
    }

    /// Names the retried work in published events.
    pub fn with_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Publishes `BackoffScheduled` and `RetryExhausted` to `bus`.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Stops waiting between attempts once `token` is cancelled.
    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Returns the policy this runner applies.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Runs `factory` until it succeeds or the attempts are exhausted.
    ///
    /// Cancellation during a backoff sleep ends the loop with the last failure.
    /// Published events carry the failure's message as their `reason`.
    pub async fn run<F, Fut, T, E>(&self, factory: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.attempt_loop(factory, |e: &E| Some(e.to_string())).await
    }

    /// Like [`Retry::run`], for error types without a message; events carry no `reason`.
    pub async fn run_opaque<F, Fut, T, E>(&self, factory: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.attempt_loop(factory, |_: &E| None).await
    }

    async fn attempt_loop<F, Fut, T, E>(
        &self,
        mut factory: F,
        describe: impl Fn(&E) -> Option<String>,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let attempts = self.policy.attempts();
        let mut attempt: u32 = 1;

        loop {
            let err = match factory().await {
                Ok(v) => return Ok(v),
                Err(e) => e,
            };

            if attempt >= attempts {
                if self.policy.retries() {
                    emit(self.bus.as_ref(), || {
                        self.event(EventKind::RetryExhausted)
                            .with_attempt(attempt)
                            .with_reason_opt(describe(&err))
                    });
                }
                return Err(err);
            }

            let delay = self.policy.backoff.delay_after(attempt);
            emit(self.bus.as_ref(), || {
                self.event(EventKind::BackoffScheduled)
                    .with_attempt(attempt)
                    .with_delay(delay)
                    .with_reason_opt(describe(&err))
            });

            match &self.cancel {
                Some(token) => {
                    select! {
                        _ = time::sleep(delay) => {}
                        _ = token.cancelled() => return Err(err),
                    }
                }
                None => time::sleep(delay).await,
            }
            attempt += 1;
        }
    }

    fn event(&self, kind: EventKind) -> Event {
        let ev = Event::new(kind);
        match &self.name {
            Some(name) => ev.with_task(Arc::clone(name)),
            None => ev,
        }
    }
}

/// Task wrapper that retries every spawn under a [`RetryPolicy`].
///
/// Each attempt receives a child of the spawn token; cancelling the spawn token
/// interrupts the backoff sleep.
pub struct RetryTask<T, E> {
    inner: TaskRef<T, E>,
    policy: RetryPolicy,
    bus: Option<Bus>,
    _marker: PhantomData<fn() -> (T, E)>,
}

impl<T, E> RetryTask<T, E>
where
    T: Send + 'static,
    E: Display + Send + 'static,
{
    /// Wraps `inner` with `policy`.
    pub fn new(inner: TaskRef<T, E>, policy: RetryPolicy) -> Self {
        Self {
            inner,
            policy,
            bus: None,
            _marker: PhantomData,
        }
    }

    /// Publishes retry events to `bus`.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Wraps `inner` and returns a shared handle.
    pub fn arc(inner: TaskRef<T, E>, policy: RetryPolicy) -> TaskRef<T, E> {
        Arc::new(Self::new(inner, policy))
    }
}

impl<T, E> Task<T, E> for RetryTask<T, E>
where
    T: Send + 'static,
    E: Display + Send + 'static,
{
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn spawn(&self, ctx: CancellationToken) -> BoxTaskFuture<T, E> {
        let inner = Arc::clone(&self.inner);
        let mut retry = Retry::new(self.policy)
            .with_name(self.inner.name())
            .with_cancel(ctx.clone());
        if let Some(bus) = &self.bus {
            retry = retry.with_bus(bus.clone());
        }

        Box::pin(async move { retry.run(|| inner.spawn(ctx.child_token())).await })
    }
}
