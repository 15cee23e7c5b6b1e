//! # Deadline enforcement.
//!
//! - [`with_timeout`] races any future against a timer.
//! - [`TimeoutTask`] wraps a [`TaskRef`] so every spawn gets its own deadline.
//!
//! ```text
//! spawn(ctx) ─► child = ctx.child_token()
//!            ─► timeout(d, inner.spawn(child))
//!                 ├─ inner settles first ─► its result (timer dropped)
//!                 └─ timer fires first   ─► child.cancel()
//!                                         ─► publish TimeoutHit
//!                                         ─► Err(E::from(Elapsed))
//! ```

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::error::Elapsed;
use crate::events::{Bus, Event, EventKind, emit};
use crate::tasks::{BoxTaskFuture, Task, TaskRef};

/// Runs `fut` with a deadline.
///
/// The future starts immediately; the timer runs alongside it. If the future settles
/// first its own result is returned and the timer is dropped. Otherwise the future is
/// dropped and the call fails with [`Elapsed`] converted into `E`.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use taskweave::{with_timeout, TaskError};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let slow = async {
///     tokio::time::sleep(Duration::from_secs(10)).await;
///     Ok::<_, TaskError>("late")
/// };
/// let res = with_timeout(slow, Duration::from_millis(10)).await;
/// assert!(matches!(res, Err(TaskError::Timeout { .. })));
/// # }
/// ```
pub async fn with_timeout<F, T, E>(fut: F, timeout: Duration) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<Elapsed>,
{
    match time::timeout(timeout, fut).await {
        Ok(res) => res,
        Err(_elapsed) => Err(E::from(Elapsed { timeout })),
    }
}

/// Task wrapper that bounds every spawn with a deadline.
///
/// A zero duration disables the deadline and spawns the inner task unchanged.
pub struct TimeoutTask<T, E> {
    inner: TaskRef<T, E>,
    timeout: Duration,
    bus: Option<Bus>,
    _marker: PhantomData<fn() -> (T, E)>,
}

impl<T, E> TimeoutTask<T, E>
where
    T: Send + 'static,
    E: From<Elapsed> + Send + 'static,
{
    /// Wraps `inner` with a per-spawn deadline.
    pub fn new(inner: TaskRef<T, E>, timeout: Duration) -> Self {
        Self {
            inner,
            timeout,
            bus: None,
            _marker: PhantomData,
        }
    }

    /// Publishes `TimeoutHit` to `bus` whenever the deadline fires.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Wraps `inner` and returns a shared handle.
    pub fn arc(inner: TaskRef<T, E>, timeout: Duration) -> TaskRef<T, E> {
        Arc::new(Self::new(inner, timeout))
    }

    /// Returns the configured deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<T, E> Task<T, E> for TimeoutTask<T, E>
where
    T: Send + 'static,
    E: From<Elapsed> + Send + 'static,
{
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn spawn(&self, ctx: CancellationToken) -> BoxTaskFuture<T, E> {
        if self.timeout.is_zero() {
            return self.inner.spawn(ctx);
        }

        let child = ctx.child_token();
        let fut = self.inner.spawn(child.clone());
        let timeout = self.timeout;
        let bus = self.bus.clone();
        let name: Arc<str> = Arc::from(self.inner.name());

        Box::pin(async move {
            match time::timeout(timeout, fut).await {
                Ok(res) => res,
                Err(_elapsed) => {
                    child.cancel();
                    emit(bus.as_ref(), || {
                        Event::new(EventKind::TimeoutHit)
                            .with_task(name)
                            .with_timeout(timeout)
                    });
                    Err(E::from(Elapsed { timeout }))
                }
            }
        })
    }
}
