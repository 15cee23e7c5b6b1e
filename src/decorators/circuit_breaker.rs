//! # Circuit breaker.
//!
//! Stops calling an operation that keeps failing, then probes it again after a
//! cool-down.
//!
//! ```text
//!            failures ≥ threshold              open_for elapsed
//!  Closed ───────────────────────────► Open ───────────────────► HalfOpen
//!    ▲                                  ▲                           │
//!    │            probe succeeded       │      probe failed         │
//!    └──────────────────────────────────┼───────────────────────────┤
//!                                       └───────────────────────────┘
//! ```
//!
//! - **Closed**: calls pass; consecutive failures are counted, a success resets the count.
//! - **Open**: calls are rejected with [`CircuitOpen`] without running.
//! - **HalfOpen**: exactly one probe call runs; others are rejected until it settles.
//!
//! With `open_for = None` an open circuit stays open until [`CircuitBreaker::reset`].

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::error::CircuitOpen;
use crate::events::{Bus, Event, EventKind, emit};

/// When a [`CircuitBreaker`] trips and how long it stays open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CircuitBreakerPolicy {
    /// Consecutive failures that open the circuit (`0` is treated as `1`).
    pub failure_threshold: u32,
    /// Cool-down before a probe is let through; `None` keeps the circuit open.
    pub open_for: Option<Duration>,
}

impl Default for CircuitBreakerPolicy {
    /// Five failures, thirty seconds open.
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            open_for: Some(Duration::from_secs(30)),
        }
    }
}

impl CircuitBreakerPolicy {
    /// Creates a policy with explicit parameters.
    pub fn new(failure_threshold: u32, open_for: Option<Duration>) -> Self {
        Self {
            failure_threshold,
            open_for,
        }
    }

    #[inline]
    fn threshold(&self) -> u32 {
        self.failure_threshold.max(1)
    }
}

/// Observable breaker state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CircuitState {
    /// Calls pass through.
    Closed,
    /// Calls are rejected.
    Open,
    /// The next call (or the one in flight) is a probe.
    HalfOpen,
}

#[derive(Debug)]
struct Inner {
    state: CircuitState,
    failures: u32,
    opened_at: Option<Instant>,
    probing: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Permit {
    Normal,
    Probe,
}

/// Shared, thread-safe circuit breaker.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use taskweave::{CircuitBreaker, CircuitBreakerPolicy, CircuitState, TaskError};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let breaker = CircuitBreaker::new(CircuitBreakerPolicy::new(1, None));
///
/// let res: Result<(), TaskError> = breaker.call(|| async { Err(TaskError::fail("down")) }).await;
/// assert!(res.is_err());
/// assert_eq!(breaker.state(), CircuitState::Open);
///
/// let res: Result<(), TaskError> = breaker.call(|| async { Ok(()) }).await;
/// assert_eq!(res, Err(TaskError::CircuitOpen));
/// # }
/// ```
#[derive(Debug)]
pub struct CircuitBreaker {
    policy: CircuitBreakerPolicy,
    name: Arc<str>,
    bus: Option<Bus>,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    /// Creates a closed breaker.
    pub fn new(policy: CircuitBreakerPolicy) -> Self {
        Self {
            policy,
            name: Arc::from("circuit"),
            bus: None,
            inner: Mutex::new(Inner {
                state: CircuitState::Closed,
                failures: 0,
                opened_at: None,
                probing: false,
            }),
        }
    }

    /// Names the breaker in published events.
    pub fn with_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Publishes state transitions and rejections to `bus`.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Returns the breaker name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the policy.
    pub fn policy(&self) -> &CircuitBreakerPolicy {
        &self.policy
    }

    /// Reports the current state.
    ///
    /// An open circuit whose cool-down has elapsed reports `HalfOpen`: the next call
    /// will be a probe.
    pub fn state(&self) -> CircuitState {
        let inner = self.lock();
        let state = inner.state;
        match state {
            CircuitState::Open if self.cooled_down(&inner, Instant::now()) => {
                CircuitState::HalfOpen
            }
            state => state,
        }
    }

    /// Consecutive failures counted while closed.
    pub fn failures(&self) -> u32 {
        self.lock().failures
    }

    /// Closes the circuit and clears the failure count.
    pub fn reset(&self) {
        let was = {
            let mut inner = self.lock();
            let was = inner.state;
            *inner = Inner {
                state: CircuitState::Closed,
                failures: 0,
                opened_at: None,
                probing: false,
            };
            was
        };
        if was != CircuitState::Closed {
            self.publish(EventKind::CircuitClosed, None);
        }
    }

    /// Runs `factory` through the breaker.
    ///
    /// Rejected calls never invoke `factory` and fail with [`CircuitOpen`] converted
    /// into `E`. Otherwise the operation's own result is returned and recorded.
    pub async fn call<F, Fut, T, E>(&self, factory: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<CircuitOpen>,
    {
        let permit = match self.admit() {
            Some(permit) => permit,
            None => {
                self.publish(EventKind::CircuitRejected, None);
                return Err(E::from(CircuitOpen));
            }
        };

        let mut guard = ProbeGuard {
            breaker: self,
            armed: permit == Permit::Probe,
        };
        let res = factory().await;
        guard.armed = false;

        match &res {
            Ok(_) => self.on_success(permit),
            Err(_) => self.on_failure(permit),
        }
        res
    }

    fn admit(&self) -> Option<Permit> {
        let now = Instant::now();
        let mut inner = self.lock();
        let state = inner.state;
        match state {
            CircuitState::Closed => Some(Permit::Normal),
            CircuitState::Open if self.cooled_down(&inner, now) => {
                inner.state = CircuitState::HalfOpen;
                inner.probing = true;
                drop(inner);
                self.publish(EventKind::CircuitHalfOpen, None);
                Some(Permit::Probe)
            }
            CircuitState::Open => None,
            CircuitState::HalfOpen if !inner.probing => {
                inner.probing = true;
                Some(Permit::Probe)
            }
            CircuitState::HalfOpen => None,
        }
    }

    fn on_success(&self, permit: Permit) {
        let closed = {
            let mut inner = self.lock();
            inner.failures = 0;
            if permit == Permit::Probe {
                inner.state = CircuitState::Closed;
                inner.opened_at = None;
                inner.probing = false;
                true
            } else {
                false
            }
        };
        if closed {
            self.publish(EventKind::CircuitClosed, None);
        }
    }

    fn on_failure(&self, permit: Permit) {
        let opened = {
            let mut inner = self.lock();
            match permit {
                Permit::Probe => {
                    inner.probing = false;
                    Some(self.open(&mut inner))
                }
                Permit::Normal if inner.state == CircuitState::Closed => {
                    inner.failures = inner.failures.saturating_add(1);
                    (inner.failures >= self.policy.threshold()).then(|| self.open(&mut inner))
                }
                // already tripped by a concurrent call
                Permit::Normal => None,
            }
        };
        if let Some(failures) = opened {
            self.publish(EventKind::CircuitOpened, Some(failures));
        }
    }

    fn open(&self, inner: &mut Inner) -> u32 {
        let failures = inner.failures;
        inner.state = CircuitState::Open;
        inner.opened_at = Some(Instant::now());
        inner.failures = 0;
        failures
    }

    fn cooled_down(&self, inner: &Inner, now: Instant) -> bool {
        match (self.policy.open_for, inner.opened_at) {
            (Some(open_for), Some(at)) => now.saturating_duration_since(at) >= open_for,
            _ => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, kind: EventKind, failures: Option<u32>) {
        emit(self.bus.as_ref(), || {
            let ev = Event::new(kind).with_task(Arc::clone(&self.name));
            match failures {
                Some(n) => ev.with_attempt(n),
                None => ev,
            }
        });
    }
}

/// Frees the probe slot when a probe call is dropped before settling.
struct ProbeGuard<'a> {
    breaker: &'a CircuitBreaker,
    armed: bool,
}

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.breaker.lock().probing = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::TaskError;
    use crate::testing::delayed;

    fn breaker(threshold: u32, open_ms: Option<u64>) -> CircuitBreaker {
        CircuitBreaker::new(CircuitBreakerPolicy::new(
            threshold,
            open_ms.map(Duration::from_millis),
        ))
    }

    async fn fail(b: &CircuitBreaker) -> Result<(), TaskError> {
        b.call(|| async { Err(TaskError::fail("down")) }).await
    }

    async fn succeed(b: &CircuitBreaker) -> Result<(), TaskError> {
        b.call(|| async { Ok(()) }).await
    }

    #[tokio::test(start_paused = true)]
    async fn opens_after_consecutive_failures() {
        let b = breaker(3, Some(1_000));
        for _ in 0..2 {
            assert_eq!(fail(&b).await, Err(TaskError::fail("down")));
        }
        assert_eq!(b.state(), CircuitState::Closed);
        assert_eq!(b.failures(), 2);

        let _ = fail(&b).await;
        assert_eq!(b.state(), CircuitState::Open);
    }

    #[tokio::test(start_paused = true)]
    async fn success_resets_the_failure_count() {
        let b = breaker(2, None);
        let _ = fail(&b).await;
        assert_eq!(succeed(&b).await, Ok(()));
        let _ = fail(&b).await;
        assert_eq!(b.state(), CircuitState::Closed);
        assert_eq!(b.failures(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn open_circuit_rejects_without_running() {
        let b = breaker(1, None);
        let _ = fail(&b).await;

        let calls = AtomicU32::new(0);
        let res: Result<(), TaskError> = b
            .call(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            })
            .await;
        assert_eq!(res, Err(TaskError::CircuitOpen));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn probe_success_closes_the_circuit() {
        let b = breaker(1, Some(100));
        let _ = fail(&b).await;
        assert_eq!(succeed(&b).await, Err(TaskError::CircuitOpen));

        tokio::time::advance(Duration::from_millis(100)).await;
        assert_eq!(b.state(), CircuitState::HalfOpen);
        assert_eq!(succeed(&b).await, Ok(()));
        assert_eq!(b.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn probe_failure_reopens_the_circuit() {
        let b = breaker(1, Some(100));
        let _ = fail(&b).await;

        tokio::time::advance(Duration::from_millis(150)).await;
        assert_eq!(fail(&b).await, Err(TaskError::fail("down")));
        assert_eq!(b.state(), CircuitState::Open);
        assert_eq!(succeed(&b).await, Err(TaskError::CircuitOpen));
    }

    #[tokio::test(start_paused = true)]
    async fn only_one_probe_runs_at_a_time() {
        let b = breaker(1, Some(10));
        let _ = fail(&b).await;
        tokio::time::advance(Duration::from_millis(10)).await;

        let probe = b.call(|| delayed::<_, TaskError>(Ok("probe"), 50));
        let other = async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            succeed(&b).await
        };
        let (probe, other) = tokio::join!(probe, other);
        assert_eq!(probe, Ok("probe"));
        assert_eq!(other, Err(TaskError::CircuitOpen));
        assert_eq!(b.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_probe_frees_the_slot() {
        let b = breaker(1, Some(10));
        let _ = fail(&b).await;
        tokio::time::advance(Duration::from_millis(10)).await;

        let probe = b.call(|| delayed::<(), TaskError>(Ok(()), 1_000));
        let _ = tokio::time::timeout(Duration::from_millis(5), probe).await;

        assert_eq!(b.state(), CircuitState::HalfOpen);
        assert_eq!(succeed(&b).await, Ok(()));
        assert_eq!(b.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn stays_open_without_cool_down_until_reset() {
        let b = breaker(1, None);
        let _ = fail(&b).await;
        tokio::time::advance(Duration::from_secs(3_600)).await;
        assert_eq!(b.state(), CircuitState::Open);

        b.reset();
        assert_eq!(b.state(), CircuitState::Closed);
        assert_eq!(succeed(&b).await, Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_transitions() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let b = breaker(2, Some(10)).with_name("upstream").with_bus(bus);

        let _ = fail(&b).await;
        let _ = fail(&b).await;
        let _ = succeed(&b).await;
        tokio::time::advance(Duration::from_millis(10)).await;
        let _ = succeed(&b).await;

        let kinds: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|ev| (ev.kind, ev.attempt))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (EventKind::CircuitOpened, Some(2)),
                (EventKind::CircuitRejected, None),
                (EventKind::CircuitHalfOpen, None),
                (EventKind::CircuitClosed, None),
            ]
        );
    }
}
