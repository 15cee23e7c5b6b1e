//! # Bounded task pool.
//!
//! [`Pool`] runs a list of [`TaskRef`]s with at most `limit` of them in flight,
//! launching the next unstarted task the moment one settles.
//!
//! ## Architecture
//! ```text
//! run(tasks) ─► drive loop (owns PoolState)
//!                 │
//!                 ├─► while can_launch: spawn task[next] onto JoinSet ─► publish TaskStarting
//!                 │
//!                 └─► join_next() ─► (index, result)
//!                        ├─ Ok  ─► results[index] = Fulfilled ─► publish TaskCompleted
//!                        └─ Err ─► publish TaskFailed
//!                                   ├─ FailFast ─► cancel run token, abort in-flight,
//!                                   │              publish PoolAborted, return Err
//!                                   └─ Drain    ─► results[index] = Rejected
//!
//! all settled ─► publish PoolDrained ─► results in input order
//! ```
//!
//! ## Rules
//! - Tasks are spawned lazily: a task's future does not exist until its slot frees up.
//! - Every task receives a child of the run token; the token is cancelled when the run
//!   ends early or the `run` future is dropped.
//! - A task that panics makes `run` panic with the same payload. A task cancelled from
//!   outside the pool makes `run` panic too, so no input position goes without an outcome.

use std::convert::Infallible;
use std::fmt::Display;
use std::ops::ControlFlow;
use std::sync::Arc;

use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::{
    combinators::Settlement,
    config::Config,
    error::Elapsed,
    events::{Bus, Event, EventKind},
    policies::FailurePolicy,
    tasks::{TaskRef, TaskSpec},
};

use super::builder::PoolBuilder;
use super::state::PoolState;

/// Runs the subscriber listener until the pool shuts down.
pub(crate) struct Listener {
    pub(crate) stop: CancellationToken,
    pub(crate) handle: JoinHandle<()>,
}

/// Bounded scheduler over [`TaskRef`]s.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use taskweave::{Config, Pool, TaskError, TaskFn, TaskRef};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let pool = Pool::new(Config::with_limit(2));
/// let tasks: Vec<TaskRef<u32, TaskError>> = (1..=4)
///     .map(|n| -> TaskRef<u32, TaskError> {
///         TaskFn::arc(format!("square-{n}"), move |_ctx: CancellationToken| async move {
///             Ok(n * n)
///         })
///     })
///     .collect();
///
/// assert_eq!(pool.run(tasks).await, Ok(vec![1, 4, 9, 16]));
/// pool.shutdown().await;
/// # }
/// ```
pub struct Pool {
    cfg: Config,
    bus: Bus,
    listener: Option<Listener>,
}

impl Pool {
    /// Creates a pool without subscribers.
    pub fn new(cfg: Config) -> Self {
        PoolBuilder::new(cfg).build()
    }

    /// Creates a builder for a pool with subscribers.
    pub fn builder(cfg: Config) -> PoolBuilder {
        PoolBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: Config, bus: Bus, listener: Option<Listener>) -> Self {
        Self { cfg, bus, listener }
    }

    /// Returns the pool configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Returns the bus the pool publishes its events on.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Applies `spec`'s timeout and retry policy, publishing decorator events on this
    /// pool's bus.
    pub fn task<T, E>(&self, spec: TaskSpec<T, E>) -> TaskRef<T, E>
    where
        T: Send + 'static,
        E: From<Elapsed> + Display + Send + 'static,
    {
        spec.decorate(Some(&self.bus))
    }

    /// Runs every task and returns their values in input order.
    ///
    /// Fails according to the configured [`FailurePolicy`]:
    /// - `FailFast`: with the first failure to complete; remaining tasks are aborted.
    /// - `Drain`: after every task settled, with the first failure in input order.
    ///
    /// Must be called within a Tokio runtime.
    pub async fn run<I, T, E>(&self, tasks: I) -> Result<Vec<T>, E>
    where
        I: IntoIterator<Item = TaskRef<T, E>>,
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        let fail_fast = self.cfg.failure == FailurePolicy::FailFast;
        let settled = self
            .drive(tasks, |e| {
                if fail_fast {
                    ControlFlow::Break(e)
                } else {
                    ControlFlow::Continue(e)
                }
            })
            .await?;

        settled.into_iter().map(Settlement::into_result).collect()
    }

    /// Runs every task to completion and reports each outcome in input order.
    ///
    /// Never fails; the [`FailurePolicy`] is ignored.
    pub async fn run_settled<I, T, E>(&self, tasks: I) -> Vec<Settlement<T, E>>
    where
        I: IntoIterator<Item = TaskRef<T, E>>,
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        let Ok(settled) = self
            .drive(tasks, ControlFlow::<Infallible, E>::Continue)
            .await;
        settled
    }

    /// Stops the subscriber listener after it delivered every event already published.
    pub async fn shutdown(mut self) {
        if let Some(listener) = self.listener.take() {
            listener.stop.cancel();
            let _ = listener.handle.await;
        }
    }

    async fn drive<I, T, E, B>(
        &self,
        tasks: I,
        mut on_failure: impl FnMut(E) -> ControlFlow<B, E>,
    ) -> Result<Vec<Settlement<T, E>>, B>
    where
        I: IntoIterator<Item = TaskRef<T, E>>,
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        let tasks: Vec<TaskRef<T, E>> = tasks.into_iter().collect();
        let mut state = PoolState::new(tasks.len(), self.cfg.concurrency_limit());
        let run_token = CancellationToken::new();
        let _cancel_on_exit = run_token.clone().drop_guard();
        let mut set: JoinSet<(usize, Result<T, E>)> = JoinSet::new();

        loop {
            while state.can_launch() {
                let index = state.launch();
                let task = &tasks[index];
                self.bus.publish(
                    Event::new(EventKind::TaskStarting)
                        .with_task(task.name())
                        .with_index(index)
                        .with_in_flight(state.running()),
                );
                let fut = task.spawn(run_token.child_token());
                set.spawn(async move { (index, fut.await) });
            }

            let Some(joined) = set.join_next().await else {
                break;
            };
            let (index, res) = match joined {
                Ok(report) => report,
                Err(err) => reraise(err),
            };

            let name: Arc<str> = Arc::from(tasks[index].name());
            let outcome = match res {
                Ok(value) => {
                    self.bus.publish(
                        Event::new(EventKind::TaskCompleted)
                            .with_task(name)
                            .with_index(index),
                    );
                    Settlement::Fulfilled(value)
                }
                Err(e) => {
                    let reason: Arc<str> = Arc::from(e.to_string());
                    self.bus.publish(
                        Event::new(EventKind::TaskFailed)
                            .with_task(Arc::clone(&name))
                            .with_index(index)
                            .with_reason(Arc::clone(&reason)),
                    );
                    match on_failure(e) {
                        ControlFlow::Continue(e) => Settlement::Rejected(e),
                        ControlFlow::Break(stop) => {
                            run_token.cancel();
                            let aborted = set.len();
                            set.abort_all();
                            self.bus.publish(
                                Event::new(EventKind::PoolAborted)
                                    .with_task(name)
                                    .with_index(index)
                                    .with_in_flight(aborted)
                                    .with_reason(reason),
                            );
                            return Err(stop);
                        }
                    }
                }
            };
            state.settle(index, outcome);
        }

        self.bus
            .publish(Event::new(EventKind::PoolDrained).with_index(state.total()));
        Ok(state.into_settlements())
    }
}

/// Re-raises a task that ended without reporting its result.
///
/// A task only vanishes by panicking or by being cancelled from outside the pool (for
/// example a runtime shutting down); either way its input position has no outcome.
fn reraise(err: JoinError) -> ! {
    if err.is_panic() {
        std::panic::resume_unwind(err.into_panic());
    }
    panic!("pool task ended without reporting: {err}");
}

impl Drop for Pool {
    fn drop(&mut self) {
        if let Some(listener) = &self.listener {
            listener.stop.cancel();
        }
    }
}

/// Runs `tasks` with at most `limit` in flight and returns their values in input order.
///
/// `limit = 0` means unlimited. The first failure to complete aborts the remaining
/// tasks and is returned. Must be called within a Tokio runtime.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// use taskweave::{pooled, TaskError, TaskFn, TaskRef};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let tasks: Vec<TaskRef<&str, TaskError>> = vec![
///     TaskFn::arc("a", |_ctx: CancellationToken| async { Ok("a") }),
///     TaskFn::arc("b", |_ctx: CancellationToken| async { Ok("b") }),
///     TaskFn::arc("c", |_ctx: CancellationToken| async { Ok("c") }),
/// ];
/// assert_eq!(pooled(tasks, 2).await, Ok(vec!["a", "b", "c"]));
/// # }
/// ```
pub async fn pooled<I, T, E>(tasks: I, limit: usize) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = TaskRef<T, E>>,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    Pool::new(Config::with_limit(limit)).run(tasks).await
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::{self, Instant};

    use super::*;
    use crate::subscribers::Subscribe;
    use crate::testing::Gauge;
    use crate::{RetryPolicy, TaskError, TaskFn};

    fn tracked(
        name: &'static str,
        ms: u64,
        value: usize,
        gauge: &Gauge,
    ) -> TaskRef<usize, TaskError> {
        let gauge = gauge.clone();
        TaskFn::arc(name, move |_ctx: CancellationToken| {
            let gauge = gauge.clone();
            async move {
                gauge.enter();
                time::sleep(Duration::from_millis(ms)).await;
                gauge.exit();
                Ok(value)
            }
        })
    }

    fn failing(name: &'static str, ms: u64) -> TaskRef<usize, TaskError> {
        TaskFn::arc(name, move |_ctx: CancellationToken| async move {
            time::sleep(Duration::from_millis(ms)).await;
            Err(TaskError::fail(name))
        })
    }

    #[tokio::test(start_paused = true)]
    async fn never_exceeds_the_limit() {
        let gauge = Gauge::default();
        let names = ["t0", "t1", "t2", "t3", "t4"];
        let tasks: Vec<_> = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| tracked(name, 20, i, &gauge))
            .collect();

        let started = Instant::now();
        let res = pooled(tasks, 2).await;

        assert_eq!(res, Ok(vec![0, 1, 2, 3, 4]));
        assert_eq!(gauge.peak(), 2);
        assert_eq!(started.elapsed(), Duration::from_millis(60));
    }

    #[tokio::test(start_paused = true)]
    async fn results_follow_input_order() {
        let gauge = Gauge::default();
        let tasks = vec![
            tracked("slow", 30, 0, &gauge),
            tracked("fast", 10, 1, &gauge),
            tracked("mid", 20, 2, &gauge),
        ];
        assert_eq!(pooled(tasks, 3).await, Ok(vec![0, 1, 2]));
    }

    #[tokio::test]
    async fn empty_input_resolves_empty() {
        let res: Result<Vec<u8>, TaskError> = pooled(Vec::new(), 2).await;
        assert_eq!(res, Ok(vec![]));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_limit_runs_everything_at_once() {
        let gauge = Gauge::default();
        let tasks: Vec<_> = (0..5).map(|i| tracked("t", 10, i, &gauge)).collect();
        assert_eq!(pooled(tasks, 0).await, Ok(vec![0, 1, 2, 3, 4]));
        assert_eq!(gauge.peak(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn fail_fast_aborts_stragglers_and_launches_nothing_more() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&finished);
        let straggler: TaskRef<usize, TaskError> =
            TaskFn::arc("straggler", move |_ctx: CancellationToken| {
                let flag = Arc::clone(&flag);
                async move {
                    time::sleep(Duration::from_millis(100)).await;
                    flag.store(true, Ordering::SeqCst);
                    Ok(0)
                }
            });

        let launched = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&launched);
        let never: TaskRef<usize, TaskError> =
            TaskFn::arc("never", move |_ctx: CancellationToken| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok(2) }
            });

        let res = pooled(vec![straggler, failing("boom", 10), never], 2).await;
        assert_eq!(res, Err(TaskError::fail("boom")));

        time::sleep(Duration::from_millis(200)).await;
        assert!(!finished.load(Ordering::SeqCst));
        assert_eq!(launched.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn fail_fast_cancels_the_task_tokens() {
        let seen = Arc::new(Mutex::new(None::<CancellationToken>));
        let slot = Arc::clone(&seen);
        let watcher: TaskRef<usize, TaskError> =
            TaskFn::arc("watcher", move |ctx: CancellationToken| {
                *slot.lock().unwrap() = Some(ctx.clone());
                async move {
                    ctx.cancelled().await;
                    Err(TaskError::Canceled)
                }
            });

        let res = pooled(vec![watcher, failing("boom", 5)], 0).await;
        assert_eq!(res, Err(TaskError::fail("boom")));
        assert!(seen.lock().unwrap().as_ref().unwrap().is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn drain_reports_first_failure_in_input_order() {
        let gauge = Gauge::default();
        let cfg = Config {
            limit: 2,
            failure: FailurePolicy::Drain,
            ..Config::default()
        };
        let pool = Pool::new(cfg);
        let mut rx = pool.bus().subscribe();

        let tasks = vec![
            tracked("ok", 5, 0, &gauge),
            failing("late", 50),
            failing("early", 10),
            tracked("last", 5, 3, &gauge),
        ];
        assert_eq!(pool.run(tasks).await, Err(TaskError::fail("late")));

        let started = std::iter::from_fn(|| rx.try_recv().ok())
            .filter(|ev| ev.kind == EventKind::TaskStarting)
            .count();
        assert_eq!(started, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn lifecycle_events_carry_position_and_load() {
        let gauge = Gauge::default();
        let pool = Pool::new(Config::with_limit(2));
        let mut rx = pool.bus().subscribe();

        let tasks = vec![tracked("a", 10, 1, &gauge), failing("b", 5)];
        assert_eq!(pool.run(tasks).await, Err(TaskError::fail("b")));

        let events: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        let starting: Vec<_> = events
            .iter()
            .filter(|ev| ev.kind == EventKind::TaskStarting)
            .map(|ev| (ev.task.as_deref().map(str::to_owned), ev.index, ev.in_flight, ev.attempt))
            .collect();
        assert_eq!(
            starting,
            vec![
                (Some("a".to_owned()), Some(0), Some(1), None),
                (Some("b".to_owned()), Some(1), Some(2), None),
            ]
        );

        let failed = events
            .iter()
            .find(|ev| ev.kind == EventKind::TaskFailed)
            .unwrap();
        assert_eq!(failed.index, Some(1));
        assert_eq!(failed.attempt, None);
        assert!(failed.reason.as_deref().unwrap().contains('b'));
    }

    #[tokio::test(start_paused = true)]
    async fn run_settled_reports_every_outcome() {
        let gauge = Gauge::default();
        let pool = Pool::new(Config::with_limit(1));
        let settled = pool
            .run_settled(vec![
                tracked("a", 10, 1, &gauge),
                failing("b", 10),
                tracked("c", 10, 3, &gauge),
            ])
            .await;

        assert_eq!(
            settled,
            vec![
                Settlement::Fulfilled(1),
                Settlement::Rejected(TaskError::fail("b")),
                Settlement::Fulfilled(3),
            ]
        );
    }

    #[tokio::test]
    #[should_panic(expected = "task exploded")]
    async fn panics_propagate_to_the_caller() {
        let task: TaskRef<(), TaskError> =
            TaskFn::arc("explode", |_ctx: CancellationToken| async {
                if true {
                    panic!("task exploded");
                }
                Ok(())
            });
        let _ = pooled(vec![task], 1).await;
    }

    #[tokio::test]
    #[should_panic(expected = "ended without reporting")]
    async fn externally_cancelled_task_is_not_dropped_silently() {
        let handle = tokio::spawn(std::future::pending::<()>());
        handle.abort();
        let err = handle.await.unwrap_err();
        assert!(err.is_cancelled());
        reraise(err);
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<(EventKind, Option<usize>)>>);

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, ev: &Event) {
            self.0.lock().unwrap().push((ev.kind, ev.index));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn events_reach_subscribers_before_shutdown_returns() {
        let recorder = Arc::new(Recorder::default());
        let subs: Vec<Arc<dyn Subscribe>> = vec![recorder.clone()];
        let pool = Pool::builder(Config::with_limit(1))
            .with_subscribers(subs)
            .build();

        let gauge = Gauge::default();
        let res = pool
            .run(vec![tracked("a", 5, 0, &gauge), tracked("b", 5, 1, &gauge)])
            .await;
        assert_eq!(res, Ok(vec![0, 1]));
        pool.shutdown().await;

        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec![
                (EventKind::TaskStarting, Some(0)),
                (EventKind::TaskCompleted, Some(0)),
                (EventKind::TaskStarting, Some(1)),
                (EventKind::TaskCompleted, Some(1)),
                (EventKind::PoolDrained, Some(2)),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn pool_tasks_publish_decorator_events() {
        let pool = Pool::new(Config::default());
        let mut rx = pool.bus().subscribe();

        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let flaky: TaskRef<usize, TaskError> =
            TaskFn::arc("flaky", move |_ctx: CancellationToken| {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(TaskError::fail("first try"))
                    } else {
                        Ok(n)
                    }
                }
            });
        let task = pool.task(TaskSpec::new(
            flaky,
            RetryPolicy::exponential(2, Duration::from_millis(10)),
            None,
        ));

        assert_eq!(pool.run(vec![task]).await, Ok(vec![1]));

        let kinds: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|ev| ev.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::TaskStarting,
                EventKind::BackoffScheduled,
                EventKind::TaskCompleted,
                EventKind::PoolDrained,
            ]
        );
    }
}
