//! # taskweave
//!
//! **Taskweave** coordinates groups of asynchronous tasks: wait for all of them, the
//! first of them, the first `n` of them, or run them through a bounded pool, with
//! deadline, retry and circuit breaker decorators around individual tasks.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  Future-level (no spawning, no Send bound)        Task-level (TaskRef<T, E>, spawned on Tokio)
//!  ┌──────────────────────────────────────┐         ┌──────────────────────────────────────────┐
//!  │ all / race / all_settled / any       │         │ TaskSpec ──► RetryTask ──► TimeoutTask   │
//!  │ first_n / sequence / fallback        │         │                  │                       │
//!  │ with_timeout / retry_with_backoff    │         │                  ▼                       │
//!  │ CircuitBreaker::call                 │         │ Pool::run / run_settled / pooled         │
//!  └──────────────────────────────────────┘         │   - JoinSet, at most `limit` in flight   │
//!                                                   │   - FailFast or Drain                    │
//!                                                   └───────────────────┬──────────────────────┘
//!                                                                       │ Events:
//!                                                                       │ - TaskStarting / Completed / Failed
//!                                                                       │ - TimeoutHit / BackoffScheduled
//!                                                                       │ - PoolAborted / PoolDrained
//!                                                                       ▼
//!                                                   ┌──────────────────────────────────────────┐
//!                                                   │          Bus (broadcast channel)         │
//!                                                   │        (capacity: Config::bus_capacity)  │
//!                                                   └───────────────────┬──────────────────────┘
//!                                                                       ▼
//!                                                              listener ──► SubscriberSet
//!                                                                          ┌──────┼──────┐
//!                                                                          ▼      ▼      ▼
//!                                                                        sub1   sub2   subN
//! ```
//!
//! ### Pool lifecycle
//! ```text
//! Pool::run(tasks)
//!   ├─► launch tasks[0..limit] ─► publish TaskStarting{ task, index, in_flight }
//!   └─► loop join_next():
//!         ├─ Ok  ──► results[index] = value ─► publish TaskCompleted ─► launch next
//!         └─ Err ──► publish TaskFailed
//!                    ├─ FailFast ─► cancel run token, abort in-flight ─► PoolAborted ─► Err
//!                    └─ Drain    ─► results[index] = error ─► launch next
//!   all settled ─► PoolDrained ─► Ok(values in input order) or first error in input order
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / functions                               |
//! |-------------------|---------------------------------------------------------------|-----------------------------------------------------|
//! | **Collectors**    | Fold many futures into one outcome.                           | [`all`], [`race`], [`all_settled`], [`any`], [`first_n`] |
//! | **Sequencing**    | Run factories one at a time.                                  | [`sequence`], [`fallback`]                          |
//! | **Pool**          | Bounded concurrency over task factories.                      | [`Pool`], [`pooled`], [`FailurePolicy`]             |
//! | **Decorators**    | Deadlines, retries and circuit breaking.                      | [`with_timeout`], [`retry_with_backoff`], [`CircuitBreaker`] |
//! | **Policies**      | Retry budget and backoff schedule.                            | [`RetryPolicy`], [`BackoffPolicy`], [`JitterPolicy`] |
//! | **Subscriber API**| Hook into pool and decorator events.                          | [`Subscribe`], [`Event`]                            |
//! | **Errors**        | Typed failures that stay generic over the caller's error.     | [`TaskError`], [`Elapsed`], [`AggregateError`]      |
//! | **Tasks**         | Define tasks as functions or specs.                           | [`TaskRef`], [`TaskFn`], [`TaskSpec`]               |
//! | **Configuration** | Centralize pool settings.                                     | [`Config`]                                          |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use taskweave::{Config, Pool, RetryPolicy, TaskError, TaskFn, TaskRef, TaskSpec};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), TaskError> {
//!     let mut cfg = Config::with_limit(2);
//!     cfg.timeout = Duration::from_secs(5);
//!     cfg.retry = RetryPolicy::exponential(3, Duration::from_millis(50));
//!
//!     // Build subscribers (optional)
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn taskweave::Subscribe>> = {
//!         use taskweave::LogWriter;
//!         vec![Arc::new(LogWriter::default())]
//!     };
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn taskweave::Subscribe>> = Vec::new();
//!
//!     let pool = Pool::builder(cfg).with_subscribers(subs).build();
//!
//!     let tasks: Vec<TaskRef<String, TaskError>> = ["alpha", "beta", "gamma"]
//!         .into_iter()
//!         .map(|name| {
//!             let task: TaskRef<String, TaskError> =
//!                 TaskFn::arc(name, move |ctx: CancellationToken| async move {
//!                     if ctx.is_cancelled() {
//!                         return Err(TaskError::Canceled);
//!                     }
//!                     Ok(name.to_uppercase())
//!                 });
//!             // inherit timeout and retry from the pool's config
//!             pool.task(TaskSpec::with_defaults(task, pool.config()))
//!         })
//!         .collect();
//!
//!     let values = pool.run(tasks).await?;
//!     assert_eq!(values, ["ALPHA", "BETA", "GAMMA"]);
//!
//!     pool.shutdown().await;
//!     Ok(())
//! }
//! ```
mod combinators;
mod config;
mod decorators;
mod error;
mod events;
mod policies;
mod pool;
mod slots;
mod subscribers;
mod tasks;

#[cfg(test)]
mod testing;

// ---- Public re-exports ----

pub use combinators::{
    Settlement, SettlementStatus, all, all_settled, any, fallback, first_n, race, sequence,
};
pub use config::Config;
pub use decorators::{
    CircuitBreaker, CircuitBreakerPolicy, CircuitState, Retry, RetryTask, TimeoutTask,
    retry_with_backoff, with_timeout,
};
pub use error::{AggregateError, CircuitOpen, Elapsed, FirstNError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use policies::{BackoffPolicy, FailurePolicy, JitterPolicy, RetryPolicy};
pub use pool::{Pool, PoolBuilder, pooled};
pub use subscribers::{Subscribe, SubscriberSet};
pub use tasks::{BoxTaskFuture, Task, TaskFn, TaskRef, TaskSpec, TaskSpecBuilder};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
