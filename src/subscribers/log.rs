//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [starting] task="fetch-3" index=3 in_flight=2
//! [failed] task="fetch-3" index=3 err="connection refused"
//! [backoff] task="fetch" delay_ms=200 after_attempt=1 err="connection refused"
//! [timeout] task="fetch" timeout_ms=500
//! [circuit-opened] breaker="upstream" failures=3
//! [pool-drained] tasks=5
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let task = e.task.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");
        match e.kind {
            EventKind::TaskStarting => println!(
                "[starting] task={task:?} index={:?} in_flight={:?}",
                e.index, e.in_flight
            ),
            EventKind::TaskCompleted => println!("[completed] task={task:?} index={:?}", e.index),
            EventKind::TaskFailed => {
                println!("[failed] task={task:?} index={:?} err={reason:?}", e.index)
            }
            EventKind::TimeoutHit => {
                println!("[timeout] task={task:?} timeout_ms={:?}", e.timeout_ms)
            }
            EventKind::BackoffScheduled => println!(
                "[backoff] task={task:?} delay_ms={:?} after_attempt={:?} err={reason:?}",
                e.delay_ms, e.attempt
            ),
            EventKind::RetryExhausted => println!(
                "[retry-exhausted] task={task:?} attempts={:?} err={reason:?}",
                e.attempt
            ),
            EventKind::CircuitOpened => {
                println!("[circuit-opened] breaker={task:?} failures={:?}", e.attempt)
            }
            EventKind::CircuitHalfOpen => println!("[circuit-half-open] breaker={task:?}"),
            EventKind::CircuitClosed => println!("[circuit-closed] breaker={task:?}"),
            EventKind::CircuitRejected => println!("[circuit-rejected] breaker={task:?}"),
            EventKind::PoolAborted => println!(
                "[pool-aborted] task={task:?} index={:?} aborted={:?} err={reason:?}",
                e.index, e.in_flight
            ),
            EventKind::PoolDrained => println!("[pool-drained] tasks={:?}", e.index),
            EventKind::SubscriberOverflow => {
                println!("[subscriber-overflow] subscriber={task} reason={reason}")
            }
            EventKind::SubscriberPanicked => {
                println!("[subscriber-panicked] subscriber={task} info={reason}")
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
