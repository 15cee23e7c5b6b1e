//! # Runtime events emitted by pools and decorators.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Task lifecycle**: a pooled task starting, completing, failing; a deadline firing
//! - **Retry**: backoff scheduled, attempts exhausted
//! - **Circuit breaker**: opened, half-open probe, closed, call rejected
//! - **Pool / subscriber**: run aborted or drained, subscriber overflow or panic
//!
//! The [`Event`] struct carries the metadata (task name, input index, attempt, delays).
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use taskweave::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::BackoffScheduled)
//!     .with_task("fetch")
//!     .with_attempt(2)
//!     .with_delay(Duration::from_millis(200))
//!     .with_reason("connection refused");
//!
//! assert_eq!(ev.kind, EventKind::BackoffScheduled);
//! assert_eq!(ev.task.as_deref(), Some("fetch"));
//! assert_eq!(ev.delay_ms, Some(200));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets: `task` (subscriber name), `reason` (panic info).
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `task` (subscriber name), `reason`.
    SubscriberOverflow,

    // === Task lifecycle events ===
    /// A task is starting.
    ///
    /// Sets: `task`, `index`, `in_flight`.
    TaskStarting,

    /// A task succeeded.
    ///
    /// Sets: `task`, `index`.
    TaskCompleted,

    /// A task failed.
    ///
    /// Sets: `task`, `index`, `reason`.
    TaskFailed,

    /// A task exceeded its deadline and its child token was cancelled.
    ///
    /// Sets: `task`, `timeout_ms`.
    TimeoutHit,

    // === Retry events ===
    /// Next attempt scheduled after a failure.
    ///
    /// Sets: `task`, `attempt` (the failed one), `delay_ms`, `reason`.
    BackoffScheduled,

    /// Every attempt failed; the last reason is returned to the caller.
    ///
    /// Sets: `task`, `attempt` (the last one), `reason`.
    RetryExhausted,

    // === Circuit breaker events ===
    /// Consecutive failures reached the threshold; calls are now rejected.
    ///
    /// Sets: `task` (breaker name), `attempt` (consecutive failures).
    CircuitOpened,

    /// Cool-down elapsed; one probe call is let through.
    ///
    /// Sets: `task` (breaker name).
    CircuitHalfOpen,

    /// A probe succeeded (or the breaker was reset); calls flow again.
    ///
    /// Sets: `task` (breaker name).
    CircuitClosed,

    /// A call was rejected without running.
    ///
    /// Sets: `task` (breaker name).
    CircuitRejected,

    // === Pool events ===
    /// A fail-fast pool stopped at its first failure and aborted in-flight tasks.
    ///
    /// Sets: `task` (failing task), `index`, `in_flight` (tasks aborted), `reason`.
    PoolAborted,

    /// Every task of a pool run has settled.
    ///
    /// Sets: `index` (number of tasks).
    PoolDrained,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the task (or breaker / subscriber), if applicable.
    pub task: Option<Arc<str>>,
    /// Input position of the task within a pool run.
    pub index: Option<usize>,
    /// Attempt number (starting from 1), or consecutive failures for a breaker.
    pub attempt: Option<u32>,
    /// Tasks in flight in the pool at the time of the event.
    pub in_flight: Option<usize>,
    /// Deadline in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Backoff delay before the next attempt in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            index: None,
            attempt: None,
            in_flight: None,
            timeout_ms: None,
            delay_ms: None,
            reason: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a reason when one is known.
    #[inline]
    pub fn with_reason_opt(mut self, reason: Option<impl Into<Arc<str>>>) -> Self {
        self.reason = reason.map(Into::into);
        self
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches the task's input position.
    #[inline]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Attaches an attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches the current in-flight count.
    #[inline]
    pub fn with_in_flight(mut self, n: usize) -> Self {
        self.in_flight = Some(n);
        self
    }

    /// Attaches a deadline (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        self.timeout_ms = Some(compact_ms(d));
        self
    }

    /// Attaches a backoff delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay_ms = Some(compact_ms(d));
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_task(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_task(subscriber)
            .with_reason(info)
    }

    /// True for events describing the subscriber machinery itself.
    #[inline]
    pub fn is_internal(&self) -> bool {
        matches!(
            self.kind,
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
        )
    }
}

fn compact_ms(d: Duration) -> u32 {
    d.as_millis().min(u128::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_increase() {
        let a = Event::new(EventKind::TaskStarting);
        let b = Event::new(EventKind::TaskCompleted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn durations_saturate_to_u32_millis() {
        let ev = Event::new(EventKind::TimeoutHit).with_timeout(Duration::MAX);
        assert_eq!(ev.timeout_ms, Some(u32::MAX));
    }

    #[test]
    fn subscriber_events_are_internal() {
        assert!(Event::subscriber_overflow("audit", "full").is_internal());
        assert!(!Event::new(EventKind::PoolDrained).is_internal());
    }
}
