//! Shared helpers for unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use tokio::time;

/// Settles with `outcome` after `ms` milliseconds.
pub(crate) async fn delayed<T, E>(outcome: Result<T, E>, ms: u64) -> Result<T, E> {
    time::sleep(Duration::from_millis(ms)).await;
    outcome
}

/// Like [`delayed`], but raises `settled` if it is polled to completion.
pub(crate) async fn observed<T, E>(
    outcome: Result<T, E>,
    ms: u64,
    settled: Arc<AtomicBool>,
) -> Result<T, E> {
    time::sleep(Duration::from_millis(ms)).await;
    settled.store(true, Ordering::SeqCst);
    outcome
}

/// Tracks how many instrumented tasks are active at once.
#[derive(Clone, Default)]
pub(crate) struct Gauge {
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl Gauge {
    pub(crate) fn enter(&self) {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    pub(crate) fn exit(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }

    pub(crate) fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}
