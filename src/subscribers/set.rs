//! # SubscriberSet: non-blocking fan-out over multiple subscribers
//!
//! [`SubscriberSet`] distributes each [`Event`] to multiple subscribers **without
//! awaiting** their processing.
//!
//! ## What it guarantees
//! - `emit(&Event)` returns immediately.
//! - Per-subscriber FIFO (queue order).
//! - Panics inside subscribers are caught and reported (isolation).
//!
//! ## What it does **not** guarantee
//! - No global ordering across different subscribers.
//! - No retries on per-subscriber queue overflow (events are dropped for that subscriber).
//!
//! ## Diagram
//! ```text
//!    emit(&Event)
//!        │                        (Arc-clone per subscriber)
//!        ├────────────────► [queue S1] ─► worker S1 ─► on_event()
//!        ├────────────────► [queue S2] ─► worker S2 ─► on_event()
//!        └────────────────► [queue SN] ─► worker SN ─► on_event()
//! ```

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::{Bus, Event};

use super::Subscribe;

struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Composite fan-out with per-subscriber bounded queues and worker tasks.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
    bus: Option<Bus>,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker per subscriber.
    ///
    /// Must be called within a Tokio runtime. When `bus` is given, overflow and panic
    /// reports are published there instead of printed to stderr.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Option<Bus>) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(sub.queue_capacity().max(1));
            let panic_bus = bus.clone();

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = sub.on_event(ev.as_ref());
                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        let info = format!("{panic_err:?}");
                        // A panic while handling a panic report would loop forever.
                        match &panic_bus {
                            Some(bus) if !ev.is_internal() => {
                                bus.publish(Event::subscriber_panicked(name, info));
                            }
                            _ => eprintln!("[taskweave] subscriber '{name}' panicked: {info}"),
                        }
                    }
                }
            });

            channels.push(SubscriberChannel { name, sender: tx });
            workers.push(handle);
        }

        Self {
            channels,
            workers,
            bus,
        }
    }

    /// Fan-out one event to all subscribers (non-blocking).
    ///
    /// If a subscriber's queue is **full** or **closed**, the event is dropped for it.
    pub fn emit(&self, event: &Event) {
        let ev = Arc::new(event.clone());
        for channel in &self.channels {
            let reason = match channel.sender.try_send(Arc::clone(&ev)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            match &self.bus {
                Some(bus) if !event.is_internal() => {
                    bus.publish(Event::subscriber_overflow(channel.name, reason));
                }
                _ => eprintln!(
                    "[taskweave] subscriber '{}' dropped event: queue {reason}",
                    channel.name
                ),
            }
        }
    }

    /// Graceful shutdown: close all queues and await worker completion.
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::events::EventKind;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<EventKind>>);

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, ev: &Event) {
            self.0.lock().unwrap().push(ev.kind);
        }
    }

    struct Exploder;

    #[async_trait]
    impl Subscribe for Exploder {
        async fn on_event(&self, _ev: &Event) {
            panic!("boom");
        }

        fn name(&self) -> &'static str {
            "exploder"
        }
    }

    #[tokio::test]
    async fn fans_out_to_every_subscriber_in_order() {
        let a = Arc::new(Recorder::default());
        let b = Arc::new(Recorder::default());
        let subs: Vec<Arc<dyn Subscribe>> = vec![a.clone(), b.clone()];
        let set = SubscriberSet::new(subs, None);
        assert_eq!(set.len(), 2);

        set.emit(&Event::new(EventKind::TaskStarting));
        set.emit(&Event::new(EventKind::TaskCompleted));
        set.shutdown().await;

        for rec in [a, b] {
            assert_eq!(
                *rec.0.lock().unwrap(),
                vec![EventKind::TaskStarting, EventKind::TaskCompleted]
            );
        }
    }

    #[tokio::test]
    async fn panicking_subscriber_is_isolated_and_reported() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let healthy = Arc::new(Recorder::default());
        let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Exploder), healthy.clone()];
        let set = SubscriberSet::new(subs, Some(bus));

        set.emit(&Event::new(EventKind::TaskFailed));
        set.shutdown().await;

        assert_eq!(*healthy.0.lock().unwrap(), vec![EventKind::TaskFailed]);
        let report = rx.recv().await.unwrap();
        assert_eq!(report.kind, EventKind::SubscriberPanicked);
        assert_eq!(report.task.as_deref(), Some("exploder"));
    }
}
