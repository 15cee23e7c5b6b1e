//! Forwards bus events into a [`SubscriberSet`] until told to stop.
//!
//! ```text
//! Bus.subscribe() ─► loop { recv ─► set.emit(&ev) }
//!                        └─ stop token fired ─► drain what is already queued ─► set.shutdown()
//! ```
//!
//! The receiver is created before the listener task is spawned, so no event published
//! after [`spawn_listener`] returns can be missed.

use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event, EventKind};

use super::SubscriberSet;

pub(crate) fn spawn_listener(
    bus: &Bus,
    set: SubscriberSet,
    stop: CancellationToken,
) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                res = rx.recv() => match res {
                    Ok(ev) => set.emit(&ev),
                    Err(RecvError::Lagged(n)) => set.emit(&lagged(n)),
                    Err(RecvError::Closed) => break,
                },
                _ = stop.cancelled() => {
                    loop {
                        match rx.try_recv() {
                            Ok(ev) => set.emit(&ev),
                            Err(TryRecvError::Lagged(n)) => set.emit(&lagged(n)),
                            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                        }
                    }
                    break;
                }
            }
        }
        set.shutdown().await;
    })
}

fn lagged(n: u64) -> Event {
    Event::new(EventKind::SubscriberOverflow)
        .with_task("listener")
        .with_reason(format!("lagged behind bus, skipped {n} events"))
}
