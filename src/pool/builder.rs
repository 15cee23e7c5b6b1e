use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    events::Bus,
    subscribers::{Subscribe, SubscriberSet, spawn_listener},
};

use super::pool::{Listener, Pool};

/// Builder for constructing a [`Pool`] with optional features.
pub struct PoolBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl PoolBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive pool and decorator events (task lifecycle, failures,
    /// timeouts, retries) through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the pool.
    ///
    /// With subscribers configured this spawns the listener that feeds them, so it must
    /// be called within a Tokio runtime; call [`Pool::shutdown`] to flush them.
    pub fn build(self) -> Pool {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());

        let listener = if self.subscribers.is_empty() {
            None
        } else {
            let set = SubscriberSet::new(self.subscribers, Some(bus.clone()));
            let stop = CancellationToken::new();
            let handle = spawn_listener(&bus, set, stop.clone());
            Some(Listener { stop, handle })
        };

        Pool::new_internal(self.cfg, bus, listener)
    }
}
