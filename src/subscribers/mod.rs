//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out and,
//! behind the `logging` feature, the built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Pool / decorators ── publish(Event) ──► Bus ──► listener ──► SubscriberSet
//!                                                                   │
//!                                                     ┌─────────────┼─────────────┐
//!                                                     ▼             ▼             ▼
//!                                                 LogWriter      Metrics       Custom
//! ```

mod listener;
#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

pub use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;

pub(crate) use listener::spawn_listener;
