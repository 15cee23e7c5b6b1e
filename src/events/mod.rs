//! # Runtime events.
//!
//! - [`Event`] / [`EventKind`]: what happened, with optional metadata.
//! - [`Bus`]: broadcast channel carrying events from publishers to the subscriber listener.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};

pub(crate) use bus::emit;
