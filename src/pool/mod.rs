//! # Bounded scheduling.
//!
//! - [`Pool`]: runs [`TaskRef`](crate::TaskRef)s with a concurrency limit, a failure
//!   policy, and event publishing.
//! - [`PoolBuilder`]: attaches subscribers to a pool.
//! - [`pooled`]: one-shot fail-fast run with a limit.

mod builder;
#[allow(clippy::module_inception)]
mod pool;
mod state;

pub use builder::PoolBuilder;
pub use pool::{Pool, pooled};
