//! # Task abstractions and specifications.
//!
//! This module provides the core task-related types:
//! - [`Task`] - trait for implementing async cancelable tasks
//! - [`TaskFn`] - function-based task implementation
//! - [`TaskRef`] - shared reference to a task (`Arc<dyn Task<T, E>>`)
//! - [`TaskSpec`] - specification bundling a task with retry and timeout
//! - [`TaskSpecBuilder`] - fluent construction of a [`TaskSpec`]

mod spec;
mod spec_builder;
mod task;
mod task_fn;

pub use spec::TaskSpec;
pub use spec_builder::TaskSpecBuilder;
pub use task::{BoxTaskFuture, Task, TaskRef};
pub use task_fn::TaskFn;
