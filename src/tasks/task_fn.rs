//! # Function-backed task (`TaskFn`)
//!
//! [`TaskFn`] wraps a closure `F: Fn(CancellationToken) -> Fut`, producing a fresh
//! future per spawn. No state is shared between spawns unless the closure captures
//! it explicitly (e.g. through an `Arc`).
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use taskweave::{TaskFn, TaskRef, TaskError};
//!
//! let t: TaskRef<u32, TaskError> = TaskFn::arc("answer", |_ctx: CancellationToken| async move {
//!     Ok::<_, TaskError>(42)
//! });
//!
//! assert_eq!(t.name(), "answer");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::tasks::task::{BoxTaskFuture, Task};

/// Function-backed task implementation.
#[derive(Debug)]
pub struct TaskFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new function-backed task.
    ///
    /// Prefer [`TaskFn::arc`] when you immediately need a [`TaskRef`](crate::TaskRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the task and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F, Fut, T, E> Task<T, E> for TaskFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn spawn(&self, ctx: CancellationToken) -> BoxTaskFuture<T, E> {
        Box::pin((self.f)(ctx))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{TaskError, TaskRef};

    #[tokio::test]
    async fn each_spawn_creates_a_fresh_future() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let task: TaskRef<usize, TaskError> = TaskFn::arc("count", move |_ctx: CancellationToken| {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Ok::<_, TaskError>(n) }
        });

        let first = task.spawn(CancellationToken::new());
        let second = task.spawn(CancellationToken::new());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(second.await, Ok(2));
        assert_eq!(first.await, Ok(1));
    }

    #[tokio::test]
    async fn receives_the_token() {
        let task = TaskFn::new("cancelled", |ctx: CancellationToken| async move {
            if ctx.is_cancelled() {
                Err(TaskError::Canceled)
            } else {
                Ok(())
            }
        });
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(task.spawn(token).await, Err(TaskError::Canceled));
        assert_eq!(Task::<(), TaskError>::name(&task), "cancelled");
    }
}
