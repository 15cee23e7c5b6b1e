use std::borrow::Cow;
use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{RetryPolicy, TaskFn, TaskRef, TaskSpec};

/// Builder for [`TaskSpec`] with fluent API.
#[derive(Clone, Debug)]
pub struct TaskSpecBuilder {
    name: Cow<'static, str>,
    retry: RetryPolicy,
    timeout: Option<Duration>,
}

impl TaskSpecBuilder {
    /// Creates a new builder with the given task name.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            retry: RetryPolicy::default(),
            timeout: None,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the spec from a closure.
    pub fn build<F, Fut, T, E>(self, f: F) -> TaskSpec<T, E>
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let task: TaskRef<T, E> = TaskFn::arc(self.name, f);
        TaskSpec::new(task, self.retry, self.timeout)
    }

    /// Builds the spec from an existing task; the builder's name is ignored.
    pub fn build_from_task<T, E>(self, task: TaskRef<T, E>) -> TaskSpec<T, E> {
        TaskSpec::new(task, self.retry, self.timeout)
    }
}
