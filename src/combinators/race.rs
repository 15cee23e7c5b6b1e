use std::future::{self, Future};

use futures::StreamExt;
use futures::stream::FuturesUnordered;

/// Settles with whichever task settles first, success or failure.
///
/// Later settlements are ignored: the remaining tasks are dropped as soon as the
/// winner is known. When several tasks are ready at the same time, the one that
/// was registered first wins.
///
/// Empty input never settles. Combine it with
/// [`with_timeout`](crate::with_timeout) if the task list may be empty.
pub async fn race<I, F, T, E>(tasks: I) -> Result<T, E>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    let mut pending: FuturesUnordered<F> = tasks.into_iter().collect();
    match pending.next().await {
        Some(res) => res,
        None => future::pending().await,
    }
}
