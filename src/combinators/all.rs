use std::future::Future;

use futures::StreamExt;

use crate::combinators::indexed;
use crate::slots::Slots;

/// Waits for every task to succeed and returns their values in input order.
///
/// All tasks are polled concurrently. The first failure (by completion time, not by
/// input position) is returned immediately and the remaining tasks are dropped.
/// Empty input succeeds with an empty list.
///
/// # Example
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use futures::future::ready;
///
/// let values = taskweave::all(vec![ready(Ok::<_, &str>(1)), ready(Ok(2))]).await;
/// assert_eq!(values, Ok(vec![1, 2]));
/// # }
/// ```
pub async fn all<I, F, T, E>(tasks: I) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    let mut pending = indexed(tasks);
    let mut results = Slots::with_len(pending.len());

    while let Some((index, res)) = pending.next().await {
        results.fill(index, res?);
    }
    Ok(results.into_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::delayed;

    #[tokio::test(start_paused = true)]
    async fn resolves_with_all_values() {
        let res = all(vec![
            delayed(Ok::<_, &str>(1), 0),
            delayed(Ok(2), 0),
            delayed(Ok(3), 0),
        ])
        .await;
        assert_eq!(res, Ok(vec![1, 2, 3]));
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_input_order_despite_completion_order() {
        let res = all(vec![
            delayed(Ok::<_, &str>("slow"), 30),
            delayed(Ok("fast"), 10),
            delayed(Ok("medium"), 20),
        ])
        .await;
        assert_eq!(res, Ok(vec!["slow", "fast", "medium"]));
    }

    #[tokio::test(start_paused = true)]
    async fn rejects_with_the_failure() {
        let res = all(vec![
            delayed(Ok(1), 0),
            delayed(Err("x"), 0),
            delayed(Ok(3), 0),
        ])
        .await;
        assert_eq!(res, Err("x"));
    }

    #[tokio::test(start_paused = true)]
    async fn first_failure_by_completion_wins() {
        let start = tokio::time::Instant::now();
        let res = all(vec![
            delayed(Err::<u8, _>("late"), 50),
            delayed(Ok(1), 500),
            delayed(Err("early"), 10),
        ])
        .await;
        assert_eq!(res, Err("early"));
        assert!(start.elapsed() < std::time::Duration::from_millis(50));
    }

    #[tokio::test]
    async fn empty_input_resolves_immediately() {
        let tasks: Vec<std::future::Ready<Result<u8, &str>>> = Vec::new();
        assert_eq!(all(tasks).await, Ok(vec![]));
    }
}
