use std::future::Future;

use futures::StreamExt;

use crate::combinators::indexed;
use crate::error::AggregateError;
use crate::slots::Slots;

/// Succeeds with the first task to succeed, ignoring failures as they arrive.
///
/// Fails only when every task has failed, with an [`AggregateError`] holding each
/// reason in input order. Empty input fails immediately with an empty aggregate,
/// since no success is possible.
pub async fn any<I, F, T, E>(tasks: I) -> Result<T, AggregateError<E>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    let mut pending = indexed(tasks);
    let mut errors = Slots::with_len(pending.len());

    while let Some((index, res)) = pending.next().await {
        match res {
            Ok(value) => return Ok(value),
            Err(e) => errors.fill(index, e),
        }
    }
    Err(AggregateError::new(errors.into_vec()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::testing::delayed;

    #[tokio::test(start_paused = true)]
    async fn resolves_with_first_fulfilled() {
        let res = any(vec![
            delayed(Err("error1"), 0),
            delayed(Ok("success"), 10),
            delayed(Err("error2"), 0),
        ])
        .await;
        assert_eq!(res, Ok("success"));
    }

    #[tokio::test(start_paused = true)]
    async fn resolves_with_fastest_success() {
        let res = any(vec![
            delayed(Ok::<_, &str>("slow"), 100),
            delayed(Ok("fast"), 10),
        ])
        .await;
        assert_eq!(res, Ok("fast"));
    }

    #[tokio::test(start_paused = true)]
    async fn aggregate_keeps_input_order() {
        let res = any(vec![
            delayed(Err::<u8, _>("a"), 30),
            delayed(Err("b"), 10),
            delayed(Err("c"), 20),
        ])
        .await;
        let err = res.unwrap_err();
        assert_eq!(err.len(), 3);
        assert_eq!(err.errors(), &["a", "b", "c"]);
    }

    #[tokio::test]
    async fn empty_input_fails_with_empty_aggregate() {
        let tasks: Vec<std::future::Ready<Result<u8, &str>>> = Vec::new();
        let err = any(tasks).await.unwrap_err();
        assert!(err.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn loser_settling_later_does_not_alter_outcome() {
        let loser_ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&loser_ran);
        let loser = async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            flag.store(true, Ordering::SeqCst);
            Err::<&str, &str>("late")
        };

        type Boxed = std::pin::Pin<Box<dyn Future<Output = Result<&'static str, &'static str>>>>;
        let tasks: Vec<Boxed> = vec![Box::pin(loser), Box::pin(delayed(Ok("winner"), 10))];

        let res = any(tasks).await;
        assert_eq!(res, Ok("winner"));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!loser_ran.load(Ordering::SeqCst), "loser was not dropped");
    }
}
