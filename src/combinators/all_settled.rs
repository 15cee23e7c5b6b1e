use std::future::Future;

use futures::StreamExt;

use crate::combinators::{Settlement, indexed};
use crate::slots::Slots;

/// Waits for every task to settle and reports each outcome in input order.
///
/// Never fails: each failure is converted into a [`Settlement::Rejected`] at the
/// position of the task that produced it.
pub async fn all_settled<I, F, T, E>(tasks: I) -> Vec<Settlement<T, E>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    let mut pending = indexed(tasks);
    let mut results = Slots::with_len(pending.len());

    while let Some((index, res)) = pending.next().await {
        results.fill(index, Settlement::from(res));
    }
    results.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinators::SettlementStatus;
    use crate::testing::delayed;

    #[tokio::test(start_paused = true)]
    async fn returns_status_for_all_tasks() {
        let res = all_settled(vec![
            delayed(Ok(1), 30),
            delayed(Err("error"), 10),
            delayed(Ok(3), 20),
        ])
        .await;

        assert_eq!(
            res,
            vec![
                Settlement::Fulfilled(1),
                Settlement::Rejected("error"),
                Settlement::Fulfilled(3),
            ]
        );
        let tags: Vec<_> = res.iter().map(Settlement::status).collect();
        assert_eq!(
            tags,
            vec![
                SettlementStatus::Fulfilled,
                SettlementStatus::Rejected,
                SettlementStatus::Fulfilled
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn never_rejects() {
        let res = all_settled(vec![delayed(Err::<u8, _>("a"), 5), delayed(Err("b"), 1)]).await;
        assert_eq!(
            res,
            vec![Settlement::Rejected("a"), Settlement::Rejected("b")]
        );
    }

    #[tokio::test]
    async fn empty_input() {
        let tasks: Vec<std::future::Ready<Result<u8, &str>>> = Vec::new();
        assert!(all_settled(tasks).await.is_empty());
    }
}
