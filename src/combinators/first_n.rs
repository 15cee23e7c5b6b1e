use std::future::Future;

use futures::StreamExt;

use crate::combinators::indexed;
use crate::error::FirstNError;
use crate::slots::Slots;

/// Collects the first `n` successful values, in completion order.
///
/// All tasks start at once. Failures neither help nor prevent progress toward `n`.
/// The call resolves the instant the `n`-th success arrives and drops every
/// straggler, so later settlements cannot change the result.
///
/// If every task settles before `n` successes arrive, the call fails with a
/// [`FirstNError`] carrying the values that did arrive and the failures in input
/// order. `n == 0` resolves immediately with an empty list.
pub async fn first_n<I, F, T, E>(tasks: I, n: usize) -> Result<Vec<T>, FirstNError<T, E>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut pending = indexed(tasks);
    let mut values = Vec::with_capacity(n.min(pending.len()));
    let mut errors = Slots::with_len(pending.len());

    while let Some((index, res)) = pending.next().await {
        match res {
            Ok(value) => {
                values.push(value);
                if values.len() == n {
                    return Ok(values);
                }
            }
            Err(e) => errors.fill(index, e),
        }
    }

    Err(FirstNError {
        needed: n,
        values,
        errors: errors.into_vec(),
    })
}
