//! # Sequential combinators.
//!
//! Unlike the settlement collectors, these run one task at a time: a factory is
//! only invoked after the previous task has settled.
//!
//! - [`sequence`] runs every factory in order and stops at the first failure.
//! - [`fallback`] tries factories in order until one succeeds.

use std::future::Future;

use crate::error::AggregateError;

/// Runs factories one after another and collects their values in order.
///
/// The first failure is returned and later factories are never invoked.
pub async fn sequence<I, F, Fut, T, E>(factories: I) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let factories = factories.into_iter();
    let mut values = Vec::with_capacity(factories.size_hint().0);
    for factory in factories {
        values.push(factory().await?);
    }
    Ok(values)
}

/// Tries factories in order and returns the first success.
///
/// When every factory fails (or none is given) the error holds each reason in order,
/// so the last factory's failure is [`AggregateError::errors`]`().last()`.
pub async fn fallback<I, F, Fut, T, E>(factories: I) -> Result<T, AggregateError<E>>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut errors = Vec::new();
    for factory in factories {
        match factory().await {
            Ok(value) => return Ok(value),
            Err(e) => errors.push(e),
        }
    }
    Err(AggregateError::new(errors))
}
