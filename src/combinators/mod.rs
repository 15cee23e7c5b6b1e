//! # Settlement collectors.
//!
//! Future-level combinators that fold a fixed collection of tasks into one outcome.
//! Every input is polled concurrently inside the returned future (no spawning, no
//! `Send` bound); the aggregate stops polling and drops the remaining inputs the
//! moment its termination condition is met.
//!
//! | Combinator       | Resolves when                | Output order     | Fails with                 |
//! |------------------|------------------------------|------------------|----------------------------|
//! | [`all`]          | every task succeeded         | input            | first failure (completion) |
//! | [`race`]         | first task settled           | n/a              | that task's failure        |
//! | [`all_settled`]  | every task settled           | input            | never                      |
//! | [`any`]          | first task succeeded         | n/a              | [`AggregateError`](crate::AggregateError) |
//! | [`first_n`]      | `n` tasks succeeded          | completion       | [`FirstNError`](crate::FirstNError)       |
//! | [`sequence`]     | every factory succeeded      | input            | first failure              |
//! | [`fallback`]     | first factory succeeded      | n/a              | [`AggregateError`](crate::AggregateError) |

mod all;
mod all_settled;
mod any;
mod first_n;
mod race;
mod sequential;
mod settlement;

pub use all::all;
pub use all_settled::all_settled;
pub use any::any;
pub use first_n::first_n;
pub use race::race;
pub use sequential::{fallback, sequence};
pub use settlement::{Settlement, SettlementStatus};

use std::future::Future;

use futures::stream::FuturesUnordered;

/// Tags each task with its input position so out-of-order completions can be
/// written back into index-addressed storage.
fn indexed<I, F>(tasks: I) -> FuturesUnordered<impl Future<Output = (usize, F::Output)>>
where
    I: IntoIterator<Item = F>,
    F: Future,
{
    tasks
        .into_iter()
        .enumerate()
        .map(|(index, task)| async move { (index, task.await) })
        .collect()
}
