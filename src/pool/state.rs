//! Bookkeeping for one pool run.
//!
//! Owned by the driving loop only, so it needs no lock: tasks report back through the
//! `JoinSet` and the loop applies each report here.
//!
//! ```text
//! next ──► first input position not yet launched
//! running ─► tasks launched and not yet settled (never above the limit)
//! results ─► one slot per input position, written once on settle
//! ```

use crate::combinators::Settlement;
use crate::slots::Slots;

pub(crate) struct PoolState<T, E> {
    limit: Option<usize>,
    next: usize,
    running: usize,
    results: Slots<Settlement<T, E>>,
}

impl<T, E> PoolState<T, E> {
    pub(crate) fn new(total: usize, limit: Option<usize>) -> Self {
        Self {
            limit,
            next: 0,
            running: 0,
            results: Slots::with_len(total),
        }
    }

    /// True while unstarted tasks remain and a slot is free.
    pub(crate) fn can_launch(&self) -> bool {
        self.next < self.results.len() && self.limit.is_none_or(|limit| self.running < limit)
    }

    /// Claims the next input position.
    pub(crate) fn launch(&mut self) -> usize {
        let index = self.next;
        self.next += 1;
        self.running += 1;
        index
    }

    /// Records the outcome of the task at `index` and frees its slot.
    pub(crate) fn settle(&mut self, index: usize, outcome: Settlement<T, E>) {
        self.running -= 1;
        self.results.fill(index, outcome);
    }

    pub(crate) fn running(&self) -> usize {
        self.running
    }

    pub(crate) fn total(&self) -> usize {
        self.results.len()
    }

    /// Every input position has settled by the time the run drains.
    pub(crate) fn into_settlements(self) -> Vec<Settlement<T, E>> {
        debug_assert!(self.results.is_complete(), "pool drained with unsettled tasks");
        self.results.into_vec()
    }
}
