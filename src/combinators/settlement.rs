//! # Per-task outcome record.
//!
//! [`Settlement`] is the tagged terminal outcome of one task, as produced by
//! [`all_settled`](crate::all_settled) and [`Pool::run_settled`](crate::Pool::run_settled).
//! It is a pure projection of `Result<T, E>` and converts both ways.

/// Tag of a [`Settlement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementStatus {
    /// The task succeeded.
    Fulfilled,
    /// The task failed.
    Rejected,
}

/// Terminal outcome of a single task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement<T, E> {
    /// The task succeeded with a value.
    Fulfilled(T),
    /// The task failed with a reason.
    Rejected(E),
}

impl<T, E> Settlement<T, E> {
    /// Returns the status tag.
    pub fn status(&self) -> SettlementStatus {
        match self {
            Settlement::Fulfilled(_) => SettlementStatus::Fulfilled,
            Settlement::Rejected(_) => SettlementStatus::Rejected,
        }
    }

    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Settlement::Fulfilled(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Settlement::Rejected(_))
    }

    /// The success value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Settlement::Fulfilled(v) => Some(v),
            Settlement::Rejected(_) => None,
        }
    }

    /// The failure reason, if any.
    pub fn reason(&self) -> Option<&E> {
        match self {
            Settlement::Fulfilled(_) => None,
            Settlement::Rejected(e) => Some(e),
        }
    }

    pub fn into_result(self) -> Result<T, E> {
        match self {
            Settlement::Fulfilled(v) => Ok(v),
            Settlement::Rejected(e) => Err(e),
        }
    }
}

impl<T, E> From<Result<T, E>> for Settlement<T, E> {
    fn from(res: Result<T, E>) -> Self {
        match res {
            Ok(v) => Settlement::Fulfilled(v),
            Err(e) => Settlement::Rejected(e),
        }
    }
}

impl<T, E> From<Settlement<T, E>> for Result<T, E> {
    fn from(s: Settlement<T, E>) -> Self {
        s.into_result()
    }
}
