//! Index-addressed result storage.
//!
//! [`Slots`] is allocated up front with one slot per input task. Each slot is written
//! exactly once, by the task that sits at that input position, so output order always
//! matches input order no matter in which order the tasks complete.

#[derive(Debug)]
pub(crate) struct Slots<T> {
    items: Vec<Option<T>>,
    filled: usize,
}

impl<T> Slots<T> {
    /// Allocates `len` empty slots.
    pub(crate) fn with_len(len: usize) -> Self {
        let mut items = Vec::with_capacity(len);
        items.resize_with(len, || None);
        Self { items, filled: 0 }
    }

    /// Writes the value produced by the task at input position `index`.
    pub(crate) fn fill(&mut self, index: usize, value: T) {
        let slot = &mut self.items[index];
        debug_assert!(slot.is_none(), "slot {index} written twice");
        if slot.replace(value).is_none() {
            self.filled += 1;
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.filled == self.items.len()
    }

    /// Returns the stored values in input order, skipping slots never written.
    pub(crate) fn into_vec(self) -> Vec<T> {
        self.items.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_order_fills_come_back_in_input_order() {
        let mut slots = Slots::with_len(3);
        slots.fill(2, "c");
        slots.fill(0, "a");
        assert!(!slots.is_complete());
        slots.fill(1, "b");
        assert!(slots.is_complete());
        assert_eq!(slots.filled, 3);
        assert_eq!(slots.into_vec(), vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_is_complete() {
        let slots: Slots<u8> = Slots::with_len(0);
        assert!(slots.is_complete());
        assert_eq!(slots.len(), 0);
        assert!(slots.into_vec().is_empty());
    }
}
