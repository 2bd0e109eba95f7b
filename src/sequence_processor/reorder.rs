//! Restores input order for results arriving out of order from the worker pool.

use std::collections::VecDeque;

/// Releases items strictly in index order.
///
/// Index `i` is held back until every index below it has been released.
/// Storage is a sparse window starting at the next index to release.
#[derive(Debug)]
pub struct ReorderBuffer<T> {
    window: VecDeque<Option<T>>,
    next_index: u64,
    pending: usize,
}

impl<T> Default for ReorderBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReorderBuffer<T> {
    pub fn new() -> Self {
        Self {
            window: VecDeque::new(),
            next_index: 0,
            pending: 0,
        }
    }

    /// Stores `item` under `index`. Indices already released are ignored.
    pub fn insert(&mut self, index: u64, item: T) {
        if index < self.next_index {
            return;
        }
        let offset = (index - self.next_index) as usize;
        if offset >= self.window.len() {
            self.window.resize_with(offset + 1, || None);
        }
        if self.window[offset].replace(item).is_none() {
            self.pending += 1;
        }
    }

    /// Pops the next item in order if it has arrived.
    pub fn pop_next(&mut self) -> Option<T> {
        match self.window.front() {
            Some(Some(_)) => {
                self.next_index += 1;
                self.pending -= 1;
                self.window.pop_front().flatten()
            }
            _ => None,
        }
    }

    /// Items received but not yet releasable
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending == 0
    }
}
