use std::collections::VecDeque;

/// Entries kept on each of the undo and redo stacks.
pub const MAX_HISTORY: usize = 50;

/// Undo/redo log around a `present` value.
///
/// `past` and `future` each hold at most `limit` entries; the oldest are dropped first.
#[derive(Clone, Debug)]
pub struct History<T> {
    past: VecDeque<T>,
    present: T,
    future: VecDeque<T>,
    limit: usize,
}

impl<T: Clone> History<T> {
    pub fn new(present: T) -> Self {
        Self::with_limit(present, MAX_HISTORY)
    }

    pub fn with_limit(present: T, limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            present,
            future: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    pub fn present(&self) -> &T {
        &self.present
    }

    /// Make `next` the present, pushing the old one onto `past` and clearing `future`.
    pub fn push(&mut self, next: T) {
        let prev = std::mem::replace(&mut self.present, next);
        self.past.push_back(prev);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        self.future.clear();
    }

    /// Step back one entry. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(prev) = self.past.pop_back() else {
            return false;
        };
        let cur = std::mem::replace(&mut self.present, prev);
        self.future.push_front(cur);
        self.future.truncate(self.limit);
        true
    }

    /// Step forward one entry. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let cur = std::mem::replace(&mut self.present, next);
        self.past.push_back(cur);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Drop both stacks, keeping the present.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    /// Oldest first.
    pub fn past(&self) -> impl ExactSizeIterator<Item = &T> {
        self.past.iter()
    }

    /// Next redo first.
    pub fn future(&self) -> impl ExactSizeIterator<Item = &T> {
        self.future.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/history.rs"]
mod tests;
