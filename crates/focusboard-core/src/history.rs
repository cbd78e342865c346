//! Bounded undo/redo history of whole-state snapshots.
//!
//! The manager never diffs. Callers capture the pre-mutation state and
//! `push` it before applying a change; `undo`/`redo` swap the caller's
//! current state for a stored one.
//!
//! ```text
//! push(s)       past: [.., s]      future: []
//! undo(cur)     past: [..]         future: [.., cur]   -> returns s
//! redo(cur)     past: [.., cur]    future: [..]        -> returns top of future
//! ```

use std::collections::VecDeque;

/// Default maximum number of snapshots kept on each stack.
pub const MAX_HISTORY: usize = 50;

#[derive(Debug, Clone)]
pub struct HistoryManager<S> {
    past: VecDeque<S>,
    future: VecDeque<S>,
    capacity: usize,
}

impl<S: Clone> HistoryManager<S> {
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY)
    }

    /// Create a manager keeping at most `capacity` entries per stack.
    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record a pre-mutation snapshot. Discards the redo branch.
    pub fn push(&mut self, snapshot: S) {
        self.future.clear();
        Self::push_bounded(&mut self.past, snapshot, self.capacity);
    }

    /// Step back. Returns `None` when there is nothing to undo.
    pub fn undo(&mut self, current: S) -> Option<S> {
        let previous = self.past.pop_back()?;
        Self::push_bounded(&mut self.future, current, self.capacity);
        Some(previous)
    }

    /// Step forward. Returns `None` when there is nothing to redo.
    pub fn redo(&mut self, current: S) -> Option<S> {
        let next = self.future.pop_back()?;
        Self::push_bounded(&mut self.past, current, self.capacity);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Drop both stacks (used after wholesale imports).
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    fn push_bounded(stack: &mut VecDeque<S>, snapshot: S, capacity: usize) {
        stack.push_back(snapshot);
        while stack.len() > capacity {
            stack.pop_front();
        }
    }
}

impl<S: Clone> Default for HistoryManager<S> {
    fn default() -> Self {
        Self::new()
    }
}
