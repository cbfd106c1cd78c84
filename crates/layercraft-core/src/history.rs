//! Bounded undo/redo history of full layer-sequence snapshots.

use crate::layer::Layer;
use crate::store::LayerStore;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of undo steps to keep.
pub const MAX_UNDO_HISTORY: usize = 20;

/// An independent copy of the layer sequence, back to front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub layers: Vec<Layer>,
}

impl HistoryEntry {
    pub fn capture(store: &LayerStore) -> Self {
        Self { layers: store.to_vec() }
    }

    fn matches(&self, store: &LayerStore) -> bool {
        self.layers.len() == store.len() && self.layers.iter().zip(store.ordered()).all(|(a, b)| a == b)
    }
}

/// Linear undo/redo stacks. Any new snapshot invalidates redo.
///
/// Gesture sessions record their pre-gesture state with [`History::checkpoint`]
/// and push it with [`History::commit_checkpoint`] once the session ends, so a
/// whole gesture is one undo step.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    capacity: usize,
    checkpoint: Option<HistoryEntry>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_UNDO_HISTORY)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(capacity),
            redo_stack: Vec::new(),
            capacity,
            checkpoint: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Push the current state onto the undo stack and clear redo.
    pub fn snapshot(&mut self, store: &LayerStore) {
        self.push(HistoryEntry::capture(store));
    }

    fn push(&mut self, entry: HistoryEntry) {
        self.push_undo(entry);
        self.redo_stack.clear();
    }

    fn push_undo(&mut self, entry: HistoryEntry) {
        self.undo_stack.push_back(entry);
        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
        }
    }

    /// Restore the most recent undo entry. Returns `false` if there is none.
    pub fn undo(&mut self, store: &mut LayerStore) -> bool {
        let Some(entry) = self.undo_stack.pop_back() else {
            return false;
        };
        self.redo_stack.push(HistoryEntry::capture(store));
        store.restore(entry.layers);
        true
    }

    /// Restore the most recent redo entry. Returns `false` if there is none.
    pub fn redo(&mut self, store: &mut LayerStore) -> bool {
        let Some(entry) = self.redo_stack.pop() else {
            return false;
        };
        self.push_undo(HistoryEntry::capture(store));
        store.restore(entry.layers);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Remember the current state as the start of a gesture.
    pub fn checkpoint(&mut self, store: &LayerStore) {
        self.checkpoint = Some(HistoryEntry::capture(store));
    }

    pub fn has_checkpoint(&self) -> bool {
        self.checkpoint.is_some()
    }

    /// Re-take a pending checkpoint after the store changed outside the gesture.
    pub fn refresh_checkpoint(&mut self, store: &LayerStore) {
        if self.checkpoint.is_some() {
            self.checkpoint(store);
        }
    }

    /// Push the pending checkpoint if the store has changed since it was taken.
    ///
    /// Returns `true` if an undo entry was recorded.
    pub fn commit_checkpoint(&mut self, store: &LayerStore) -> bool {
        match self.checkpoint.take() {
            Some(entry) if !entry.matches(store) => {
                self.push(entry);
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.checkpoint = None;
    }
}
