//! Linear undo/redo history over whole-document snapshots.
//!
//! DESIGN
//! ======
//! Every committed mutation pushes a deep copy of the three element
//! collections. Snapshots are full values, not diffs: tactics hold tens of
//! elements, so copying is cheap and restoring is a plain replace.
//!
//! The stack always holds at least one entry, and `index` always addresses a
//! valid entry. Pushing after an undo discards the redo branch. When the stack
//! grows past `max_len` the oldest entry is evicted, which shifts every index
//! down by one; `index` stays pinned to the newest entry.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use tracing::debug;

use crate::consts::MAX_HISTORY_LENGTH;
use crate::doc::Document;

/// Bounded snapshot stack driving undo/redo.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Document>,
    index: usize,
    max_len: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(&Document::default(), MAX_HISTORY_LENGTH)
    }
}

impl History {
    /// Start a history whose only entry is `initial`. `max_len` is raised to at least 1.
    #[must_use]
    pub fn new(initial: &Document, max_len: usize) -> Self {
        let mut entries = VecDeque::with_capacity(max_len.max(1));
        entries.push_back(initial.clone());
        Self { entries, index: 0, max_len: max_len.max(1) }
    }

    /// Record `doc` as the newest entry, discarding any redo branch.
    pub fn snapshot(&mut self, doc: &Document) {
        self.entries.truncate(self.index + 1);
        self.entries.push_back(doc.clone());
        while self.entries.len() > self.max_len {
            self.entries.pop_front();
            debug!(max_len = self.max_len, "history evicted oldest snapshot");
        }
        self.index = self.entries.len() - 1;
    }

    /// Step back one entry and return it. `None` when already at the oldest entry.
    pub fn undo(&mut self) -> Option<&Document> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    /// Step forward one entry and return it. `None` when already at the newest entry.
    pub fn redo(&mut self) -> Option<&Document> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    /// Drop every entry and start over from `doc`.
    pub fn reset(&mut self, doc: &Document) {
        self.entries.clear();
        self.entries.push_back(doc.clone());
        self.index = 0;
    }

    /// The entry at the current index.
    #[must_use]
    pub fn current(&self) -> Option<&Document> {
        self.entries.get(self.index)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Position of the current entry in the stack.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of retained entries. Never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn max_len(&self) -> usize {
        self.max_len
    }
}
