//! Snapshot-based undo/redo history.

use serde::{Deserialize, Serialize};

/// Default maximum number of undo states to keep.
pub const DEFAULT_MAX_UNDO_HISTORY: usize = 50;

/// History behavior settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of undo snapshots; the oldest is dropped beyond this.
    pub max_depth: usize,
    /// Clear the redo stack when a new edit is committed.
    ///
    /// Off by default: a new edit leaves previously undone states redoable.
    pub clear_redo_on_commit: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_UNDO_HISTORY,
            clear_redo_on_commit: false,
        }
    }
}

/// Undo/redo stacks over snapshots of a live value.
///
/// `History` owns the live value (`current`). Edits mutate it through
/// [`History::current_mut`] and record the state they started from with
/// [`History::commit`].
#[derive(Debug, Clone)]
pub struct History<T: Clone> {
    current: T,
    past: Vec<T>,
    future: Vec<T>,
    config: HistoryConfig,
}

impl<T: Clone + Default> Default for History<T> {
    fn default() -> Self {
        Self::new(T::default(), HistoryConfig::default())
    }
}

impl<T: Clone> History<T> {
    pub fn new(current: T, config: HistoryConfig) -> Self {
        Self {
            current,
            past: Vec::new(),
            future: Vec::new(),
            config,
        }
    }

    pub fn current(&self) -> &T {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut T {
        &mut self.current
    }

    pub fn config(&self) -> HistoryConfig {
        self.config
    }

    /// Record `before`, the state prior to an edit already applied to `current`.
    pub fn commit(&mut self, before: T) {
        self.past.push(before);

        if self.config.clear_redo_on_commit {
            self.future.clear();
        }

        trim_oldest(&mut self.past, self.config.max_depth);
        log::debug!(
            "History commit: {} undo, {} redo",
            self.past.len(),
            self.future.len()
        );
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.past.pop() else {
            return false;
        };
        let previous = std::mem::replace(&mut self.current, snapshot);
        self.future.push(previous);
        trim_oldest(&mut self.future, self.config.max_depth);
        true
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.future.pop() else {
            return false;
        };
        let previous = std::mem::replace(&mut self.current, snapshot);
        self.past.push(previous);
        trim_oldest(&mut self.past, self.config.max_depth);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    /// Drop all history and reset the live value.
    pub fn clear(&mut self)
    where
        T: Default,
    {
        self.current = T::default();
        self.past.clear();
        self.future.clear();
    }
}

/// Drop the oldest snapshots so at most `max_depth` (at least one) remain.
fn trim_oldest<T>(stack: &mut Vec<T>, max_depth: usize) {
    let excess = stack.len().saturating_sub(max_depth.max(1));
    if excess > 0 {
        stack.drain(..excess);
    }
}
