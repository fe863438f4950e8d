//! Edit history (undo/redo) for the prompt editor.
//!
//! The engine produces whole new states, so history stores snapshots rather
//! than inverse operations.

use super::state::EditorState;

/// Default number of undo steps kept
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// Edit history with undo/redo stacks of state snapshots.
#[derive(Debug, Clone)]
pub struct EditHistory {
    undo_stack: Vec<EditorState>,
    redo_stack: Vec<EditorState>,
    max_size: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl EditHistory {
    /// Create a new edit history with default max size
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_HISTORY_LIMIT)
    }

    /// Create a new edit history with specified max size
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
        }
    }

    /// Record the state as it was before an edit (clears redo stack)
    pub fn push(&mut self, before: EditorState) {
        self.redo_stack.clear();
        self.undo_stack.push(before);

        // Trim if exceeded max size
        if self.undo_stack.len() > self.max_size {
            let excess = self.undo_stack.len() - self.max_size;
            self.undo_stack.drain(..excess);
        }
    }

    /// Step back. `current` moves onto the redo stack.
    ///
    /// The returned snapshot's id allocator is advanced past `current`'s so ids
    /// handed out after the undo never collide with ones already used.
    pub fn undo(&mut self, current: &EditorState) -> Option<EditorState> {
        let mut previous = self.undo_stack.pop()?;
        previous.ids.advance_past(&current.ids);
        self.redo_stack.push(current.clone());
        Some(previous)
    }

    /// Step forward again. `current` moves onto the undo stack.
    pub fn redo(&mut self, current: &EditorState) -> Option<EditorState> {
        let mut next = self.redo_stack.pop()?;
        next.ids.advance_past(&current.ids);
        self.undo_stack.push(current.clone());
        Some(next)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Get the number of operations in the undo stack
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of operations in the redo stack
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}
