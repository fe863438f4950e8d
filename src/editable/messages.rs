//! Intent types consumed by the edit engine.

use super::cursor::SegmentPosition;
use super::segment::SegmentId;
use super::selection::EditorSelection;

/// Target for horizontal / boundary caret movement.
///
/// Vertical movement needs layout information and is resolved by the
/// coordinate mapper into a [`EditIntent::SetCaret`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveTarget {
    /// One unit left (a chip counts as one stop)
    Left,
    /// One unit right
    Right,
    /// After the previous newline, or document start
    LineStart,
    /// Before the next newline, or document end
    LineEnd,
    DocumentStart,
    DocumentEnd,
}

/// A single user intent. The engine applies exactly one at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum EditIntent {
    // === Insertion ===
    /// Splice `text` into a specific text segment
    InsertText {
        segment_id: SegmentId,
        offset: usize,
        text: String,
    },
    /// Insert at the caret (typing, paste), replacing any selection
    InsertAtCaret(String),
    /// Insert a literal newline
    Enter,

    // === Deletion ===
    /// Delete before the caret
    Backspace,
    /// Delete after the caret
    DeleteForward,
    /// Delete the current (non-collapsed) selection
    DeleteRange,
    /// Replace the current selection with text
    ReplaceRange(String),

    // === Dropdowns ===
    ChangeDropdown {
        segment_id: SegmentId,
        value: String,
    },
    AddCustomOption {
        segment_id: SegmentId,
        value: String,
    },
    DeleteDropdown(SegmentId),
    ConvertDropdownToText {
        segment_id: SegmentId,
        text: String,
    },

    // === Caret / selection ===
    Move(MoveTarget),
    MoveWithSelection(MoveTarget),
    SetCaret(SegmentPosition),
    SetSelection(EditorSelection),
    SelectAll,
}

impl EditIntent {
    /// Check if this intent can change segment content
    pub fn is_editing(&self) -> bool {
        !self.is_movement()
    }

    /// Check if this intent only moves the caret or selection
    pub fn is_movement(&self) -> bool {
        matches!(
            self,
            EditIntent::Move(_)
                | EditIntent::MoveWithSelection(_)
                | EditIntent::SetCaret(_)
                | EditIntent::SetSelection(_)
                | EditIntent::SelectAll
        )
    }

    /// Check if this intent can introduce literal token syntax
    pub fn introduces_text(&self) -> bool {
        matches!(
            self,
            EditIntent::InsertText { .. }
                | EditIntent::InsertAtCaret(_)
                | EditIntent::Enter
                | EditIntent::ReplaceRange(_)
                | EditIntent::ConvertDropdownToText { .. }
        )
    }
}
