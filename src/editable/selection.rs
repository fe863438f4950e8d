//! Selection type for the prompt editor.

use serde::Serialize;

use super::cursor::SegmentPosition;

/// A selection between two positions. `start` is where the selection was
/// anchored, `end` is where the caret is; they are not necessarily ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EditorSelection {
    pub start: SegmentPosition,
    pub end: SegmentPosition,
}

impl EditorSelection {
    pub fn new(start: SegmentPosition, end: SegmentPosition) -> Self {
        Self { start, end }
    }

    /// Create a collapsed selection (a caret)
    pub fn collapsed(pos: SegmentPosition) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// The caret (moving end)
    pub fn caret(&self) -> SegmentPosition {
        self.end
    }

    /// `(min, max)` of the two ends
    pub fn ordered(&self) -> (SegmentPosition, SegmentPosition) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }

    /// Move the caret, keeping the anchor
    pub fn extend_to(&mut self, pos: SegmentPosition) {
        self.end = pos;
    }
}
