//! EditorState - the full editable-document snapshot.

use super::cursor::SegmentPosition;
use super::segment::{normalize, IdAllocator, Segment, SegmentId};
use super::selection::EditorSelection;
use crate::syntax;

/// Segments, selection and derived chip highlight for one editor instance.
///
/// The id allocator travels with the state so that [`crate::editable::apply`]
/// stays a plain `state -> state` function.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub segments: Vec<Segment>,
    pub selection: EditorSelection,
    /// Set exactly when the collapsed caret sits on a dropdown
    pub highlighted_chip: Option<SegmentId>,
    pub(crate) ids: IdAllocator,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    /// Empty editor
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            selection: EditorSelection::default(),
            highlighted_chip: None,
            ids: IdAllocator::new(),
        }
    }

    /// Parse a flat string into a fresh state with the caret at the end
    pub fn from_value(value: &str) -> Self {
        let mut ids = IdAllocator::new();
        let segments = syntax::parse(value, &mut ids);
        Self::from_segments(segments, ids)
    }

    /// Wrap existing segments. Structural invariants are restored first.
    pub fn from_segments(mut segments: Vec<Segment>, mut ids: IdAllocator) -> Self {
        normalize(&mut segments, &mut ids);
        let caret = SegmentPosition::document_end(&segments);
        let mut state = Self {
            segments,
            selection: EditorSelection::collapsed(caret),
            highlighted_chip: None,
            ids,
        };
        state.refresh_highlight();
        state
    }

    /// Caret position (the moving end of the selection)
    pub fn caret(&self) -> SegmentPosition {
        self.selection.caret()
    }

    /// Segment under the caret, if any
    pub fn caret_segment(&self) -> Option<&Segment> {
        self.segments.get(self.caret().segment_index)
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id() == id)
    }

    /// Selection-biased token form
    pub fn serialize(&self) -> String {
        syntax::serialize(&self.segments)
    }

    /// Selected-values-only form
    pub fn flatten(&self) -> String {
        syntax::flatten(&self.segments)
    }

    /// Allocate a new segment id
    pub fn next_id(&mut self) -> SegmentId {
        self.ids.next_id()
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    /// Collapse the selection onto `pos` (clamped)
    pub fn set_caret(&mut self, pos: SegmentPosition) {
        self.selection = EditorSelection::collapsed(pos.clamped(&self.segments));
    }

    /// Collapse the selection onto a unit offset
    pub fn set_caret_units(&mut self, units: usize) {
        self.selection =
            EditorSelection::collapsed(SegmentPosition::from_units(&self.segments, units));
    }

    /// Clamp the selection into bounds and recompute the chip highlight
    pub fn refresh_highlight(&mut self) {
        self.selection.start = self.selection.start.clamped(&self.segments);
        self.selection.end = self.selection.end.clamped(&self.segments);
        self.highlighted_chip = if self.selection.is_collapsed() {
            self.caret_segment()
                .filter(|s| s.is_dropdown())
                .map(Segment::id)
        } else {
            None
        };
    }

    /// Normalize segments while keeping the caret at the same unit offset
    pub(crate) fn normalize_keeping_caret(&mut self, caret_units: usize) {
        normalize(&mut self.segments, &mut self.ids);
        self.set_caret_units(caret_units);
    }
}
