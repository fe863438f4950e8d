//! Logical caret positions inside a segment list.

use serde::Serialize;

use super::segment::Segment;

/// A caret location: segment index plus character offset inside it.
///
/// For dropdown segments the offset is always 0 (caret sits right before the chip).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SegmentPosition {
    pub segment_index: usize,
    pub offset: usize,
}

impl SegmentPosition {
    pub const fn new(segment_index: usize, offset: usize) -> Self {
        Self {
            segment_index,
            offset,
        }
    }

    pub const fn zero() -> Self {
        Self::new(0, 0)
    }

    /// Clamp into valid bounds for `segments`.
    ///
    /// Index is clamped to `[0, len-1]`, offset to the segment length for text
    /// and forced to 0 for dropdowns. An empty document clamps to the origin.
    pub fn clamped(self, segments: &[Segment]) -> Self {
        let Some(last) = segments.len().checked_sub(1) else {
            return Self::zero();
        };
        let segment_index = self.segment_index.min(last);
        let offset = self.offset.min(segments[segment_index].max_offset());
        Self::new(segment_index, offset)
    }

    /// Unit offset of this position from the start of the document
    pub fn to_units(self, segments: &[Segment]) -> usize {
        let pos = self.clamped(segments);
        segments[..pos.segment_index.min(segments.len())]
            .iter()
            .map(Segment::units)
            .sum::<usize>()
            + pos.offset
    }

    /// Resolve a unit offset back to a position.
    ///
    /// Boundaries resolve to text positions where possible: the end of a text
    /// segment wins over the dropdown that follows it, and the unit right after
    /// a dropdown resolves to offset 0 of the next segment. Offsets past the end
    /// clamp to the document end.
    pub fn from_units(segments: &[Segment], units: usize) -> Self {
        let mut remaining = units;
        for (i, segment) in segments.iter().enumerate() {
            match segment {
                Segment::Text(t) => {
                    let len = t.value.chars().count();
                    if remaining <= len {
                        return Self::new(i, remaining);
                    }
                    remaining -= len;
                }
                Segment::Dropdown(_) => {
                    if remaining == 0 {
                        return Self::new(i, 0);
                    }
                    remaining -= 1;
                }
            }
        }
        Self::document_end(segments)
    }

    /// Last caret position in the document
    pub fn document_end(segments: &[Segment]) -> Self {
        match segments.last() {
            Some(last) => Self::new(segments.len() - 1, last.max_offset()),
            None => Self::zero(),
        }
    }
}
