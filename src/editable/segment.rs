//! Segment types for the prompt editor.
//!
//! Editor content is an ordered list of [`Segment`]s. A segment is either a run
//! of plain text or an atomic dropdown token. Dropdowns occupy exactly one
//! "unit" of the document, text occupies one unit per character.

use serde::Serialize;
use std::fmt;

/// Sentinel option that opens free-text entry instead of selecting a value.
pub const CUSTOM_OPTION: &str = "custom...";

/// Stable identifier of a segment within one editor instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SegmentId(u64);

impl SegmentId {
    /// Rebuild an id from its raw value (e.g. a DOM key handed back by the host)
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seg-{}", self.0)
    }
}

/// Monotonic id source. Ids are never reused for the lifetime of the allocator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Hand out the next id
    pub fn next_id(&mut self) -> SegmentId {
        let id = SegmentId(self.next);
        self.next += 1;
        id
    }

    /// Make sure this allocator never issues an id the other one already issued.
    ///
    /// Needed when an older snapshot (undo) replaces the live state.
    pub fn advance_past(&mut self, other: &IdAllocator) {
        self.next = self.next.max(other.next);
    }

    /// Number of ids issued so far
    pub fn issued(&self) -> u64 {
        self.next - 1
    }
}

/// A run of plain characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextSegment {
    pub id: SegmentId,
    pub value: String,
}

/// An inline multiple-choice field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownSegment {
    pub id: SegmentId,
    /// Unique options in display order, always containing [`CUSTOM_OPTION`]
    pub options: Vec<String>,
    pub selected: String,
}

impl DropdownSegment {
    /// Build a dropdown from already-cleaned options. The first non-sentinel
    /// option becomes the selection. Returns `None` if there is nothing to select.
    pub fn from_options(id: SegmentId, options: Vec<String>) -> Option<Self> {
        let selected = options.iter().find(|o| o.as_str() != CUSTOM_OPTION)?.clone();
        let mut options = options;
        if !options.iter().any(|o| o == CUSTOM_OPTION) {
            options.push(CUSTOM_OPTION.to_string());
        }
        Some(Self {
            id,
            options,
            selected,
        })
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o == value)
    }

    /// Options other than the custom-entry sentinel
    pub fn choices(&self) -> impl Iterator<Item = &str> {
        self.options
            .iter()
            .map(String::as_str)
            .filter(|o| *o != CUSTOM_OPTION)
    }
}

/// Atomic unit of editor content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    Text(TextSegment),
    Dropdown(DropdownSegment),
}

impl Segment {
    pub fn text(id: SegmentId, value: impl Into<String>) -> Self {
        Segment::Text(TextSegment {
            id,
            value: value.into(),
        })
    }

    pub fn id(&self) -> SegmentId {
        match self {
            Segment::Text(t) => t.id,
            Segment::Dropdown(d) => d.id,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Segment::Text(_))
    }

    pub fn is_dropdown(&self) -> bool {
        matches!(self, Segment::Dropdown(_))
    }

    pub fn as_text(&self) -> Option<&TextSegment> {
        match self {
            Segment::Text(t) => Some(t),
            Segment::Dropdown(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextSegment> {
        match self {
            Segment::Text(t) => Some(t),
            Segment::Dropdown(_) => None,
        }
    }

    pub fn as_dropdown(&self) -> Option<&DropdownSegment> {
        match self {
            Segment::Dropdown(d) => Some(d),
            Segment::Text(_) => None,
        }
    }

    pub fn as_dropdown_mut(&mut self) -> Option<&mut DropdownSegment> {
        match self {
            Segment::Dropdown(d) => Some(d),
            Segment::Text(_) => None,
        }
    }

    /// Largest valid caret offset inside this segment (0 for dropdowns)
    pub fn max_offset(&self) -> usize {
        match self {
            Segment::Text(t) => t.value.chars().count(),
            Segment::Dropdown(_) => 0,
        }
    }

    /// Width of this segment in document units
    pub fn units(&self) -> usize {
        match self {
            Segment::Text(t) => t.value.chars().count(),
            Segment::Dropdown(_) => 1,
        }
    }

    fn is_empty_text(&self) -> bool {
        matches!(self, Segment::Text(t) if t.value.is_empty())
    }
}

/// Index of the segment with the given id
pub fn index_of(segments: &[Segment], id: SegmentId) -> Option<usize> {
    segments.iter().position(|s| s.id() == id)
}

/// Total document length in units
pub fn total_units(segments: &[Segment]) -> usize {
    segments.iter().map(Segment::units).sum()
}

/// Restore the structural invariants after an edit:
/// - empty text segments are dropped, except a trailing one after a dropdown
/// - adjacent text segments are merged (the earlier id survives)
/// - a dropdown is never the last segment
///
/// None of these steps change the unit offset of any remaining content.
pub fn normalize(segments: &mut Vec<Segment>, ids: &mut IdAllocator) {
    let len = segments.len();
    let mut kept: Vec<Segment> = Vec::with_capacity(len);
    for (i, segment) in segments.drain(..).enumerate() {
        let trailing_after_chip =
            i + 1 == len && kept.last().is_some_and(Segment::is_dropdown);
        if segment.is_empty_text() && !trailing_after_chip {
            continue;
        }
        match (kept.last_mut(), segment) {
            (Some(Segment::Text(prev)), Segment::Text(next)) => prev.value.push_str(&next.value),
            (_, segment) => kept.push(segment),
        }
    }
    if kept.last().is_some_and(Segment::is_dropdown) {
        kept.push(Segment::text(ids.next_id(), ""));
    }
    *segments = kept;
}

/// Byte index of the `char_idx`-th character (or the string length)
pub fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
