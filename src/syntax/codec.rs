//! Conversion between flat strings and segment lists.

use crate::editable::{DropdownSegment, IdAllocator, Segment, CUSTOM_OPTION};

use super::pattern::{split_tokens, Piece};

/// Parse flat text into segments.
///
/// Valid tokens become dropdowns selecting their first option; everything
/// else, including tokens with no usable option, stays text. Adjacent text is
/// merged. No trailing text is synthesized here; see [`crate::editable::normalize`].
pub fn parse(text: &str, ids: &mut IdAllocator) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    for piece in split_tokens(text) {
        match piece {
            Piece::Literal(s) => match segments.last_mut() {
                Some(Segment::Text(prev)) => prev.value.push_str(s),
                _ => segments.push(Segment::text(ids.next_id(), s)),
            },
            Piece::Token(options) => {
                if let Some(dropdown) = DropdownSegment::from_options(ids.next_id(), options) {
                    segments.push(Segment::Dropdown(dropdown));
                }
            }
        }
    }
    segments
}

/// Serialize segments back to token syntax.
///
/// Each dropdown is written with its selected option first, so the output is a
/// fixed point of `parse` + `serialize` rather than a byte-identical copy of the
/// original input.
pub fn serialize(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Text(t) => out.push_str(&t.value),
            Segment::Dropdown(d) => out.push_str(&format_token(d)),
        }
    }
    out
}

/// Render only the selected values (what gets sent to the model).
pub fn flatten(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Text(t) => out.push_str(&t.value),
            Segment::Dropdown(d) => out.push_str(&d.selected),
        }
    }
    out
}

/// `[['selected' | 'rest...' | 'custom...']]`
pub fn format_token(dropdown: &DropdownSegment) -> String {
    let mut ordered: Vec<&str> = Vec::with_capacity(dropdown.options.len() + 1);
    ordered.push(&dropdown.selected);
    ordered.extend(
        dropdown
            .options
            .iter()
            .map(String::as_str)
            .filter(|o| *o != dropdown.selected),
    );
    if !ordered.contains(&CUSTOM_OPTION) {
        ordered.push(CUSTOM_OPTION);
    }
    let body = ordered
        .iter()
        .map(|o| format!("'{}'", o))
        .collect::<Vec<_>>()
        .join(" | ");
    format!("[[{}]]", body)
}
