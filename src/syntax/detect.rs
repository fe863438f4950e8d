//! Live detection of completed tokens typed into text segments.

use crate::editable::{DropdownSegment, EditorState, Segment};

use super::pattern::{contains_token, split_tokens, Piece};

/// Convert every complete token inside text segments into a dropdown.
///
/// When at least one dropdown is created the caret moves to the start of the
/// segment following the last new dropdown so typing continues after it.
/// Otherwise the state is left untouched. Returns the number of dropdowns created.
pub fn detect_tokens(state: &mut EditorState) -> usize {
    if !state
        .segments
        .iter()
        .any(|s| s.as_text().is_some_and(|t| contains_token(&t.value)))
    {
        return 0;
    }

    let mut created = 0;
    let mut units = 0;
    let mut last_chip_end = None;
    let mut out: Vec<Segment> = Vec::with_capacity(state.segments.len() + 2);

    for segment in std::mem::take(&mut state.segments) {
        let Segment::Text(text) = segment else {
            units += segment.units();
            out.push(segment);
            continue;
        };
        let pieces = split_tokens(&text.value);
        if !pieces.iter().any(|p| matches!(p, Piece::Token(_))) {
            units += text.value.chars().count();
            out.push(Segment::Text(text));
            continue;
        }

        let mut reuse_id = Some(text.id);
        for piece in pieces {
            match piece {
                Piece::Literal(s) => {
                    let id = reuse_id.take().unwrap_or_else(|| state.ids.next_id());
                    units += s.chars().count();
                    out.push(Segment::text(id, s));
                }
                Piece::Token(options) => {
                    reuse_id = None;
                    if let Some(dropdown) =
                        DropdownSegment::from_options(state.ids.next_id(), options)
                    {
                        tracing::debug!(
                            id = %dropdown.id,
                            selected = %dropdown.selected,
                            "converted typed token"
                        );
                        out.push(Segment::Dropdown(dropdown));
                        units += 1;
                        created += 1;
                        last_chip_end = Some(units);
                    }
                }
            }
        }
    }

    state.segments = out;
    if let Some(caret_units) = last_chip_end {
        state.normalize_keeping_caret(caret_units);
    }
    state.refresh_highlight();
    created
}
