//! The edit engine: applies one [`EditIntent`] to an [`EditorState`].
//!
//! Every structural change re-anchors the caret through unit offsets and then
//! restores the segment invariants via [`normalize`](super::segment::normalize).
//! Intents that reference a segment id which no longer exists are logged and
//! ignored; the engine never panics on stale input.

use crate::syntax::{clean_option, detect_tokens};

use super::cursor::SegmentPosition;
use super::messages::{EditIntent, MoveTarget};
use super::segment::{byte_index, index_of, total_units, Segment, SegmentId, CUSTOM_OPTION};
use super::selection::EditorSelection;
use super::state::EditorState;

/// Apply one intent and return the next state.
#[cfg_attr(feature = "profile-tracing", tracing::instrument(skip_all))]
pub fn apply(mut state: EditorState, intent: &EditIntent) -> EditorState {
    match intent {
        EditIntent::InsertText {
            segment_id,
            offset,
            text,
        } => insert_text(&mut state, *segment_id, *offset, text),
        EditIntent::InsertAtCaret(text) => insert_at_caret(&mut state, text),
        EditIntent::Enter => enter(&mut state),
        EditIntent::Backspace => backspace(&mut state),
        EditIntent::DeleteForward => delete_forward(&mut state),
        EditIntent::DeleteRange => {
            delete_selection(&mut state);
        }
        EditIntent::ReplaceRange(text) => insert_at_caret(&mut state, text),
        EditIntent::ChangeDropdown { segment_id, value } => {
            change_dropdown(&mut state, *segment_id, value)
        }
        EditIntent::AddCustomOption { segment_id, value } => {
            add_custom_option(&mut state, *segment_id, value)
        }
        EditIntent::DeleteDropdown(segment_id) => delete_dropdown(&mut state, *segment_id),
        EditIntent::ConvertDropdownToText { segment_id, text } => {
            convert_dropdown_to_text(&mut state, *segment_id, text)
        }
        EditIntent::Move(target) => move_caret(&mut state, *target, false),
        EditIntent::MoveWithSelection(target) => move_caret(&mut state, *target, true),
        EditIntent::SetCaret(pos) => state.set_caret(*pos),
        EditIntent::SetSelection(sel) => {
            state.selection = EditorSelection::new(
                sel.start.clamped(&state.segments),
                sel.end.clamped(&state.segments),
            );
        }
        EditIntent::SelectAll => {
            state.selection = EditorSelection::new(
                SegmentPosition::zero(),
                SegmentPosition::document_end(&state.segments),
            );
        }
    }

    if intent.introduces_text() {
        detect_tokens(&mut state);
    }
    state.refresh_highlight();
    state
}

// =============================================================================
// Insertion
// =============================================================================

fn insert_text(state: &mut EditorState, id: SegmentId, offset: usize, text: &str) {
    let Some(idx) = index_of(&state.segments, id) else {
        tracing::warn!(%id, "InsertText: segment not found");
        return;
    };
    let Segment::Text(segment) = &mut state.segments[idx] else {
        tracing::warn!(%id, "InsertText: segment is not text");
        return;
    };
    let offset = offset.min(segment.value.chars().count());
    let at = byte_index(&segment.value, offset);
    segment.value.insert_str(at, text);
    state.set_caret(SegmentPosition::new(idx, offset + text.chars().count()));
}

fn insert_at_caret(state: &mut EditorState, text: &str) {
    delete_selection(state);
    if text.is_empty() {
        return;
    }
    let caret = state.caret();
    let units = caret.to_units(&state.segments);
    match state.segments.get_mut(caret.segment_index) {
        Some(Segment::Text(segment)) => {
            let at = byte_index(&segment.value, caret.offset);
            segment.value.insert_str(at, text);
        }
        Some(Segment::Dropdown(_)) => {
            // Typing on a highlighted chip lands in front of it
            let id = state.next_id();
            state
                .segments
                .insert(caret.segment_index, Segment::text(id, text));
        }
        None => {
            let id = state.next_id();
            state.segments.push(Segment::text(id, text));
        }
    }
    state.normalize_keeping_caret(units + text.chars().count());
}

fn enter(state: &mut EditorState) {
    delete_selection(state);
    let caret = state.caret();
    let units = caret.to_units(&state.segments);
    let caret_units = match state.segments.get_mut(caret.segment_index) {
        Some(Segment::Text(segment)) => {
            let at = byte_index(&segment.value, caret.offset);
            segment.value.insert(at, '\n');
            units + 1
        }
        Some(Segment::Dropdown(_)) => {
            let id = state.next_id();
            state
                .segments
                .insert(caret.segment_index + 1, Segment::text(id, "\n"));
            units + 2
        }
        None => {
            let id = state.next_id();
            state.segments.push(Segment::text(id, "\n"));
            1
        }
    };
    state.normalize_keeping_caret(caret_units);
}

// =============================================================================
// Deletion
// =============================================================================

/// What a single backspace/delete keystroke removes.
enum Removal {
    /// One character of a text segment
    Char { index: usize, offset: usize },
    /// A whole segment (dropdown)
    Segment(usize),
}

fn backspace(state: &mut EditorState) {
    if delete_selection(state) {
        return;
    }
    if state.segments.is_empty() {
        tracing::debug!("Backspace on empty editor");
        return;
    }
    let caret = state.caret();
    let i = caret.segment_index;
    let units = caret.to_units(&state.segments);

    let removal = match &state.segments[i] {
        Segment::Text(_) if caret.offset > 0 => Removal::Char {
            index: i,
            offset: caret.offset - 1,
        },
        Segment::Dropdown(_) => Removal::Segment(i),
        Segment::Text(_) => match i.checked_sub(1).map(|p| (p, &state.segments[p])) {
            None => return,
            Some((p, Segment::Dropdown(_))) => Removal::Segment(p),
            Some((p, Segment::Text(prev))) => match prev.value.chars().count() {
                0 => Removal::Segment(p),
                len => Removal::Char {
                    index: p,
                    offset: len - 1,
                },
            },
        },
    };

    let removed_before_caret = match removal {
        Removal::Char { .. } => 1,
        Removal::Segment(idx) if idx == i => 0,
        Removal::Segment(idx) => state.segments[idx].units(),
    };
    let caret_units = units.saturating_sub(removed_before_caret);
    remove(state, removal);
    state.normalize_keeping_caret(caret_units);
}

fn delete_forward(state: &mut EditorState) {
    if delete_selection(state) {
        return;
    }
    let caret = state.caret();
    let i = caret.segment_index;
    let Some(segment) = state.segments.get(i) else {
        return;
    };
    let units = caret.to_units(&state.segments);

    let removal = match segment {
        Segment::Dropdown(_) => Removal::Segment(i),
        Segment::Text(t) if caret.offset < t.value.chars().count() => Removal::Char {
            index: i,
            offset: caret.offset,
        },
        Segment::Text(_) => match state.segments.get(i + 1) {
            None => return,
            Some(Segment::Dropdown(_)) => Removal::Segment(i + 1),
            Some(Segment::Text(_)) => Removal::Char {
                index: i + 1,
                offset: 0,
            },
        },
    };

    remove(state, removal);
    state.normalize_keeping_caret(units);
}

fn remove(state: &mut EditorState, removal: Removal) {
    match removal {
        Removal::Char { index, offset } => {
            if let Some(Segment::Text(segment)) = state.segments.get_mut(index) {
                if offset < segment.value.chars().count() {
                    let at = byte_index(&segment.value, offset);
                    segment.value.remove(at);
                }
            }
        }
        Removal::Segment(index) => {
            let removed = state.segments.remove(index);
            tracing::debug!(id = %removed.id(), "removed segment");
        }
    }
}

/// Delete a non-collapsed selection. Returns false if the selection was collapsed.
///
/// Text is cut character-exact at both ends; a dropdown goes when its offset-0
/// position lies inside `[start, end)`.
fn delete_selection(state: &mut EditorState) -> bool {
    let (start, end) = state.selection.ordered();
    if start == end {
        return false;
    }
    let caret_units = start.to_units(&state.segments);

    let segments = std::mem::take(&mut state.segments);
    for (j, segment) in segments.into_iter().enumerate() {
        match segment {
            Segment::Dropdown(_) => {
                let at = SegmentPosition::new(j, 0);
                if !(start <= at && at < end) {
                    state.segments.push(segment);
                }
            }
            Segment::Text(mut text) => {
                if j < start.segment_index || j > end.segment_index {
                    state.segments.push(Segment::Text(text));
                    continue;
                }
                let len = text.value.chars().count();
                let from = if j == start.segment_index {
                    start.offset.min(len)
                } else {
                    0
                };
                let to = if j == end.segment_index {
                    end.offset.min(len)
                } else {
                    len
                };
                if from < to {
                    let range = byte_index(&text.value, from)..byte_index(&text.value, to);
                    text.value.replace_range(range, "");
                }
                state.segments.push(Segment::Text(text));
            }
        }
    }
    state.normalize_keeping_caret(caret_units);
    true
}

// =============================================================================
// Dropdowns
// =============================================================================

fn change_dropdown(state: &mut EditorState, id: SegmentId, value: &str) {
    let Some(Segment::Dropdown(dropdown)) = state.segments.iter_mut().find(|s| s.id() == id)
    else {
        tracing::warn!(%id, "ChangeDropdown: dropdown not found");
        return;
    };
    if value == CUSTOM_OPTION {
        tracing::debug!(%id, "ChangeDropdown: sentinel is not a selectable value");
        return;
    }
    if !dropdown.has_option(value) {
        tracing::warn!(%id, value, "ChangeDropdown: value is not an option");
        return;
    }
    dropdown.selected = value.to_string();
}

/// Clean a free-text value so it survives a serialize/parse round trip.
///
/// Token bodies never span lines, so line breaks fold into single spaces.
fn sanitize_custom(value: &str) -> String {
    let single_line = value
        .replace('\r', "\n")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    clean_option(&single_line.replace('|', "/"))
}

fn add_custom_option(state: &mut EditorState, id: SegmentId, value: &str) {
    let value = sanitize_custom(value);
    if value.is_empty() || value == CUSTOM_OPTION {
        tracing::warn!(%id, "AddCustomOption: empty custom value ignored");
        return;
    }
    let Some(Segment::Dropdown(dropdown)) = state.segments.iter_mut().find(|s| s.id() == id)
    else {
        tracing::warn!(%id, "AddCustomOption: dropdown not found");
        return;
    };
    if !dropdown.has_option(&value) {
        match dropdown.options.iter().position(|o| o == CUSTOM_OPTION) {
            Some(sentinel) => dropdown.options.insert(sentinel, value.clone()),
            None => dropdown.options.push(value.clone()),
        }
    }
    dropdown.selected = value;
}

fn dropdown_index(state: &EditorState, id: SegmentId, op: &str) -> Option<usize> {
    match index_of(&state.segments, id) {
        Some(idx) if state.segments[idx].is_dropdown() => Some(idx),
        Some(_) => {
            tracing::warn!(%id, op, "segment is not a dropdown");
            None
        }
        None => {
            tracing::warn!(%id, op, "dropdown not found");
            None
        }
    }
}

fn delete_dropdown(state: &mut EditorState, id: SegmentId) {
    let Some(idx) = dropdown_index(state, id, "DeleteDropdown") else {
        return;
    };
    let chip_units = SegmentPosition::new(idx, 0).to_units(&state.segments);
    let caret_units = state.caret().to_units(&state.segments);
    state.segments.remove(idx);
    let caret_units = if caret_units > chip_units {
        caret_units - 1
    } else {
        caret_units
    };
    state.normalize_keeping_caret(caret_units);
}

/// The replacement text gets a new id; the dropdown's identity is not kept.
/// Token syntax inside the text is picked up by detection afterwards.
fn convert_dropdown_to_text(state: &mut EditorState, id: SegmentId, text: &str) {
    let Some(idx) = dropdown_index(state, id, "ConvertDropdownToText") else {
        return;
    };
    let chip_units = SegmentPosition::new(idx, 0).to_units(&state.segments);
    let caret = state.caret();
    let caret_units = caret.to_units(&state.segments);
    let inserted = text.chars().count();

    let new_id = state.next_id();
    state.segments[idx] = Segment::text(new_id, text);

    let caret_units = if state.selection.is_collapsed() && caret.segment_index == idx {
        chip_units + inserted
    } else if caret_units > chip_units {
        caret_units - 1 + inserted
    } else {
        caret_units
    };
    state.normalize_keeping_caret(caret_units);
}

// =============================================================================
// Movement
// =============================================================================

fn move_caret(state: &mut EditorState, target: MoveTarget, extend: bool) {
    if !extend && !state.selection.is_collapsed() {
        let (start, end) = state.selection.ordered();
        match target {
            MoveTarget::Left => {
                state.set_caret(start);
                return;
            }
            MoveTarget::Right => {
                state.set_caret(end);
                return;
            }
            _ => {}
        }
    }

    let segments = &state.segments;
    let caret = state.caret().clamped(segments);
    let next = match target {
        MoveTarget::Left => step_left(segments, caret),
        MoveTarget::Right => step_right(segments, caret),
        MoveTarget::LineStart => {
            let units = caret.to_units(segments);
            let start = newline_units(segments)
                .into_iter()
                .rev()
                .find(|&nl| nl < units)
                .map_or(0, |nl| nl + 1);
            SegmentPosition::from_units(segments, start)
        }
        MoveTarget::LineEnd => {
            let units = caret.to_units(segments);
            let end = newline_units(segments)
                .into_iter()
                .find(|&nl| nl >= units)
                .unwrap_or_else(|| total_units(segments));
            SegmentPosition::from_units(segments, end)
        }
        MoveTarget::DocumentStart => SegmentPosition::zero(),
        MoveTarget::DocumentEnd => SegmentPosition::document_end(segments),
    };

    if extend {
        state.selection.extend_to(next);
    } else {
        state.selection = EditorSelection::collapsed(next);
    }
}

/// One stop right. From a text end the next stop is the following chip itself
/// (highlighting it); from a chip the caret steps over it.
fn step_right(segments: &[Segment], pos: SegmentPosition) -> SegmentPosition {
    let i = pos.segment_index;
    match segments.get(i) {
        Some(Segment::Text(t)) if pos.offset < t.value.chars().count() => {
            SegmentPosition::new(i, pos.offset + 1)
        }
        Some(_) => match segments.get(i + 1) {
            Some(Segment::Text(t)) if segments[i].is_text() => {
                SegmentPosition::new(i + 1, t.value.chars().count().min(1))
            }
            Some(_) => SegmentPosition::new(i + 1, 0),
            None => pos,
        },
        None => pos,
    }
}

/// One stop left, mirroring [`step_right`].
fn step_left(segments: &[Segment], pos: SegmentPosition) -> SegmentPosition {
    let i = pos.segment_index;
    if pos.offset > 0 {
        return SegmentPosition::new(i, pos.offset - 1);
    }
    let Some(prev) = i.checked_sub(1) else {
        return pos;
    };
    match (&segments[i], &segments[prev]) {
        (_, Segment::Dropdown(_)) => SegmentPosition::new(prev, 0),
        (Segment::Dropdown(_), Segment::Text(t)) => {
            SegmentPosition::new(prev, t.value.chars().count())
        }
        (Segment::Text(_), Segment::Text(t)) => {
            SegmentPosition::new(prev, t.value.chars().count().saturating_sub(1))
        }
    }
}

/// Unit indices of every newline character
fn newline_units(segments: &[Segment]) -> Vec<usize> {
    let mut out = Vec::new();
    let mut units = 0;
    for segment in segments {
        match segment {
            Segment::Text(t) => {
                for ch in t.value.chars() {
                    if ch == '\n' {
                        out.push(units);
                    }
                    units += 1;
                }
            }
            Segment::Dropdown(_) => units += 1,
        }
    }
    out
}
