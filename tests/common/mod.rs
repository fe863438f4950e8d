//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use promptchip::config::{EditorConfig, LayoutMetrics};
use promptchip::editable::{apply, EditIntent, EditorState, Segment, SegmentPosition};
use promptchip::runtime::{map_key, KeyAction, Keystroke};
use promptchip::view::MonospaceLayout;

/// Parse `value` and place the caret at `(segment_index, offset)`
pub fn state_at(value: &str, segment_index: usize, offset: usize) -> EditorState {
    let state = EditorState::from_value(value);
    apply(
        state,
        &EditIntent::SetCaret(SegmentPosition::new(segment_index, offset)),
    )
}

/// Compact rendering of the segment list: text verbatim, dropdowns as `<selected>`
pub fn shape(state: &EditorState) -> Vec<String> {
    state
        .segments
        .iter()
        .map(|s| match s {
            Segment::Text(t) => t.value.clone(),
            Segment::Dropdown(d) => format!("<{}>", d.selected),
        })
        .collect()
}

/// Apply a sequence of intents
pub fn apply_all(state: EditorState, intents: &[EditIntent]) -> EditorState {
    intents.iter().fold(state, apply)
}

/// Type `text` one keystroke at a time, the way the editor maps keys
pub fn type_text(mut state: EditorState, text: &str) -> EditorState {
    for c in text.chars() {
        match map_key(Keystroke::char(c), &state) {
            Some(KeyAction::Edit(intent)) => state = apply(state, &intent),
            _ => state = apply(state, &EditIntent::InsertAtCaret(c.to_string())),
        }
    }
    state
}

/// Round numbers for geometry tests: 10px chars, 20px lines, 100px wrap
pub fn test_metrics() -> LayoutMetrics {
    LayoutMetrics {
        char_width: 10.0,
        line_height: 20.0,
        wrap_width: 100.0,
        chip_padding: 5.0,
    }
}

pub fn test_config() -> EditorConfig {
    EditorConfig {
        layout: test_metrics(),
        ..EditorConfig::default()
    }
}

pub fn layout_for(state: &EditorState) -> MonospaceLayout {
    MonospaceLayout::new(&state.segments, test_metrics())
}

/// Every structural invariant of a normalized segment list
pub fn assert_invariants(state: &EditorState) {
    let segs = &state.segments;
    for pair in segs.windows(2) {
        assert!(
            !(pair[0].is_text() && pair[1].is_text()),
            "adjacent text segments in {:?}",
            shape(state)
        );
    }
    if let Some(last) = segs.last() {
        assert!(last.is_text(), "document ends in a dropdown: {:?}", shape(state));
    }
    for (i, s) in segs.iter().enumerate() {
        if let Segment::Text(t) = s {
            let trailing_after_chip = i + 1 == segs.len() && i > 0 && segs[i - 1].is_dropdown();
            assert!(
                !t.value.is_empty() || trailing_after_chip,
                "empty text segment at {} in {:?}",
                i,
                shape(state)
            );
        }
        if let Segment::Dropdown(d) = s {
            assert!(d.has_option(&d.selected), "selected value is not an option");
        }
    }
    let mut ids: Vec<_> = segs.iter().map(Segment::id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), segs.len(), "duplicate segment ids");
}
