//! Edit engine tests - intents applied through the public `apply` dispatcher

mod common;

use common::{apply_all, assert_invariants, shape, state_at, type_text};
use promptchip::editable::{
    apply, EditIntent, EditorSelection, EditorState, MoveTarget, SegmentPosition, CUSTOM_OPTION,
};

// ========================================================================
// Typing a token
// ========================================================================

#[test]
fn test_typing_buy_sell_creates_dropdown_on_close() {
    let typed = "I want to [[ 'buy' | 'sell' ]] stocks";
    let close = typed.find("]]").unwrap() + 2;

    let state = type_text(EditorState::new(), &typed[..close - 1]);
    assert!(state.segments.iter().all(|s| s.is_text()), "no chip before ]]");

    let state = type_text(state, "]");
    assert_eq!(shape(&state), vec!["I want to ", "<buy>", ""]);
    let dropdown = state.segments[1].as_dropdown().unwrap();
    assert_eq!(dropdown.options, vec!["buy", "sell", CUSTOM_OPTION]);
    assert_eq!(state.caret(), SegmentPosition::new(2, 0));
    assert_invariants(&state);

    let state = type_text(state, &typed[close..]);
    assert_eq!(shape(&state), vec!["I want to ", "<buy>", " stocks"]);
    assert_eq!(state.flatten(), "I want to buy stocks");
}

#[test]
fn test_paste_with_several_tokens() {
    let state = state_at("Say ", 0, 4);
    let state = apply(
        state,
        &EditIntent::InsertAtCaret("[[hi|hello]] to [[you|them]]!".into()),
    );
    assert_eq!(shape(&state), vec!["Say ", "<hi>", " to ", "<you>", "!"]);
    // Caret lands right after the last new chip
    assert_eq!(state.caret(), SegmentPosition::new(4, 0));
    assert_invariants(&state);
}

// ========================================================================
// Deleting around chips
// ========================================================================

#[test]
fn test_backspace_after_dropdown_deletes_dropdown_only() {
    let state = state_at("left [[x|y]] right", 2, 0);
    let state = apply(state, &EditIntent::Backspace);
    assert_eq!(shape(&state), vec!["left  right"]);
    assert_eq!(state.caret(), SegmentPosition::new(0, 5));
    assert_invariants(&state);
}

#[test]
fn test_forward_delete_before_dropdown_deletes_dropdown() {
    let state = state_at("left [[x|y]] right", 0, 5);
    let state = apply(state, &EditIntent::DeleteForward);
    assert_eq!(shape(&state), vec!["left  right"]);
    assert_eq!(state.caret(), SegmentPosition::new(0, 5));
}

#[test]
fn test_backspace_on_empty_editor_is_noop() {
    let state = type_text(EditorState::new(), "ab");
    let state = apply_all(state, &[EditIntent::Backspace, EditIntent::Backspace]);
    assert!(state.is_empty());
    let again = apply(state.clone(), &EditIntent::Backspace);
    assert_eq!(again, state);
}

#[test]
fn test_chip_only_document_backspaced_away() {
    let state = EditorState::from_value("[[a]]");
    assert_eq!(shape(&state), vec!["<a>", ""]);
    let state = apply(state, &EditIntent::Backspace);
    assert!(state.segments.iter().all(|s| s.is_text()));
    assert_eq!(state.flatten(), "");
    assert_invariants(&state);
}

// ========================================================================
// Dropdown intents
// ========================================================================

#[test]
fn test_add_custom_then_change_to_same_is_noop() {
    let state = EditorState::from_value("[[a|b]]");
    let id = state.segments[0].id();
    let added = apply(
        state,
        &EditIntent::AddCustomOption {
            segment_id: id,
            value: "mine".into(),
        },
    );
    let changed = apply(
        added.clone(),
        &EditIntent::ChangeDropdown {
            segment_id: id,
            value: "mine".into(),
        },
    );
    assert_eq!(added.segments, changed.segments);

    let again = apply(
        added.clone(),
        &EditIntent::AddCustomOption {
            segment_id: id,
            value: "mine".into(),
        },
    );
    assert_eq!(added.segments, again.segments);
    let dropdown = again.segments[0].as_dropdown().unwrap();
    assert_eq!(dropdown.options, vec!["a", "b", "mine", CUSTOM_OPTION]);
    assert_eq!(again.serialize(), "[['mine' | 'a' | 'b' | 'custom...']]");
}

#[test]
fn test_change_to_sentinel_is_ignored() {
    let state = EditorState::from_value("[[a|b]]");
    let id = state.segments[0].id();
    let next = apply(
        state.clone(),
        &EditIntent::ChangeDropdown {
            segment_id: id,
            value: CUSTOM_OPTION.into(),
        },
    );
    assert_eq!(next.segments, state.segments);
}

#[test]
fn test_convert_dropdown_merges_with_neighbours() {
    let state = EditorState::from_value("go [[up|down]] now");
    let id = state.segments[1].id();
    let state = apply(
        state,
        &EditIntent::ConvertDropdownToText {
            segment_id: id,
            text: "sideways".into(),
        },
    );
    assert_eq!(shape(&state), vec!["go sideways now"]);
    assert_ne!(state.segments[0].id(), id);
}

#[test]
fn test_delete_dropdown_affordance() {
    let state = EditorState::from_value("[[a]] tail");
    let id = state.segments[0].id();
    let state = apply(state, &EditIntent::DeleteDropdown(id));
    assert_eq!(shape(&state), vec![" tail"]);
}

// ========================================================================
// Ranges
// ========================================================================

#[test]
fn test_replace_range_spanning_chip() {
    let state = EditorState::from_value("one [[two]] three");
    let state = apply(
        state,
        &EditIntent::SetSelection(EditorSelection::new(
            SegmentPosition::new(0, 2),
            SegmentPosition::new(2, 1),
        )),
    );
    let state = apply(state, &EditIntent::ReplaceRange("--".into()));
    assert_eq!(shape(&state), vec!["on--three"]);
    assert_eq!(state.caret(), SegmentPosition::new(0, 4));
}

#[test]
fn test_backwards_selection_is_ordered() {
    let state = EditorState::from_value("abcdef");
    let state = apply(
        state,
        &EditIntent::SetSelection(EditorSelection::new(
            SegmentPosition::new(0, 4),
            SegmentPosition::new(0, 1),
        )),
    );
    let state = apply(state, &EditIntent::DeleteRange);
    assert_eq!(shape(&state), vec!["aef"]);
}

#[test]
fn test_shift_right_over_chip_then_delete() {
    let state = state_at("ab[[x]]cd", 0, 2);
    let state = apply_all(
        state,
        &[
            EditIntent::MoveWithSelection(MoveTarget::Right),
            EditIntent::MoveWithSelection(MoveTarget::Right),
            EditIntent::Backspace,
        ],
    );
    assert_eq!(shape(&state), vec!["abcd"]);
    assert_invariants(&state);
}

// ========================================================================
// Movement
// ========================================================================

#[test]
fn test_left_visits_chip_before_entering_previous_text() {
    let state = state_at("ab[[x]]cd", 2, 0);
    let state = apply(state, &EditIntent::Move(MoveTarget::Left));
    assert_eq!(state.caret(), SegmentPosition::new(1, 0));
    assert!(state.highlighted_chip.is_some());
    let state = apply(state, &EditIntent::Move(MoveTarget::Left));
    assert_eq!(state.caret(), SegmentPosition::new(0, 2));
    assert!(state.highlighted_chip.is_none());
}

#[test]
fn test_document_boundaries() {
    let state = state_at("x [[y]] z", 1, 0);
    let start = apply(state.clone(), &EditIntent::Move(MoveTarget::DocumentStart));
    assert_eq!(start.caret(), SegmentPosition::zero());
    let end = apply(state, &EditIntent::Move(MoveTarget::DocumentEnd));
    assert_eq!(end.caret(), SegmentPosition::new(2, 2));
}

#[test]
fn test_set_caret_is_clamped() {
    let state = EditorState::from_value("abc [[d]]");
    let state = apply(state, &EditIntent::SetCaret(SegmentPosition::new(9, 9)));
    assert_eq!(state.caret(), SegmentPosition::new(2, 0));
    let state = apply(state, &EditIntent::SetCaret(SegmentPosition::new(1, 5)));
    assert_eq!(state.caret(), SegmentPosition::new(1, 0));
}

// ========================================================================
// Invariants under a mixed session
// ========================================================================

#[test]
fn test_invariants_hold_through_mixed_session() {
    let mut state = EditorState::new();
    let script: Vec<EditIntent> = vec![
        EditIntent::InsertAtCaret("Write a [[short|long]] ".into()),
        EditIntent::InsertAtCaret("[[poem|story]]".into()),
        EditIntent::Enter,
        EditIntent::Move(MoveTarget::DocumentStart),
        EditIntent::DeleteForward,
        EditIntent::Move(MoveTarget::LineEnd),
        EditIntent::Backspace,
        EditIntent::Backspace,
        EditIntent::SelectAll,
        EditIntent::InsertAtCaret("fresh [[start]]".into()),
        EditIntent::Move(MoveTarget::Left),
        EditIntent::Move(MoveTarget::Left),
        EditIntent::Enter,
    ];
    for intent in &script {
        state = apply(state, intent);
        assert_invariants(&state);
    }
    assert_eq!(state.flatten(), "fresh \nstart");
}
