//! Keystrokes and their mapping onto editor actions

use std::fmt;

use crate::editable::{EditIntent, EditorState, MoveTarget, Segment};
use crate::view::VerticalDirection;

/// Modifier keys as a bitfield
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const SHIFT: Modifiers = Modifiers(0b0010);
    pub const ALT: Modifiers = Modifiers(0b0100);
    pub const META: Modifiers = Modifiers(0b1000); // Cmd on macOS

    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & Self::CTRL.0 != 0
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & Self::SHIFT.0 != 0
    }

    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & Self::ALT.0 != 0
    }

    #[inline]
    pub const fn meta(self) -> bool {
        self.0 & Self::META.0 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    /// Either Ctrl or Cmd is held. Browsers accept both for editing chords.
    pub const fn command(self) -> bool {
        self.ctrl() || self.meta()
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.ctrl() {
            parts.push("Ctrl");
        }
        if self.shift() {
            parts.push("Shift");
        }
        if self.alt() {
            parts.push("Alt");
        }
        if self.meta() {
            parts.push("Cmd");
        }
        write!(f, "{}", parts.join("+"))
    }
}

/// Keys the editor reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character, case preserved
    Char(char),
    Space,
    Tab,
    Enter,
    Backspace,
    Delete,
    Escape,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Char(c) => write!(f, "{}", c.to_uppercase()),
            KeyCode::Space => write!(f, "Space"),
            KeyCode::Tab => write!(f, "Tab"),
            KeyCode::Enter => write!(f, "Enter"),
            KeyCode::Backspace => write!(f, "Backspace"),
            KeyCode::Delete => write!(f, "Delete"),
            KeyCode::Escape => write!(f, "Escape"),
            KeyCode::Left => write!(f, "←"),
            KeyCode::Right => write!(f, "→"),
            KeyCode::Up => write!(f, "↑"),
            KeyCode::Down => write!(f, "↓"),
            KeyCode::Home => write!(f, "Home"),
            KeyCode::End => write!(f, "End"),
        }
    }
}

/// A key with modifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Keystroke {
    pub key: KeyCode,
    pub mods: Modifiers,
}

impl Keystroke {
    pub const fn new(key: KeyCode, mods: Modifiers) -> Self {
        Self { key, mods }
    }

    pub const fn key(key: KeyCode) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// Typed character; space maps to [`KeyCode::Space`]
    pub fn char(c: char) -> Self {
        if c == ' ' {
            Self::key(KeyCode::Space)
        } else if c == '\n' {
            Self::key(KeyCode::Enter)
        } else if c == '\t' {
            Self::key(KeyCode::Tab)
        } else {
            Self::key(KeyCode::Char(c))
        }
    }

    fn is_chord(&self, c: char) -> bool {
        matches!(self.key, KeyCode::Char(k) if k.eq_ignore_ascii_case(&c))
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{}+{}", self.mods, self.key)
        }
    }
}

/// What a keystroke asks the editor to do
#[derive(Clone, Debug, PartialEq)]
pub enum KeyAction {
    Edit(EditIntent),
    /// Up/Down; needs layout, so the editor resolves it
    Vertical {
        direction: VerticalDirection,
        extend: bool,
    },
    Undo,
    Redo,
}

/// Map a keystroke to an action given the current state.
///
/// Returns `None` for keys the editor leaves to the host (e.g. Escape, Tab).
pub fn map_key(stroke: Keystroke, state: &EditorState) -> Option<KeyAction> {
    let mods = stroke.mods;
    let shift = mods.shift();
    let command = mods.command();

    let moved = |target: MoveTarget| {
        Some(KeyAction::Edit(if shift {
            EditIntent::MoveWithSelection(target)
        } else {
            EditIntent::Move(target)
        }))
    };

    match stroke.key {
        // Undo/redo chords
        _ if command && stroke.is_chord('z') && shift => Some(KeyAction::Redo),
        _ if command && stroke.is_chord('z') => Some(KeyAction::Undo),
        _ if mods.ctrl() && stroke.is_chord('y') => Some(KeyAction::Redo),
        _ if command && stroke.is_chord('a') => Some(KeyAction::Edit(EditIntent::SelectAll)),

        KeyCode::Backspace => Some(KeyAction::Edit(EditIntent::Backspace)),
        KeyCode::Delete => Some(KeyAction::Edit(EditIntent::DeleteForward)),
        KeyCode::Enter => Some(KeyAction::Edit(EditIntent::Enter)),

        KeyCode::Left => moved(MoveTarget::Left),
        KeyCode::Right => moved(MoveTarget::Right),
        KeyCode::Home if command => moved(MoveTarget::DocumentStart),
        KeyCode::End if command => moved(MoveTarget::DocumentEnd),
        KeyCode::Home => moved(MoveTarget::LineStart),
        KeyCode::End => moved(MoveTarget::LineEnd),

        KeyCode::Up => Some(KeyAction::Vertical {
            direction: VerticalDirection::Up,
            extend: shift,
        }),
        KeyCode::Down => Some(KeyAction::Vertical {
            direction: VerticalDirection::Down,
            extend: shift,
        }),

        KeyCode::Space if !command => Some(KeyAction::Edit(typed(' ', state))),
        KeyCode::Char(c) if !command && !c.is_control() => Some(KeyAction::Edit(typed(c, state))),

        _ => None,
    }
}

/// Typing goes straight into the caret's text segment when there is one and
/// nothing is selected; otherwise the engine decides where it lands.
fn typed(c: char, state: &EditorState) -> EditIntent {
    let caret = state.caret();
    let plain_caret = state.selection.is_collapsed() && state.highlighted_chip.is_none();
    match state.caret_segment() {
        Some(Segment::Text(t)) if plain_caret => EditIntent::InsertText {
            segment_id: t.id,
            offset: caret.offset,
            text: c.to_string(),
        },
        _ => EditIntent::InsertAtCaret(c.to_string()),
    }
}
