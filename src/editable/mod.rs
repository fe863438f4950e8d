//! Segment-based editing for the prompt editor.
//!
//! Editor content is a list of [`Segment`]s: plain text runs and atomic
//! dropdown chips. This module owns the data model and the edit engine:
//!
//! - [`Segment`], [`SegmentId`], [`IdAllocator`]: the content model
//! - [`SegmentPosition`], [`EditorSelection`]: caret and selection
//! - [`EditorState`]: the full snapshot (segments + selection + chip highlight)
//! - [`EditIntent`]: one user intent
//! - [`apply`]: `state -> state` dispatcher enforcing the segment invariants
//! - [`EditHistory`]: snapshot-based undo/redo
//!
//! # Example
//!
//! ```
//! use promptchip::editable::{apply, EditIntent, EditorState};
//!
//! let state = EditorState::from_value("I want to ");
//! let state = apply(state, &EditIntent::InsertAtCaret("[[ 'buy' | 'sell' ]]".into()));
//!
//! assert_eq!(state.flatten(), "I want to buy");
//! assert_eq!(state.segments.len(), 3);
//! ```

mod cursor;
mod engine;
mod history;
mod messages;
mod segment;
mod selection;
mod state;

// Re-export main types
pub use cursor::SegmentPosition;
pub use engine::apply;
pub use history::{EditHistory, DEFAULT_HISTORY_LIMIT};
pub use messages::{EditIntent, MoveTarget};
pub use segment::{
    byte_index, index_of, normalize, total_units, DropdownSegment, IdAllocator, Segment,
    SegmentId, TextSegment, CUSTOM_OPTION,
};
pub use selection::EditorSelection;
pub use state::EditorState;
