//! Runtime: the interactive editor component and its input plumbing
//!
//! - `keymap` - keystrokes and their mapping onto editor actions
//! - `frame` - single-slot scheduling of per-frame work
//! - `editor` - [`PromptEditor`], the component a host UI embeds

pub mod editor;
pub mod frame;
pub mod keymap;

pub use editor::{FrameJob, PromptEditor};
pub use frame::{FrameHandle, FrameScheduler};
pub use keymap::{map_key, KeyAction, KeyCode, Keystroke, Modifiers};
