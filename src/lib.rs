//! Prompt editor core with inline dropdown tokens
//!
//! Prompts are plain text in which `[[ 'a' | 'b' ]]` tokens become atomic
//! dropdown chips. The crate provides the segment model and edit engine
//! (`editable`), the token codec and live detection (`syntax`), coordinate
//! mapping against an abstract layout (`view`), and an embeddable editor
//! component (`runtime`).

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod editable;
pub mod error;
pub mod logging;
pub mod rewrite;
pub mod runtime;
pub mod syntax;
pub mod view;

// Re-export commonly used types
pub use config::{ConfigCache, EditorConfig};
pub use editable::{apply, EditIntent, EditorState, Segment, SegmentId, SegmentPosition};
pub use error::{ConfigError, GeometryError, RewriteError, StoreError};
pub use runtime::PromptEditor;
