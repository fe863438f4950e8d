//! Token syntax: codec and live detection
//!
//! Handles the `[[ 'a' | 'b' ]]` notation for inline multiple-choice fields:
//! - [`parse`] / [`serialize`] / [`flatten`] at the flat-string boundaries
//! - [`detect_tokens`] after edits that can complete a token in place
//!
//! ## Flow
//!
//! ```text
//! host value ──parse──▶ segments ──edit──▶ detect_tokens ──serialize──▶ onChange
//!                                                        └─flatten───▶ rewrite API
//! ```

mod codec;
mod detect;
mod pattern;

pub use codec::{flatten, format_token, parse, serialize};
pub use detect::detect_tokens;
pub use pattern::{
    clean_option, clean_options, contains_token, find_token, split_tokens, Piece, TokenMatch,
};
