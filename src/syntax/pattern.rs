//! Scanner for the inline token syntax `[[ 'a' | 'b' ]]`.
//!
//! Matching is non-greedy and does not nest: a token runs from `[[` to the
//! first following `]]`. A token body never spans a newline.

use std::ops::Range;

use crate::editable::CUSTOM_OPTION;

const OPEN: &str = "[[";
const CLOSE: &str = "]]";

/// Byte ranges of one complete `[[...]]` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatch {
    /// Whole match including the brackets
    pub range: Range<usize>,
    /// Text between the brackets
    pub body: Range<usize>,
}

/// Find the next complete token at or after byte `from`.
pub fn find_token(text: &str, from: usize) -> Option<TokenMatch> {
    let mut search = from;
    while search < text.len() {
        let open = search + text.get(search..)?.find(OPEN)?;
        let body_start = open + OPEN.len();
        let close = body_start + text[body_start..].find(CLOSE)?;
        if !text[body_start..close].contains('\n') {
            return Some(TokenMatch {
                range: open..close + CLOSE.len(),
                body: body_start..close,
            });
        }
        // '[' is one byte, so open + 1 stays on a char boundary
        search = open + 1;
    }
    None
}

/// A slice of scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece<'a> {
    /// Plain text, including tokens that had no usable option
    Literal(&'a str),
    /// A valid token with its cleaned options (sentinel not yet appended)
    Token(Vec<String>),
}

/// Split `text` into literal runs and valid tokens, in order.
///
/// Adjacent literals are not merged; an invalid token is emitted as its own
/// literal piece.
pub fn split_tokens(text: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut cursor = 0;
    while let Some(m) = find_token(text, cursor) {
        if m.range.start > cursor {
            pieces.push(Piece::Literal(&text[cursor..m.range.start]));
        }
        let options = clean_options(&text[m.body.clone()]);
        if has_choice(&options) {
            pieces.push(Piece::Token(options));
        } else {
            tracing::debug!(
                raw = &text[m.range.clone()],
                "token without options kept as text"
            );
            pieces.push(Piece::Literal(&text[m.range.clone()]));
        }
        cursor = m.range.end;
    }
    if cursor < text.len() {
        pieces.push(Piece::Literal(&text[cursor..]));
    }
    pieces
}

/// Check whether `text` contains at least one complete token occurrence
pub fn contains_token(text: &str) -> bool {
    find_token(text, 0).is_some()
}

/// Clean a pipe-separated token body into unique, non-empty options.
pub fn clean_options(body: &str) -> Vec<String> {
    let mut options: Vec<String> = Vec::new();
    for raw in body.split('|') {
        let option = clean_option(raw);
        if !option.is_empty() && !options.contains(&option) {
            options.push(option);
        }
    }
    options
}

/// Trim, strip one surrounding quote on each side, drop bracket characters.
pub fn clean_option(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix(['\'', '"']).unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix(['\'', '"']).unwrap_or(trimmed);
    trimmed
        .chars()
        .filter(|c| *c != '[' && *c != ']')
        .collect::<String>()
        .trim()
        .to_string()
}

/// At least one option besides the custom-entry sentinel
pub fn has_choice(options: &[String]) -> bool {
    options.iter().any(|o| o != CUSTOM_OPTION)
}
