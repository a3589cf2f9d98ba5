//! Placeholder and optional-text parsing used by the lexer.

use std::str::CharIndices;

use crate::errors::{PatternError, placeholder_error};

/// A `{name}` placeholder found in expression text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Parameter-type name between the braces; empty for `{}`.
    pub name: String,
    /// Byte offset of the opening brace.
    pub position: usize,
}

fn is_reserved(ch: char) -> bool {
    matches!(ch, '{' | '(' | ')' | '\\' | '/') || ch.is_whitespace()
}

/// Parse the remainder of a placeholder whose `{` sits at `start`.
pub(crate) fn parse_placeholder(
    start: usize,
    chars: &mut CharIndices<'_>,
) -> Result<Placeholder, PatternError> {
    let mut name = String::new();
    for (_, ch) in chars.by_ref() {
        if ch == '}' {
            return Ok(Placeholder {
                name,
                position: start,
            });
        }
        if is_reserved(ch) {
            return Err(placeholder_error(
                "invalid placeholder in step pattern",
                start,
                Some(name),
            ));
        }
        name.push(ch);
    }
    Err(placeholder_error(
        "missing closing '}' for placeholder",
        start,
        Some(name),
    ))
}

/// Parse the remainder of optional text whose `(` sits at `start`.
pub(crate) fn parse_optional(
    start: usize,
    chars: &mut CharIndices<'_>,
) -> Result<String, PatternError> {
    let mut text = String::new();
    while let Some((_, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, escaped)) => text.push(escaped),
                None => text.push('\\'),
            },
            ')' if text.is_empty() => {
                return Err(placeholder_error(
                    "optional text may not be empty",
                    start,
                    None,
                ));
            }
            ')' => return Ok(text),
            '(' => {
                return Err(placeholder_error(
                    "optional text may not be nested",
                    start,
                    None,
                ));
            }
            '{' => {
                return Err(placeholder_error(
                    "placeholders are not allowed in optional text",
                    start,
                    None,
                ));
            }
            other => text.push(other),
        }
    }
    Err(placeholder_error(
        "missing closing ')' for optional text",
        start,
        None,
    ))
}
