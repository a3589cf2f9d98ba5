//! Expression lexer converting pattern strings into semantic tokens.

use crate::errors::PatternError;

use super::placeholder::{Placeholder, parse_optional, parse_placeholder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Text(String),
    Whitespace(String),
    Optional { start: usize, text: String },
    Alternation { index: usize },
    Placeholder(Placeholder),
}

fn flush_text(text: &mut String, tokens: &mut Vec<Token>) {
    if !text.is_empty() {
        tokens.push(Token::Text(std::mem::take(text)));
    }
}

/// Split expression text into literal runs, whitespace, optional text,
/// alternation markers and placeholders.
///
/// A backslash makes the next character literal, so `\{` never opens a
/// placeholder and `\/` never separates alternatives. Unpaired `}` and `)`
/// are ordinary text.
pub(crate) fn lex_expression(expression: &str) -> Result<Vec<Token>, PatternError> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut chars = expression.char_indices();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, escaped)) => text.push(escaped),
                None => text.push('\\'),
            },
            '{' => {
                flush_text(&mut text, &mut tokens);
                let placeholder = parse_placeholder(pos, &mut chars)?;
                tokens.push(Token::Placeholder(placeholder));
            }
            '(' => {
                flush_text(&mut text, &mut tokens);
                let optional = parse_optional(pos, &mut chars)?;
                tokens.push(Token::Optional {
                    start: pos,
                    text: optional,
                });
            }
            '/' => {
                flush_text(&mut text, &mut tokens);
                tokens.push(Token::Alternation { index: pos });
            }
            ws if ws.is_whitespace() => {
                flush_text(&mut text, &mut tokens);
                if let Some(Token::Whitespace(run)) = tokens.last_mut() {
                    run.push(ws);
                } else {
                    tokens.push(Token::Whitespace(ws.to_string()));
                }
            }
            other => text.push(other),
        }
    }

    flush_text(&mut text, &mut tokens);
    Ok(tokens)
}
