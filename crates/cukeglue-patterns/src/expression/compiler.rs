//! Convert lexed expression tokens into anchored regular-expression sources.

use crate::errors::{PatternError, placeholder_error};

use super::lexer::{Token, lex_expression};
use super::placeholder::Placeholder;

/// Build an anchored regular expression from expression text.
///
/// Every placeholder becomes exactly one capture group wrapping the regex
/// alternatives returned by `alternatives_for`, so the top-level capture
/// groups of the result line up one-to-one with the placeholders in document
/// order. Optional text compiles to `(?:text)?` and `a/b` alternation within
/// a word compiles to `(?:a|b)`.
///
/// # Errors
/// Returns the caller's error type when lexing fails (via
/// `From<PatternError>`), when an alternation is malformed, or when
/// `alternatives_for` rejects a placeholder.
///
/// # Examples
/// ```
/// use cukeglue_patterns::{PatternError, build_regex_from_expression};
///
/// let regex = build_regex_from_expression("I have {int} cuke(s)", |_| {
///     Ok::<_, PatternError>(vec![r"-?\d+".to_string()])
/// })
/// .expect("example pattern compiles");
/// assert_eq!(regex, r"^I have (-?\d+) cuke(?:s)?$");
/// ```
pub fn build_regex_from_expression<F, E>(expression: &str, mut alternatives_for: F) -> Result<String, E>
where
    F: FnMut(&Placeholder) -> Result<Vec<String>, E>,
    E: From<PatternError>,
{
    let tokens = lex_expression(expression)?;
    let mut regex = String::with_capacity(expression.len().saturating_mul(2) + 2);
    regex.push('^');

    let mut word = Vec::new();
    for token in tokens {
        if let Token::Whitespace(run) = token {
            push_word(&mut regex, std::mem::take(&mut word), &mut alternatives_for)?;
            regex.push_str(&regex::escape(&run));
        } else {
            word.push(token);
        }
    }
    push_word(&mut regex, word, &mut alternatives_for)?;

    regex.push('$');
    Ok(regex)
}

fn push_word<F, E>(regex: &mut String, word: Vec<Token>, alternatives_for: &mut F) -> Result<(), E>
where
    F: FnMut(&Placeholder) -> Result<Vec<String>, E>,
    E: From<PatternError>,
{
    if word
        .iter()
        .any(|token| matches!(token, Token::Alternation { .. }))
    {
        return push_alternation(regex, word).map_err(E::from);
    }
    for token in word {
        match token {
            Token::Placeholder(placeholder) => {
                let alternatives = alternatives_for(&placeholder)?;
                push_capture_group(regex, &alternatives);
            }
            other => push_literal(regex, &other),
        }
    }
    Ok(())
}

fn push_alternation(regex: &mut String, word: Vec<Token>) -> Result<(), PatternError> {
    let mut branches: Vec<Vec<Token>> = vec![Vec::new()];
    let mut separator_at = 0;
    for token in word {
        match token {
            Token::Alternation { index } => {
                separator_at = index;
                branches.push(Vec::new());
            }
            Token::Placeholder(placeholder) => {
                return Err(placeholder_error(
                    "placeholders are not allowed in alternation",
                    placeholder.position,
                    Some(placeholder.name),
                ));
            }
            other => {
                if let Some(branch) = branches.last_mut() {
                    branch.push(other);
                }
            }
        }
    }
    if branches.iter().any(Vec::is_empty) {
        return Err(placeholder_error(
            "alternative may not be empty",
            separator_at,
            None,
        ));
    }

    regex.push_str("(?:");
    for (i, branch) in branches.iter().enumerate() {
        if i > 0 {
            regex.push('|');
        }
        for token in branch {
            push_literal(regex, token);
        }
    }
    regex.push(')');
    Ok(())
}

fn push_literal(regex: &mut String, token: &Token) {
    match token {
        Token::Text(text) | Token::Whitespace(text) => regex.push_str(&regex::escape(text)),
        Token::Optional { text, .. } => {
            regex.push_str("(?:");
            regex.push_str(&regex::escape(text));
            regex.push_str(")?");
        }
        Token::Alternation { .. } | Token::Placeholder(_) => {}
    }
}

fn push_capture_group(regex: &mut String, alternatives: &[String]) {
    regex.push('(');
    match alternatives {
        [single] => regex.push_str(single),
        many => {
            for (i, alternative) in many.iter().enumerate() {
                if i > 0 {
                    regex.push('|');
                }
                regex.push_str("(?:");
                regex.push_str(alternative);
                regex.push(')');
            }
        }
    }
    regex.push(')');
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests fail loudly on unexpected errors")]
mod tests {
    use super::*;

    fn digits(_: &Placeholder) -> Result<Vec<String>, PatternError> {
        Ok(vec![r"\d+".to_string()])
    }

    fn build(expression: &str) -> Result<String, PatternError> {
        build_regex_from_expression(expression, digits)
    }

    #[test]
    fn builds_regex_for_placeholder_patterns() {
        let regex = build("I have {int} cukes")
            .expect("pattern should compile");
        assert_eq!(regex, r"^I have (\d+) cukes$");
    }

    #[test]
    fn escapes_regex_metacharacters_in_literals() {
        let regex = build(r"costs $5.00 \(really\)")
            .expect("pattern should compile");
        assert_eq!(regex, r"^costs \$5\.00 \(really\)$");
    }

    #[test]
    fn wraps_multiple_alternatives_in_non_capturing_groups() {
        let regex = build_regex_from_expression("{int}", |_| {
            Ok::<_, PatternError>(vec![r"-?\d+".into(), r"\d+".into()])
        })
        .expect("pattern should compile");
        assert_eq!(regex, r"^((?:-?\d+)|(?:\d+))$");
    }

    #[test]
    fn compiles_word_alternation() {
        let regex =
            build("one cuke/cukes").expect("pattern should compile");
        assert_eq!(regex, "^one (?:cuke|cukes)$");
    }

    #[test]
    fn errors_on_empty_alternative() {
        let Err(err) = build("a / b") else {
            panic!("should fail");
        };
        assert!(err.to_string().contains("alternative may not be empty"));
    }

    #[test]
    fn errors_on_placeholder_inside_alternation() {
        let Err(err) = build("{int}/none") else {
            panic!("should fail");
        };
        assert!(
            err.to_string()
                .contains("placeholders are not allowed in alternation")
        );
    }

    #[test]
    fn surfaces_resolver_errors() {
        let result = build_regex_from_expression("{unknown}", |placeholder| {
            Err(placeholder_error(
                "unknown parameter type",
                placeholder.position,
                Some(placeholder.name.clone()),
            ))
        });
        let Err(err) = result else {
            panic!("should fail");
        };
        assert!(err.to_string().contains("`unknown`"));
    }
}
