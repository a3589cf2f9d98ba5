//! Expression-text lexing and compilation helpers.

mod compiler;
mod lexer;
mod placeholder;

use crate::errors::PatternError;

pub use compiler::build_regex_from_expression;
pub use placeholder::Placeholder;

/// List the `{name}` placeholders of an expression in document order.
///
/// Escaped braces (`\{`) are literal text and never produce a placeholder.
///
/// # Errors
/// Returns [`PatternError`] when the expression text is malformed.
///
/// # Examples
/// ```
/// use cukeglue_patterns::expression_placeholders;
///
/// let names: Vec<_> = expression_placeholders(r"{int} \{int} {word}")
///     .expect("valid expression")
///     .into_iter()
///     .map(|p| p.name)
///     .collect();
/// assert_eq!(names, ["int", "word"]);
/// ```
pub fn expression_placeholders(expression: &str) -> Result<Vec<Placeholder>, PatternError> {
    Ok(lexer::lex_expression(expression)?
        .into_iter()
        .filter_map(|token| match token {
            lexer::Token::Placeholder(placeholder) => Some(placeholder),
            _ => None,
        })
        .collect())
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests fail loudly on unexpected errors")]
mod tests {
    use super::*;
    use regex::Regex;
    use rstest::rstest;

    fn names(expression: &str) -> Vec<String> {
        expression_placeholders(expression)
            .expect("expression should lex")
            .into_iter()
            .map(|p| p.name)
            .collect()
    }

    #[rstest]
    #[case("no placeholders here", &[])]
    #[case("I have {int} cukes", &["int"])]
    #[case("{word} and {float} then {}", &["word", "float", ""])]
    #[case(r"literal \{int} only", &[])]
    #[case("cuke(s) {int}/x", &["int"])]
    fn lists_placeholders_in_order(#[case] expression: &str, #[case] expected: &[&str]) {
        assert_eq!(names(expression), expected);
    }

    #[test]
    fn compiled_groups_match_placeholder_count() {
        let expression = "from {int} to {word} via {}";
        let source = build_regex_from_expression(expression, |p| {
            Ok::<_, PatternError>(vec![match p.name.as_str() {
                "int" => r"-?\d+".into(),
                "word" => r"[^\s]+".into(),
                _ => ".*".into(),
            }])
        })
        .expect("expression should compile");
        let regex = Regex::new(&source).expect("test regex compiles");
        assert_eq!(regex.captures_len() - 1, names(expression).len());
        assert!(regex.is_match("from -3 to home via anywhere at all"));
    }

    #[test]
    fn rejects_unterminated_placeholder() {
        let Err(err) = expression_placeholders("broken {int") else {
            panic!("unterminated placeholder should fail");
        };
        assert!(matches!(err, PatternError::Placeholder(ref info) if info.position == 7));
    }
}
