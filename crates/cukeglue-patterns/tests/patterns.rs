//! Public-API tests for compiling expressions and reading arguments back out.
#![expect(clippy::expect_used, reason = "integration tests fail loudly on setup errors")]

use regex::Regex;
use rstest::rstest;

use cukeglue_patterns::{
    CaptureGroupIntrospector, PatternDialect, PatternError,
    RegexSyntaxIntrospector, build_regex_from_expression, expression_placeholders,
    extract_argument_values,
};

fn builtin_alternatives(name: &str) -> Result<Vec<String>, PatternError> {
    Ok(match name {
        "int" => vec![r"(?:-?\d+)".into(), r"(?:\d+)".into()],
        "word" => vec![r"[^\s]+".into()],
        "string" => vec![r#""([^"\\]*(\\.[^"\\]*)*)""#.into()],
        _ => vec![".*".into()],
    })
}

fn compile(pattern: &str) -> Regex {
    let (dialect, source) = PatternDialect::detect(pattern);
    let source = match dialect {
        PatternDialect::Expression => {
            build_regex_from_expression(source, |p| builtin_alternatives(&p.name))
                .expect("expression should compile")
        }
        PatternDialect::Regular => source.to_string(),
    };
    Regex::new(&source).expect("regex should compile")
}

fn arguments(pattern: &str, text: &str) -> Vec<Option<String>> {
    let regex = compile(pattern);
    let groups: Vec<usize> = RegexSyntaxIntrospector
        .top_level_groups(&regex)
        .expect("groups introspect")
        .iter()
        .map(|g| g.index())
        .collect();
    extract_argument_values(&regex, &groups, text)
        .unwrap_or_else(|| panic!("`{text}` should match `{pattern}`"))
}

#[rstest]
#[case("I have {int} cukes", "I have 42 cukes", &["42"])]
#[case("{word} says {string}", r#"Bob says "hi there""#, &["Bob", r#""hi there""#])]
#[case(r"^I have (\d+) (big|small) cukes$", "I have 3 big cukes", &["3", "big"])]
#[case("/a ((b)c) d/", "a bc d", &["bc"])]
fn one_value_per_argument(#[case] pattern: &str, #[case] text: &str, #[case] expected: &[&str]) {
    let values: Vec<String> = arguments(pattern, text).into_iter().flatten().collect();
    assert_eq!(values, expected);
}

#[test]
fn expression_groups_line_up_with_placeholders() {
    let pattern = "{int} {word} {string} {}";
    let placeholders = expression_placeholders(pattern)
        .expect("expression should lex");
    let regex = compile(pattern);
    let groups = RegexSyntaxIntrospector
        .top_level_groups(&regex)
        .expect("groups introspect");
    assert_eq!(groups.len(), placeholders.len());
}

#[test]
fn optional_text_and_alternation_match_both_forms() {
    let regex = compile("I have {int} cuke(s) in my belly/stomach");
    assert!(regex.is_match("I have 1 cuke in my belly"));
    assert!(regex.is_match("I have 2 cukes in my stomach"));
    assert!(!regex.is_match("I have 2 cukes in my tummy"));
}

#[test]
fn exposes_placeholder_error_details() {
    let Err(err) = expression_placeholders("{bad name}") else {
        panic!("expected placeholder error");
    };
    let PatternError::Placeholder(info) = err else {
        panic!("expected placeholder error, got {err}");
    };
    assert_eq!(info.placeholder.as_deref(), Some("bad"));
    assert_eq!(info.position, 0);
}
