//! Capture-group introspection for raw regular-expression step patterns.
//!
//! The compiled [`Regex`] only reports how many groups it has. Mapping each
//! argument back to the sub-pattern that produced it needs the parsed syntax
//! tree, which `regex-syntax` exposes. The walk is kept behind
//! [`CaptureGroupIntrospector`] so callers never touch the tree directly.

use regex::Regex;
use regex_syntax::ast::{self, Ast};

use crate::errors::IntrospectionError;

/// A capturing group found in a regex, with the groups nested inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureGroup {
    index: usize,
    source: String,
    children: Vec<CaptureGroup>,
}

impl CaptureGroup {
    /// One-based capture index as used by [`regex::Captures::get`].
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Source text between the group's parentheses, excluding any `?P<name>`
    /// prefix.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Capturing groups nested directly or indirectly inside this one, in
    /// declaration order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }
}

/// Enumerates the top-level capture groups of a compiled regex.
///
/// Nested groups belong to their enclosing argument and are reported only as
/// children. Implementations must fail rather than guess when the compiled
/// regex and the structure they discover disagree.
pub trait CaptureGroupIntrospector {
    /// Return the top-level capture groups of `regex` in declaration order.
    ///
    /// # Errors
    /// Returns [`IntrospectionError`] when the regex structure cannot be
    /// recovered.
    fn top_level_groups(&self, regex: &Regex) -> Result<Vec<CaptureGroup>, IntrospectionError>;
}

/// [`CaptureGroupIntrospector`] backed by the `regex-syntax` AST parser.
///
/// # Examples
/// ```
/// use cukeglue_patterns::{CaptureGroupIntrospector, RegexSyntaxIntrospector};
/// use regex::Regex;
///
/// let regex = Regex::new(r"^I have (\d+) (?:big )?(cukes|gherkins( too)?)$")
///     .expect("example regex compiles");
/// let groups = RegexSyntaxIntrospector
///     .top_level_groups(&regex)
///     .expect("structure is readable");
/// let sources: Vec<_> = groups.iter().map(|g| g.source()).collect();
/// assert_eq!(sources, [r"\d+", "cukes|gherkins( too)?"]);
/// assert_eq!(groups[1].children().len(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexSyntaxIntrospector;

impl CaptureGroupIntrospector for RegexSyntaxIntrospector {
    fn top_level_groups(&self, regex: &Regex) -> Result<Vec<CaptureGroup>, IntrospectionError> {
        let pattern = regex.as_str();
        let tree = ast::parse::Parser::new()
            .parse(pattern)
            .map_err(|err| IntrospectionError::Parse {
                pattern: pattern.to_string(),
                reason: err.kind().to_string(),
            })?;

        let mut groups = Vec::new();
        collect_groups(pattern, &tree, &mut groups)?;

        let expected = regex.captures_len().saturating_sub(1);
        let found = groups.iter().map(count_groups).sum::<usize>();
        if expected != found {
            return Err(IntrospectionError::GroupCountMismatch {
                pattern: pattern.to_string(),
                expected,
                found,
            });
        }
        Ok(groups)
    }
}

fn count_groups(group: &CaptureGroup) -> usize {
    1 + group.children.iter().map(count_groups).sum::<usize>()
}

fn collect_groups(
    pattern: &str,
    node: &Ast,
    out: &mut Vec<CaptureGroup>,
) -> Result<(), IntrospectionError> {
    match node {
        Ast::Group(group) => {
            if let Some(index) = group.capture_index() {
                let inner = group.ast.span();
                let source = pattern
                    .get(inner.start.offset..inner.end.offset)
                    .ok_or_else(|| IntrospectionError::SpanOutOfBounds {
                        pattern: pattern.to_string(),
                        index,
                    })?;
                let mut children = Vec::new();
                collect_groups(pattern, &group.ast, &mut children)?;
                out.push(CaptureGroup {
                    index: index as usize,
                    source: source.to_string(),
                    children,
                });
                Ok(())
            } else {
                collect_groups(pattern, &group.ast, out)
            }
        }
        Ast::Repetition(repetition) => collect_groups(pattern, &repetition.ast, out),
        Ast::Alternation(alternation) => alternation
            .asts
            .iter()
            .try_for_each(|child| collect_groups(pattern, child, out)),
        Ast::Concat(concat) => concat
            .asts
            .iter()
            .try_for_each(|child| collect_groups(pattern, child, out)),
        Ast::Empty(_)
        | Ast::Flags(_)
        | Ast::Literal(_)
        | Ast::Dot(_)
        | Ast::Assertion(_)
        | Ast::ClassUnicode(_)
        | Ast::ClassPerl(_)
        | Ast::ClassBracketed(_) => Ok(()),
    }
}
