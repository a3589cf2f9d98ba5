//! Step expressions compiled against a parameter-type registry.
//!
//! The dialect of a pattern is decided by its own syntax (see
//! [`PatternDialect::detect`]). Both dialects compile to a [`Regex`]; only the
//! top-level capture groups of that regex produce arguments.

use std::sync::Arc;

use cukeglue_patterns::{
    CaptureGroup, CaptureGroupIntrospector, PatternDialect, PatternError,
    RegexSyntaxIntrospector, build_regex_from_expression, extract_argument_values,
};
use regex::Regex;

use crate::error::HostError;
use crate::parameter::ParameterType;
use crate::registry::TypeRegistry;

/// Expression text with `{name}` placeholders.
#[derive(Debug, Clone)]
pub struct CucumberExpression {
    source: String,
    regex: Regex,
    parameter_types: Vec<Arc<ParameterType>>,
    groups: Vec<usize>,
}

impl CucumberExpression {
    /// Parameter types referenced by the placeholders, in document order.
    #[must_use]
    pub fn parameter_types(&self) -> &[Arc<ParameterType>] {
        &self.parameter_types
    }
}

/// Raw regular expression.
#[derive(Debug, Clone)]
pub struct RegularExpression {
    source: String,
    regex: Regex,
    groups: Vec<CaptureGroup>,
}

impl RegularExpression {
    /// Top-level capture groups in declaration order.
    #[must_use]
    pub fn groups(&self) -> &[CaptureGroup] {
        &self.groups
    }
}

/// A compiled step pattern.
#[derive(Debug, Clone)]
pub enum StepExpression {
    /// Compiled from expression text.
    Cucumber(CucumberExpression),
    /// Compiled from a raw regular expression.
    Regular(RegularExpression),
}

impl StepExpression {
    /// The pattern exactly as written in the glue.
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::Cucumber(expression) => &expression.source,
            Self::Regular(expression) => &expression.source,
        }
    }

    /// The compiled regex.
    #[must_use]
    pub fn regex(&self) -> &Regex {
        match self {
            Self::Cucumber(expression) => &expression.regex,
            Self::Regular(expression) => &expression.regex,
        }
    }

    /// Dialect the pattern was compiled as.
    #[must_use]
    pub const fn dialect(&self) -> PatternDialect {
        match self {
            Self::Cucumber(_) => PatternDialect::Expression,
            Self::Regular(_) => PatternDialect::Regular,
        }
    }

    fn group_indices(&self) -> Vec<usize> {
        match self {
            Self::Cucumber(expression) => expression.groups.clone(),
            Self::Regular(expression) => expression.groups.iter().map(CaptureGroup::index).collect(),
        }
    }

    /// Number of arguments a match produces.
    #[must_use]
    pub fn argument_count(&self) -> usize {
        match self {
            Self::Cucumber(expression) => expression.groups.len(),
            Self::Regular(expression) => expression.groups.len(),
        }
    }

    /// Match step text, returning one value per top-level group.
    #[must_use]
    pub fn match_text(&self, text: &str) -> Option<Vec<Option<String>>> {
        extract_argument_values(self.regex(), &self.group_indices(), text)
    }
}

/// Compiles patterns against a registry.
///
/// # Examples
/// ```
/// use cukeglue_host::{ExpressionFactory, ParameterTypeRegistry, StepExpression};
///
/// let registry = ParameterTypeRegistry::new();
/// let factory = ExpressionFactory::new(&registry);
/// let expression = factory.create("I have {int} cukes").expect("compiles");
/// assert!(matches!(expression, StepExpression::Cucumber(_)));
/// assert_eq!(
///     expression.match_text("I have 42 cukes"),
///     Some(vec![Some("42".to_string())])
/// );
/// ```
pub struct ExpressionFactory<'r> {
    registry: &'r dyn TypeRegistry,
}

impl<'r> ExpressionFactory<'r> {
    /// Create a factory resolving placeholders through `registry`.
    #[must_use]
    pub fn new(registry: &'r dyn TypeRegistry) -> Self {
        Self { registry }
    }

    /// Compile `pattern` in the dialect its syntax selects.
    ///
    /// # Errors
    /// Returns [`HostError::UndefinedParameterType`] for unknown placeholders,
    /// [`HostError::Pattern`] for malformed patterns and
    /// [`HostError::Introspection`] when the capture-group layout cannot be
    /// recovered.
    pub fn create(&self, pattern: &str) -> Result<StepExpression, HostError> {
        let (dialect, source) = PatternDialect::detect(pattern);
        match dialect {
            PatternDialect::Expression => self.create_cucumber(pattern).map(StepExpression::Cucumber),
            PatternDialect::Regular => {
                let regex = compile(source)?;
                let groups = RegexSyntaxIntrospector.top_level_groups(&regex)?;
                Ok(StepExpression::Regular(RegularExpression {
                    source: pattern.to_string(),
                    regex,
                    groups,
                }))
            }
        }
    }

    fn create_cucumber(&self, pattern: &str) -> Result<CucumberExpression, HostError> {
        let mut parameter_types = Vec::new();
        let regex_source = build_regex_from_expression(pattern, |placeholder| {
            let parameter_type = self
                .registry
                .lookup_by_syntax_token(&placeholder.name)
                .ok_or_else(|| HostError::UndefinedParameterType {
                    name: placeholder.name.clone(),
                    pattern: pattern.to_string(),
                })?;
            let alternatives = parameter_type.regexps().to_vec();
            parameter_types.push(parameter_type);
            Ok::<_, HostError>(alternatives)
        })?;
        let regex = compile(&regex_source)?;
        let groups = RegexSyntaxIntrospector
            .top_level_groups(&regex)?
            .iter()
            .map(CaptureGroup::index)
            .collect();
        Ok(CucumberExpression {
            source: pattern.to_string(),
            regex,
            parameter_types,
            groups,
        })
    }
}

fn compile(source: &str) -> Result<Regex, HostError> {
    Regex::new(source).map_err(|err| HostError::Pattern(PatternError::from(err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ParameterTypeRegistry;
    use rstest::rstest;

    fn create(pattern: &str) -> Result<StepExpression, HostError> {
        let registry = ParameterTypeRegistry::new();
        ExpressionFactory::new(&registry).create(pattern)
    }

    fn compiled(pattern: &str) -> StepExpression {
        create(pattern).unwrap_or_else(|err| panic!("`{pattern}` should compile: {err}"))
    }

    #[rstest]
    #[case("I have {int} cukes", PatternDialect::Expression, 1)]
    #[case("{word} gives {string} to {word}", PatternDialect::Expression, 3)]
    #[case(r"^I have (\d+) cukes$", PatternDialect::Regular, 1)]
    #[case(r"/((a)(b)) (c)/", PatternDialect::Regular, 2)]
    #[case("no arguments", PatternDialect::Expression, 0)]
    fn counts_top_level_arguments(
        #[case] pattern: &str,
        #[case] dialect: PatternDialect,
        #[case] count: usize,
    ) {
        let expression = compiled(pattern);
        assert_eq!(expression.dialect(), dialect);
        assert_eq!(expression.argument_count(), count);
        assert_eq!(expression.source(), pattern);
    }

    #[test]
    fn string_placeholder_matches_quoted_text_once() {
        let expression = compiled("I say {string}");
        assert_eq!(
            expression.match_text(r#"I say "hello \"you\"""#),
            Some(vec![Some(r#""hello \"you\"""#.to_string())])
        );
    }

    #[test]
    fn expressions_are_anchored() {
        let expression = compiled("I have {int} cukes");
        assert!(expression.match_text("so I have 3 cukes").is_none());
    }

    #[test]
    fn regular_expressions_match_as_written() {
        let expression = compiled(r"I have (\d+)$");
        assert_eq!(
            expression.match_text("so I have 3"),
            Some(vec![Some("3".to_string())])
        );
    }

    #[test]
    fn unknown_placeholder_is_undefined_parameter_type() {
        let result = create("I pick {colour}");
        assert!(matches!(
            result,
            Err(HostError::UndefinedParameterType { ref name, .. }) if name == "colour"
        ));
    }

    #[test]
    fn invalid_regex_is_pattern_error() {
        assert!(matches!(create("^broken ($"), Err(HostError::Pattern(_))));
    }

    #[test]
    fn cucumber_expression_records_parameter_types() {
        let StepExpression::Cucumber(expression) = compiled("{int} and {float}") else {
            panic!("expected expression dialect");
        };
        let names: Vec<_> = expression
            .parameter_types()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(names, ["int", "float"]);
    }

    #[test]
    fn placeholders_compile_alongside_optional_and_alternative_text() {
        let expression = compiled("I eat/have {int} cuke(s)");
        assert_eq!(
            expression.match_text("I have 1 cuke"),
            Some(vec![Some("1".to_string())])
        );
        assert_eq!(
            expression.match_text("I eat 12 cukes"),
            Some(vec![Some("12".to_string())])
        );
    }
}
