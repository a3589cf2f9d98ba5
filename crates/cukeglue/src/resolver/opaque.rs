//! Type inference for raw regular-expression patterns.

use cukeglue_host::{StepExpression, TargetType, TypeRegistry};
use cukeglue_patterns::{CaptureGroupIntrospector, RegexSyntaxIntrospector};
use tracing::trace;

use super::{Converter, ResolvedParameter};
use crate::error::GlueError;

const CONTEXT_HINT: &str = "capture group of a step pattern";

/// One parameter per top-level capture group.
///
/// A group whose source equals a registered regex alternative takes that
/// type; any other group is passed through as text.
pub(super) fn resolve(
    expression: &StepExpression,
    registry: &dyn TypeRegistry,
) -> Result<Vec<ResolvedParameter>, GlueError> {
    let groups = RegexSyntaxIntrospector.top_level_groups(expression.regex())?;
    groups
        .iter()
        .map(|group| -> Result<ResolvedParameter, GlueError> {
            let known = registry.lookup_by_raw_pattern_source(
                group.source(),
                expression.source(),
                CONTEXT_HINT,
            )?;
            Ok(known.map_or_else(
                || {
                    trace!(group = group.source(), "untyped capture group");
                    ResolvedParameter::capture(TargetType::Text, Converter::PlainText)
                },
                |parameter_type| {
                    ResolvedParameter::capture(
                        parameter_type.target_type().clone(),
                        Converter::Transform(parameter_type.transformer()),
                    )
                },
            ))
        })
        .collect()
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests fail loudly on unexpected errors")]
mod tests {
    use super::*;
    use cukeglue_host::{ExpressionFactory, ParameterType, ParameterTypeRegistry, RawArgument, Value};

    fn compile(registry: &ParameterTypeRegistry, pattern: &str) -> StepExpression {
        ExpressionFactory::new(registry)
            .create(pattern)
            .expect("pattern compiles")
    }

    #[test]
    fn known_group_source_uses_its_transform() {
        let registry = ParameterTypeRegistry::new();
        let parameters = resolve(&compile(&registry, r"^I eat (-?\d+)$"), &registry)
            .expect("step resolves");
        let value = parameters
            .first()
            .map(|p| p.converter.convert(0, RawArgument::Text(Some("42".into()))))
            .expect("one parameter")
            .expect("argument converts");
        assert_eq!(value.as_integer(), Some(42));
    }

    #[test]
    fn ambiguous_group_source_is_an_error() {
        let mut registry = ParameterTypeRegistry::new();
        for name in ["left", "right"] {
            registry
                .register_type(ParameterType::new(
                    name,
                    vec!["[a-z]+ing".into()],
                    TargetType::Text,
                    |text| Ok(Value::Text(text.into())),
                ))
                .expect("parameter type registers");
        }
        let expression = compile(&registry, r"^I am ([a-z]+ing)$");
        assert!(matches!(
            resolve(&expression, &registry),
            Err(GlueError::Host(_))
        ));
    }
}
