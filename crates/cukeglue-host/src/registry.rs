//! Run-scoped registry of parameter types.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::trace;

use crate::error::HostError;
use crate::parameter::{ParameterType, built_in_parameter_types};

/// Lookup operations over the parameter types known to one run.
pub trait TypeRegistry {
    /// Add a parameter type.
    ///
    /// # Errors
    /// Rejects invalid or duplicate names and a second preferential type for
    /// the same regex.
    fn register_type(&mut self, parameter_type: ParameterType) -> Result<(), HostError>;

    /// Find the type referenced by `{name}`. The empty name is the anonymous
    /// type.
    fn lookup_by_syntax_token(&self, name: &str) -> Option<Arc<ParameterType>>;

    /// Every registered type in registration order, built-ins first.
    fn list_all_known_types(&self) -> Vec<Arc<ParameterType>>;

    /// Find the type whose regex alternative equals a capture group's source.
    ///
    /// `enclosing_source` and `context_hint` only feed diagnostics.
    ///
    /// # Errors
    /// Returns [`HostError::AmbiguousParameterType`] when several types share
    /// the regex and none of them is preferential.
    fn lookup_by_raw_pattern_source(
        &self,
        source: &str,
        enclosing_source: &str,
        context_hint: &str,
    ) -> Result<Option<Arc<ParameterType>>, HostError>;
}

/// Default [`TypeRegistry`], pre-populated with the built-in types.
#[derive(Debug, Clone)]
pub struct ParameterTypeRegistry {
    ordered: Vec<Arc<ParameterType>>,
    by_name: BTreeMap<String, Arc<ParameterType>>,
    by_regexp: BTreeMap<String, Vec<Arc<ParameterType>>>,
}

impl Default for ParameterTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterTypeRegistry {
    /// Create a registry holding `int`, `long`, `float`, `double`, `word`,
    /// `string` and the anonymous type.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            ordered: Vec::new(),
            by_name: BTreeMap::new(),
            by_regexp: BTreeMap::new(),
        };
        for parameter_type in built_in_parameter_types() {
            registry.insert(Arc::new(parameter_type));
        }
        registry
    }

    fn insert(&mut self, parameter_type: Arc<ParameterType>) {
        for regexp in parameter_type.regexps() {
            self.by_regexp
                .entry(regexp.clone())
                .or_default()
                .push(Arc::clone(&parameter_type));
        }
        self.by_name
            .insert(parameter_type.name().to_string(), Arc::clone(&parameter_type));
        self.ordered.push(parameter_type);
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|ch| matches!(ch, '{' | '}' | '(' | ')' | '\\' | '/') || ch.is_whitespace())
}

impl TypeRegistry for ParameterTypeRegistry {
    fn register_type(&mut self, parameter_type: ParameterType) -> Result<(), HostError> {
        let name = parameter_type.name();
        if !is_valid_name(name) {
            return Err(HostError::InvalidParameterTypeName(name.to_string()));
        }
        if self.by_name.contains_key(name) {
            return Err(HostError::DuplicateParameterType(name.to_string()));
        }
        if parameter_type.is_preferential() {
            for regexp in parameter_type.regexps() {
                let existing = self
                    .by_regexp
                    .get(regexp)
                    .and_then(|types| types.iter().find(|t| t.is_preferential()));
                if let Some(existing) = existing {
                    return Err(HostError::DuplicatePreferentialParameterType {
                        regex: regexp.clone(),
                        existing: existing.name().to_string(),
                        added: name.to_string(),
                    });
                }
            }
        }
        trace!(name, regexps = ?parameter_type.regexps(), "registered parameter type");
        self.insert(Arc::new(parameter_type));
        Ok(())
    }

    fn lookup_by_syntax_token(&self, name: &str) -> Option<Arc<ParameterType>> {
        self.by_name.get(name).cloned()
    }

    fn list_all_known_types(&self) -> Vec<Arc<ParameterType>> {
        self.ordered.clone()
    }

    fn lookup_by_raw_pattern_source(
        &self,
        source: &str,
        enclosing_source: &str,
        context_hint: &str,
    ) -> Result<Option<Arc<ParameterType>>, HostError> {
        let Some(candidates) = self.by_regexp.get(source) else {
            return Ok(None);
        };
        match candidates.as_slice() {
            [] => Ok(None),
            [only] => Ok(Some(Arc::clone(only))),
            several => {
                let mut preferential = several.iter().filter(|t| t.is_preferential());
                match (preferential.next(), preferential.next()) {
                    (Some(chosen), None) => Ok(Some(Arc::clone(chosen))),
                    _ => {
                        trace!(source, context_hint, "ambiguous capture group");
                        Err(HostError::AmbiguousParameterType {
                            regex: source.to_string(),
                            pattern: enclosing_source.to_string(),
                            candidates: several.iter().map(|t| t.name().to_string()).collect(),
                        })
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests fail loudly on unexpected errors")]
mod tests {
    use super::*;
    use crate::parameter::TargetType;
    use crate::value::Value;
    use rstest::{fixture, rstest};

    #[fixture]
    fn registry() -> ParameterTypeRegistry {
        ParameterTypeRegistry::new()
    }

    fn text_type(name: &str, regexp: &str) -> ParameterType {
        ParameterType::new(name, vec![regexp.into()], TargetType::Text, |text| {
            Ok(Value::Text(text.into()))
        })
    }

    #[rstest]
    fn knows_built_ins(registry: ParameterTypeRegistry) {
        for name in ["int", "long", "float", "double", "word", "string", ""] {
            assert!(registry.lookup_by_syntax_token(name).is_some(), "{name}");
        }
        assert!(registry.lookup_by_syntax_token("colour").is_none());
    }

    #[rstest]
    fn raw_lookup_prefers_preferential_type(registry: ParameterTypeRegistry) {
        let found = registry
            .lookup_by_raw_pattern_source(r"\d+", r"^(\d+)$", "")
            .expect("lookup succeeds");
        assert_eq!(found.map(|t| t.name().to_string()), Some("int".into()));
    }

    #[rstest]
    fn raw_lookup_misses_unknown_sources(registry: ParameterTypeRegistry) {
        let found = registry
            .lookup_by_raw_pattern_source("[a-z]+", "([a-z]+)", "")
            .expect("lookup succeeds");
        assert!(found.is_none());
    }

    #[rstest]
    fn raw_lookup_is_ambiguous_without_preference(mut registry: ParameterTypeRegistry) {
        for name in ["colour", "flavour"] {
            registry
                .register_type(text_type(name, "red|green"))
                .expect("parameter type registers");
        }
        let result = registry.lookup_by_raw_pattern_source("red|green", "(red|green)", "");
        assert!(matches!(
            result,
            Err(HostError::AmbiguousParameterType { ref candidates, .. }) if candidates.len() == 2
        ));
    }

    #[rstest]
    fn rejects_duplicate_names(mut registry: ParameterTypeRegistry) {
        let result = registry.register_type(text_type("int", "x"));
        assert!(matches!(result, Err(HostError::DuplicateParameterType(ref n)) if n == "int"));
    }

    #[rstest]
    fn rejects_second_preferential_type(mut registry: ParameterTypeRegistry) {
        let result = registry.register_type(text_type("count", r"\d+").prefer_for_regexp_match(true));
        assert!(matches!(
            result,
            Err(HostError::DuplicatePreferentialParameterType { ref existing, .. }) if existing == "int"
        ));
    }

    #[rstest]
    #[case("")]
    #[case("two words")]
    #[case("bra{ce")]
    #[case("a/b")]
    fn rejects_invalid_names(mut registry: ParameterTypeRegistry, #[case] name: &str) {
        let result = registry.register_type(text_type(name, "x"));
        assert!(matches!(result, Err(HostError::InvalidParameterTypeName(_))));
    }

    #[rstest]
    fn lists_custom_types_after_built_ins(mut registry: ParameterTypeRegistry) {
        registry
            .register_type(text_type("colour", "red|blue"))
            .expect("parameter type registers");
        let names: Vec<_> = registry
            .list_all_known_types()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(names.last().map(String::as_str), Some("colour"));
        assert_eq!(names.first().map(String::as_str), Some("int"));
    }
}
