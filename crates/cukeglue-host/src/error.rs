//! Semantic error types for the execution engine.
//!
//! Load-time failures (parameter types, patterns, features, options) are
//! fatal to the run and surface as a configuration exit status. Step failures
//! never use this type directly; they travel as [`StepError`] values.

use std::path::PathBuf;

use cukeglue_patterns::{IntrospectionError, PatternError};
use thiserror::Error;

/// Failure raised by a step function, hook function or parameter transform.
///
/// The engine records it against the owning step unmodified.
pub type StepError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while loading glue, features or options, or while writing
/// reports.
#[derive(Debug, Error)]
pub enum HostError {
    /// A `{name}` placeholder names no registered parameter type.
    #[error("undefined parameter type `{name}` in `{pattern}`")]
    UndefinedParameterType {
        /// Placeholder name.
        name: String,
        /// Expression text containing the placeholder.
        pattern: String,
    },

    /// A parameter type with the same name is already registered.
    #[error("there is already a parameter type named `{0}`")]
    DuplicateParameterType(String),

    /// Several non-preferential parameter types share a capture-group regex.
    #[error(
        "capture group `({regex})` in `{pattern}` matches parameter types {candidates:?}; \
         mark one of them as preferential for regular expressions"
    )]
    AmbiguousParameterType {
        /// Group source that was looked up.
        regex: String,
        /// Full pattern containing the group.
        pattern: String,
        /// Names of the competing parameter types.
        candidates: Vec<String>,
    },

    /// Two parameter types claim to be preferential for the same regex.
    #[error(
        "parameter types `{existing}` and `{added}` are both preferential for `{regex}`"
    )]
    DuplicatePreferentialParameterType {
        /// Shared regex alternative.
        regex: String,
        /// Name of the type registered first.
        existing: String,
        /// Name of the type being registered.
        added: String,
    },

    /// Parameter type names may not contain expression syntax or whitespace.
    #[error("invalid parameter type name `{0}`")]
    InvalidParameterTypeName(String),

    /// A step pattern could not be compiled.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// A compiled regex could not be introspected.
    #[error(transparent)]
    Introspection(#[from] IntrospectionError),

    /// A feature file is not valid Gherkin.
    #[error("failed to parse feature file {}: {message}", path.display())]
    FeatureParse {
        /// Offending feature file.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// A configured feature path does not exist.
    #[error("no such feature path: {}", .0.display())]
    FeatureNotFound(PathBuf),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Host arguments could not be parsed.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// An environment or option value was rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The backend failed to load its glue.
    #[error("failed to load glue: {0}")]
    Backend(#[source] StepError),

    /// A report could not be serialised.
    #[error("failed to write report: {0}")]
    Report(#[from] serde_json::Error),

    /// A matched step supplied a different number of arguments than its
    /// definition declares.
    #[error(
        "step `{pattern}` defined at {location} takes {expected} arguments, \
         but the gherkin step supplies {found}"
    )]
    ArityMismatch {
        /// Pattern of the matched definition.
        pattern: String,
        /// Glue location of the matched definition.
        location: String,
        /// Declared parameter count.
        expected: usize,
        /// Extracted argument count.
        found: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_parameter_type_names_pattern() {
        let error = HostError::UndefinedParameterType {
            name: "colour".into(),
            pattern: "I pick {colour}".into(),
        };
        assert_eq!(
            error.to_string(),
            "undefined parameter type `colour` in `I pick {colour}`"
        );
    }

    #[test]
    fn feature_not_found_displays_path() {
        let error = HostError::FeatureNotFound(PathBuf::from("features/missing"));
        assert_eq!(error.to_string(), "no such feature path: features/missing");
    }

    #[test]
    fn arity_mismatch_lists_both_counts() {
        let error = HostError::ArityMismatch {
            pattern: "a {int}".into(),
            location: "steps.rs:3".into(),
            expected: 2,
            found: 1,
        };
        let text = error.to_string();
        assert!(text.contains("takes 2 arguments"));
        assert!(text.contains("supplies 1"));
    }

    #[test]
    fn backend_error_keeps_source() {
        let error = HostError::Backend("boom".into());
        assert_eq!(error.to_string(), "failed to load glue: boom");
        assert!(std::error::Error::source(&error).is_some());
    }
}
