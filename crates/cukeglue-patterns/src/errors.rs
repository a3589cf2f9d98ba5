//! Error types shared by the pattern parsing modules.

use std::fmt;
use thiserror::Error;

/// Additional context for placeholder-related parsing errors.
///
/// # Examples
/// ```
/// use cukeglue_patterns::PlaceholderErrorInfo;
/// let info = PlaceholderErrorInfo::new("invalid placeholder", 3, Some("value".into()));
/// assert_eq!(info.placeholder.as_deref(), Some("value"));
/// assert_eq!(info.position, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderErrorInfo {
    /// Human-readable reason for the failure.
    pub message: &'static str,
    /// Zero-based byte offset in the pattern where parsing failed.
    pub position: usize,
    /// Placeholder name, when the failure concerns one.
    pub placeholder: Option<String>,
}

impl PlaceholderErrorInfo {
    /// Create a new error description for a placeholder failure.
    #[must_use]
    pub fn new(message: &'static str, position: usize, placeholder: Option<String>) -> Self {
        Self {
            message,
            position,
            placeholder,
        }
    }
}

impl fmt::Display for PlaceholderErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.placeholder {
            Some(name) => write!(
                f,
                "{} for placeholder `{}` at byte {} (zero-based)",
                self.message, name, self.position
            ),
            None => write!(f, "{} at byte {} (zero-based)", self.message, self.position),
        }
    }
}

/// Errors surfaced while converting step patterns into regular expressions.
///
/// # Examples
/// ```
/// use cukeglue_patterns::{PatternError, PlaceholderErrorInfo};
/// let info = PlaceholderErrorInfo::new("invalid", 2, Some("count".into()));
/// let err = PatternError::Placeholder(info.clone());
/// assert_eq!(err.to_string(), info.to_string());
/// ```
#[derive(Debug, Error)]
pub enum PatternError {
    /// The expression text contains malformed placeholder or optional syntax.
    #[error("{0}")]
    Placeholder(PlaceholderErrorInfo),
    /// The assembled regular expression failed to compile.
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

pub(crate) fn placeholder_error(
    message: &'static str,
    position: usize,
    placeholder: Option<String>,
) -> PatternError {
    PatternError::Placeholder(PlaceholderErrorInfo::new(message, position, placeholder))
}

/// Raised when a compiled regex does not have the group structure the
/// introspector expects.
///
/// There is no fallback: callers must surface the error rather than guess at
/// argument positions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntrospectionError {
    /// The regex source could not be parsed into a syntax tree.
    #[error("cannot introspect capture groups of `{pattern}`: {reason}")]
    Parse {
        /// Source of the regex being introspected.
        pattern: String,
        /// Parser diagnostic.
        reason: String,
    },
    /// The syntax tree and the compiled regex disagree on the group count.
    #[error(
        "capture-group layout of `{pattern}` is not understood: \
         compiled regex reports {expected} groups, syntax tree has {found}"
    )]
    GroupCountMismatch {
        /// Source of the regex being introspected.
        pattern: String,
        /// Group count reported by the compiled regex.
        expected: usize,
        /// Group count found while walking the syntax tree.
        found: usize,
    },
    /// A group span pointed outside the regex source.
    #[error("capture group {index} of `{pattern}` has no readable source span")]
    SpanOutOfBounds {
        /// Source of the regex being introspected.
        pattern: String,
        /// One-based capture index of the offending group.
        index: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_placeholder_with_name() {
        let info = PlaceholderErrorInfo::new("invalid", 4, Some("count".into()));
        assert_eq!(
            info.to_string(),
            "invalid for placeholder `count` at byte 4 (zero-based)"
        );
    }

    #[test]
    fn formats_placeholder_without_name() {
        let info = PlaceholderErrorInfo::new("oops", 1, None);
        assert_eq!(info.to_string(), "oops at byte 1 (zero-based)");
    }

    #[test]
    fn forwards_regex_error_display() {
        let err = PatternError::Regex(regex::Error::Syntax("bad".into()));
        assert_eq!(
            err.to_string(),
            regex::Error::Syntax("bad".into()).to_string()
        );
    }

    #[test]
    fn introspection_mismatch_names_both_counts() {
        let err = IntrospectionError::GroupCountMismatch {
            pattern: "(a)(b)".into(),
            expected: 2,
            found: 1,
        };
        let text = err.to_string();
        assert!(text.contains("reports 2 groups"));
        assert!(text.contains("syntax tree has 1"));
    }
}
