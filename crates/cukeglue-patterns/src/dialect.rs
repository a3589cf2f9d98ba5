//! Selection between the two step-pattern dialects.

/// Pattern dialect inferred from the pattern's own syntax.
///
/// A pattern anchored with `^` or `$`, or wrapped in `/.../`, is a raw
/// regular expression. Everything else is expression text with `{name}`
/// placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternDialect {
    /// Expression text with named, typed placeholders.
    Expression,
    /// Raw regular expression whose capture groups supply arguments.
    Regular,
}

impl PatternDialect {
    /// Classify `pattern` and return the source to compile for it.
    ///
    /// Slash-delimited regexes have their delimiters removed; every other
    /// pattern is returned unchanged.
    ///
    /// # Examples
    /// ```
    /// use cukeglue_patterns::PatternDialect;
    ///
    /// assert_eq!(
    ///     PatternDialect::detect("I have {int} cukes"),
    ///     (PatternDialect::Expression, "I have {int} cukes")
    /// );
    /// assert_eq!(
    ///     PatternDialect::detect(r"^I have (\d+) cukes$"),
    ///     (PatternDialect::Regular, r"^I have (\d+) cukes$")
    /// );
    /// assert_eq!(
    ///     PatternDialect::detect("/a (.*) b/"),
    ///     (PatternDialect::Regular, "a (.*) b")
    /// );
    /// ```
    #[must_use]
    pub fn detect(pattern: &str) -> (Self, &str) {
        if pattern.starts_with('^') || pattern.ends_with('$') {
            return (Self::Regular, pattern);
        }
        if pattern.len() >= 2 {
            if let Some(inner) = pattern
                .strip_prefix('/')
                .and_then(|rest| rest.strip_suffix('/'))
            {
                return (Self::Regular, inner);
            }
        }
        (Self::Expression, pattern)
    }
}
