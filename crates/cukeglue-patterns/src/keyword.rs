//! Step keywords as written in feature files and glue definitions.
//!
//! Matching a step against glue never looks at the keyword. Keywords only
//! drive reporting and snippet text, where `And`/`But` are shown as written
//! but resolved to the preceding primary keyword when a suggestion is built.

use gherkin::StepType;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Keyword introducing a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKeyword {
    /// Context the scenario starts from.
    Given,
    /// Action under test.
    When,
    /// Expected outcome.
    Then,
    /// Continues the previous primary keyword.
    And,
    /// Contrasting continuation of the previous primary keyword.
    But,
}

impl StepKeyword {
    /// Canonical English spelling.
    ///
    /// ```
    /// use cukeglue_patterns::StepKeyword;
    ///
    /// assert_eq!(StepKeyword::Then.as_str(), "Then");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
            Self::And => "And",
            Self::But => "But",
        }
    }

    /// Whether this keyword borrows its meaning from the previous step.
    #[must_use]
    pub const fn is_conjunction(self) -> bool {
        matches!(self, Self::And | Self::But)
    }

    /// Resolve `And`/`But` to the last primary keyword seen.
    ///
    /// Primary keywords are recorded in `prev` and returned unchanged.
    /// Conjunctions return the recorded keyword, or `Given` when none has
    /// been seen yet.
    ///
    /// ```
    /// use cukeglue_patterns::StepKeyword;
    ///
    /// let mut prev = None;
    /// assert_eq!(StepKeyword::But.resolve(&mut prev), StepKeyword::Given);
    /// assert_eq!(StepKeyword::When.resolve(&mut prev), StepKeyword::When);
    /// assert_eq!(StepKeyword::And.resolve(&mut prev), StepKeyword::When);
    /// ```
    #[must_use]
    pub fn resolve(self, prev: &mut Option<Self>) -> Self {
        if self.is_conjunction() {
            prev.unwrap_or(Self::Given)
        } else {
            *prev = Some(self);
            self
        }
    }

    /// Classify a gherkin step from its written keyword and parsed type.
    ///
    /// The parser folds `And`/`But` into the previous step's type, so the
    /// keyword text is consulted first and the type is the fallback.
    ///
    /// # Errors
    /// Returns [`UnsupportedStepType`] when neither the text nor the type
    /// names a known keyword.
    pub fn from_gherkin(keyword: &str, ty: StepType) -> Result<Self, UnsupportedStepType> {
        keyword
            .parse()
            .or_else(|_| Self::try_from(ty))
    }
}

impl fmt::Display for StepKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`StepKeyword`] from text fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid step keyword: {0}")]
pub struct StepKeywordParseError(pub String);

impl FromStr for StepKeyword {
    type Err = StepKeywordParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        [Self::Given, Self::When, Self::Then, Self::And, Self::But]
            .into_iter()
            .find(|kw| trimmed.eq_ignore_ascii_case(kw.as_str()))
            .ok_or_else(|| StepKeywordParseError(trimmed.to_string()))
    }
}

/// Error raised when a gherkin [`StepType`] has no [`StepKeyword`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unsupported step type: {0:?}")]
pub struct UnsupportedStepType(pub StepType);

impl TryFrom<StepType> for StepKeyword {
    type Error = UnsupportedStepType;

    fn try_from(ty: StepType) -> Result<Self, Self::Error> {
        match ty {
            StepType::Given => Ok(Self::Given),
            StepType::When => Ok(Self::When),
            StepType::Then => Ok(Self::Then),
            #[expect(unreachable_patterns, reason = "gherkin may add step types")]
            other => Err(UnsupportedStepType(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Given", StepKeyword::Given)]
    #[case(" WhEn ", StepKeyword::When)]
    #[case("THEN", StepKeyword::Then)]
    #[case("and ", StepKeyword::And)]
    #[case("But", StepKeyword::But)]
    fn parses_case_insensitively(#[case] input: &str, #[case] expected: StepKeyword) {
        assert_eq!(input.parse::<StepKeyword>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_keyword() {
        assert_eq!(
            "Suppose".parse::<StepKeyword>(),
            Err(StepKeywordParseError("Suppose".into()))
        );
    }

    #[rstest]
    #[case("And ", StepType::When, StepKeyword::And)]
    #[case("Given ", StepType::Given, StepKeyword::Given)]
    #[case("Angenommen ", StepType::Given, StepKeyword::Given)]
    #[case("* ", StepType::Then, StepKeyword::Then)]
    fn classifies_gherkin_steps(
        #[case] text: &str,
        #[case] ty: StepType,
        #[case] expected: StepKeyword,
    ) {
        assert_eq!(StepKeyword::from_gherkin(text, ty), Ok(expected));
    }

    #[test]
    fn conjunctions_do_not_update_previous() {
        let mut prev = Some(StepKeyword::Then);
        assert_eq!(StepKeyword::And.resolve(&mut prev), StepKeyword::Then);
        assert_eq!(prev, Some(StepKeyword::Then));
    }

    #[test]
    fn displays_canonical_spelling() {
        assert_eq!(StepKeyword::But.to_string(), "But");
    }
}
