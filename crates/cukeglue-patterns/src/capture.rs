//! Regex capture helpers shared by the host matcher and the adapter.

use regex::Regex;

/// Extract the values of the given capture groups when `text` matches `re`.
///
/// Returns `None` when `re` does not match. `groups` holds one-based capture
/// indices, normally the top-level groups reported by a
/// [`CaptureGroupIntrospector`](crate::CaptureGroupIntrospector); nested
/// groups are left out so each value lines up with one step argument. A group
/// that did not participate in the match yields `None`.
///
/// # Examples
/// ```
/// # use regex::Regex;
/// # use cukeglue_patterns::extract_argument_values;
/// let regex = Regex::new(r"^(\d+)-((\w)\w*)$").expect("example regex compiles");
/// let values = extract_argument_values(&regex, &[1, 2], "42-answer")
///     .expect("text matches");
/// assert_eq!(values, vec![Some("42".into()), Some("answer".into())]);
/// assert!(extract_argument_values(&regex, &[1, 2], "nope").is_none());
/// ```
#[must_use]
pub fn extract_argument_values(
    re: &Regex,
    groups: &[usize],
    text: &str,
) -> Option<Vec<Option<String>>> {
    let caps = re.captures(text)?;
    Some(
        groups
            .iter()
            .map(|&index| caps.get(index).map(|m| m.as_str().to_string()))
            .collect(),
    )
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests fail loudly on unexpected errors")]
mod tests {
    use super::*;

    fn regex(source: &str) -> Regex {
        Regex::new(source).expect("test regex must compile")
    }

    #[test]
    fn returns_none_when_pattern_does_not_match() {
        assert!(extract_argument_values(&regex(r"^(\d+)$"), &[1], "nope").is_none());
    }

    #[test]
    fn collects_requested_groups_in_order() {
        let re = regex(r"^(\d+)-(\w+)-(\d+)$");
        let values = extract_argument_values(&re, &[1, 2, 3], "12-answer-7");
        assert_eq!(
            values,
            Some(vec![
                Some("12".to_string()),
                Some("answer".to_string()),
                Some("7".to_string()),
            ])
        );
    }

    #[test]
    fn reports_non_participating_groups_as_none() {
        let re = regex(r"^(a)?(b)?$");
        let values = extract_argument_values(&re, &[1, 2], "a");
        assert_eq!(values, Some(vec![Some("a".to_string()), None]));
    }

    #[test]
    fn skips_nested_groups() {
        let re = regex(r"^((\d)\d*) (x)$");
        let values = extract_argument_values(&re, &[1, 3], "123 x");
        assert_eq!(
            values,
            Some(vec![Some("123".to_string()), Some("x".to_string())])
        );
    }
}
