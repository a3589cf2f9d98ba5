//! Parameter types: named regex alternatives with a transform.

use std::fmt;
use std::sync::Arc;

use crate::error::StepError;
use crate::value::Value;

/// Kind of value a step argument converts to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetType {
    /// Plain text.
    Text,
    /// Whole number.
    Integer,
    /// Floating-point number.
    Float,
    /// `:name` token.
    Symbol,
    /// Step data table.
    DataTable,
    /// Step doc string.
    DocString,
    /// Type produced by a custom parameter type, named for snippets and
    /// diagnostics.
    Named(String),
}

impl TargetType {
    /// Name used when suggesting a parameter list for this type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Text | Self::Symbol | Self::DocString => "String",
            Self::Integer => "i64",
            Self::Float => "f64",
            Self::DataTable => "DataTable",
            Self::Named(name) => name,
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Integer => f.write_str("integer"),
            Self::Float => f.write_str("float"),
            Self::Symbol => f.write_str("symbol"),
            Self::DataTable => f.write_str("data table"),
            Self::DocString => f.write_str("doc string"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Conversion from matched text to a [`Value`].
pub type Transform = Arc<dyn Fn(&str) -> Result<Value, StepError> + Send + Sync>;

/// A named set of regex alternatives usable as `{name}` in expressions.
///
/// # Examples
/// ```
/// use cukeglue_host::{ParameterType, TargetType, Value};
///
/// let colour = ParameterType::new(
///     "colour",
///     vec!["red|green|blue".into()],
///     TargetType::Named("Colour".into()),
///     |text| Ok(Value::Text(text.to_uppercase())),
/// )
/// .use_for_snippets(false);
/// assert_eq!(colour.name(), "colour");
/// assert!(matches!(colour.transform("red"), Ok(Value::Text(t)) if t == "RED"));
/// ```
#[derive(Clone)]
pub struct ParameterType {
    name: String,
    regexps: Vec<String>,
    target_type: TargetType,
    transform: Transform,
    use_for_snippets: bool,
    prefer_for_regexp_match: bool,
    strong_type_hint: bool,
}

impl ParameterType {
    /// Create a parameter type with snippets enabled and no regex
    /// preference.
    pub fn new<F>(
        name: impl Into<String>,
        regexps: Vec<String>,
        target_type: TargetType,
        transform: F,
    ) -> Self
    where
        F: Fn(&str) -> Result<Value, StepError> + Send + Sync + 'static,
    {
        Self::with_transform(name, regexps, target_type, Arc::new(transform))
    }

    /// Create a parameter type around an already shared transform.
    pub fn with_transform(
        name: impl Into<String>,
        regexps: Vec<String>,
        target_type: TargetType,
        transform: Transform,
    ) -> Self {
        Self {
            name: name.into(),
            regexps,
            target_type,
            transform,
            use_for_snippets: true,
            prefer_for_regexp_match: false,
            strong_type_hint: false,
        }
    }

    /// Whether snippet generation may suggest this type.
    #[must_use]
    pub const fn use_for_snippets(mut self, enabled: bool) -> Self {
        self.use_for_snippets = enabled;
        self
    }

    /// Whether this type wins when several types share a regex.
    #[must_use]
    pub const fn prefer_for_regexp_match(mut self, enabled: bool) -> Self {
        self.prefer_for_regexp_match = enabled;
        self
    }

    /// Whether a regex match is strong evidence for this type.
    #[must_use]
    pub const fn strong_type_hint(mut self, enabled: bool) -> Self {
        self.strong_type_hint = enabled;
        self
    }

    /// Name referenced by `{name}` placeholders; empty for the anonymous
    /// type.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered regex alternatives.
    #[must_use]
    pub fn regexps(&self) -> &[String] {
        &self.regexps
    }

    /// Declared conversion target.
    #[must_use]
    pub const fn target_type(&self) -> &TargetType {
        &self.target_type
    }

    /// Shared handle to the transform.
    #[must_use]
    pub fn transformer(&self) -> Transform {
        Arc::clone(&self.transform)
    }

    /// Convert matched text.
    ///
    /// # Errors
    /// Returns whatever the transform reports.
    pub fn transform(&self, text: &str) -> Result<Value, StepError> {
        (self.transform)(text)
    }

    /// See [`use_for_snippets`](Self::use_for_snippets).
    #[must_use]
    pub const fn is_used_for_snippets(&self) -> bool {
        self.use_for_snippets
    }

    /// See [`prefer_for_regexp_match`](Self::prefer_for_regexp_match).
    #[must_use]
    pub const fn is_preferential(&self) -> bool {
        self.prefer_for_regexp_match
    }

    /// See [`strong_type_hint`](Self::strong_type_hint).
    #[must_use]
    pub const fn has_strong_type_hint(&self) -> bool {
        self.strong_type_hint
    }
}

impl fmt::Debug for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterType")
            .field("name", &self.name)
            .field("regexps", &self.regexps)
            .field("target_type", &self.target_type)
            .field("use_for_snippets", &self.use_for_snippets)
            .field("prefer_for_regexp_match", &self.prefer_for_regexp_match)
            .field("strong_type_hint", &self.strong_type_hint)
            .finish_non_exhaustive()
    }
}

const INTEGER_REGEXPS: [&str; 2] = [r"-?\d+", r"\d+"];
const FLOAT_REGEXP: &str = r"[-+]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][-+]?\d+)?";
const WORD_REGEXP: &str = r"[^\s]+";
const STRING_REGEXPS: [&str; 2] = [
    r#""([^"\\]*(\\.[^"\\]*)*)""#,
    r"'([^'\\]*(\\.[^'\\]*)*)'",
];
const ANONYMOUS_REGEXP: &str = ".*";

fn parse_integer(text: &str) -> Result<Value, StepError> {
    Ok(Value::Integer(text.parse()?))
}

fn parse_float(text: &str) -> Result<Value, StepError> {
    Ok(Value::Float(text.parse()?))
}

/// Strip the surrounding quotes and resolve `\"` / `\'` escapes.
fn unquote(text: &str) -> Result<Value, StepError> {
    let mut chars = text.chars();
    let quote = chars.next();
    let inner = chars.as_str();
    let inner = match quote {
        Some(q @ ('"' | '\'')) => inner.strip_suffix(q).unwrap_or(inner),
        _ => text,
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        match (ch, chars.clone().next()) {
            ('\\', Some(next @ ('"' | '\''))) => {
                out.push(next);
                chars.next();
            }
            _ => out.push(ch),
        }
    }
    Ok(Value::Text(out))
}

fn owned(regexps: &[&str]) -> Vec<String> {
    regexps.iter().map(ToString::to_string).collect()
}

/// Parameter types every registry starts with.
pub(crate) fn built_in_parameter_types() -> Vec<ParameterType> {
    vec![
        ParameterType::new("int", owned(&INTEGER_REGEXPS), TargetType::Integer, parse_integer)
            .prefer_for_regexp_match(true),
        ParameterType::new("long", owned(&INTEGER_REGEXPS), TargetType::Integer, parse_integer)
            .use_for_snippets(false),
        ParameterType::new("float", owned(&[FLOAT_REGEXP]), TargetType::Float, parse_float)
            .prefer_for_regexp_match(true),
        ParameterType::new("double", owned(&[FLOAT_REGEXP]), TargetType::Float, parse_float)
            .use_for_snippets(false),
        ParameterType::new("word", owned(&[WORD_REGEXP]), TargetType::Text, |text| {
            Ok(Value::Text(text.to_string()))
        })
        .use_for_snippets(false),
        ParameterType::new("string", owned(&STRING_REGEXPS), TargetType::Text, unquote)
            .prefer_for_regexp_match(true),
        ParameterType::new("", owned(&[ANONYMOUS_REGEXP]), TargetType::Text, |text| {
            Ok(Value::Text(text.to_string()))
        })
        .use_for_snippets(false),
    ]
}
