//! Step-pattern utilities shared by the cukeglue host engine and adapter.
//!
//! The crate owns everything that depends on the textual shape of a step
//! pattern: choosing between the expression-text and raw-regex dialects,
//! lexing `{name}` placeholders, assembling anchored regular expressions, and
//! walking a compiled regex's capture-group tree. Nothing here knows about
//! parameter types; callers supply the regex alternatives for placeholders.

mod capture;
mod dialect;
mod errors;
mod expression;
mod introspect;
mod keyword;

pub use capture::extract_argument_values;
pub use dialect::PatternDialect;
pub use errors::{IntrospectionError, PatternError, PlaceholderErrorInfo};
pub use expression::{Placeholder, build_regex_from_expression, expression_placeholders};
pub use introspect::{CaptureGroup, CaptureGroupIntrospector, RegexSyntaxIntrospector};
pub use keyword::{StepKeyword, StepKeywordParseError, UnsupportedStepType};
