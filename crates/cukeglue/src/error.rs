//! Errors raised while building or loading glue.
//!
//! Every variant is fatal to the run: the host reports it and exits with a
//! configuration status before any scenario executes.

use cukeglue_host::HostError;
use cukeglue_patterns::IntrospectionError;
use thiserror::Error;

use crate::glue::SourceLocation;

/// Errors raised by glue construction and loading.
#[derive(Debug, Error)]
pub enum GlueError {
    /// A hook phase tag is not one of the six lifecycle phases.
    #[error("unknown hook phase `{0}`")]
    UnknownPhase(String),

    /// A glue kind tag is not `step`, `hook` or `parameter-type`.
    #[error("unknown glue kind `{0}`")]
    UnknownGlueKind(String),

    /// A run-scoped phase was given a scenario function, or the reverse.
    #[error("{phase} hooks take {expected} functions")]
    HookFunctionMismatch {
        /// Phase the hook was declared for.
        phase: String,
        /// Function shape the phase requires.
        expected: &'static str,
    },

    /// A step pattern references a parameter type nobody registered.
    #[error("undefined parameter type `{{{name}}}` in step `{pattern}` defined at {location}")]
    UndefinedParameterType {
        /// Placeholder name.
        name: String,
        /// Step pattern containing the placeholder.
        pattern: String,
        /// Where the step was defined.
        location: SourceLocation,
    },

    /// The host rejected a registration.
    #[error(transparent)]
    Host(#[from] HostError),

    /// A regular expression's capture groups could not be enumerated.
    #[error(transparent)]
    Introspection(#[from] IntrospectionError),
}
