//! Gherkin execution engine for cukeglue backends.
//!
//! A [`Backend`] registers step definitions, hooks and parameter types with a
//! [`GlueRegistrar`]. The [`Runtime`] then compiles feature files into
//! scenarios, matches each step against the registered expressions, invokes
//! the matching unit with its raw arguments and reports the outcome through
//! the configured [`reporting`] plugins.
//!
//! Step patterns come in two dialects. Expression text such as
//! `I have {int} cukes` is compiled through the [`ParameterTypeRegistry`];
//! anything anchored with `^`/`$` or wrapped in `/.../` is a raw regular
//! expression whose top-level capture groups become the arguments.

mod backend;
mod config;
mod definition;
mod error;
mod expression;
mod feature;
mod glue;
pub mod logging;
mod options;
mod panic;
mod parameter;
mod registry;
pub mod reporting;
mod result;
mod runner;
mod snippet;
mod value;

pub use backend::{Backend, Snippet};
pub use config::{HostConfig, LOG_LEVEL_ENV, LogLevel, MONOCHROME_ENV};
pub use cukeglue_patterns::{CaptureGroup, PatternDialect, StepKeyword};
pub use definition::{
    HookDefinition, Located, ParameterDescriptor, RawArgument, ScenarioContext, StackFrame,
    StaticHookDefinition, StepDefinition,
};
pub use error::{HostError, StepError};
pub use expression::{CucumberExpression, ExpressionFactory, RegularExpression, StepExpression};
pub use feature::{
    Pickle, PickleStep, StepArgument, compile_pickles, compile_pickles_with_source,
    discover_features, load_pickles, parse_feature, parse_feature_text,
};
pub use glue::{Glue, GlueRegistrar, RegisteredStep, StepMatch};
pub use options::{PluginKind, PluginSpec, RuntimeOptions};
pub use panic::{CaughtPanic, catch_panic, panic_message};
pub use parameter::{ParameterType, TargetType, Transform};
pub use registry::{ParameterTypeRegistry, TypeRegistry};
pub use result::{RunSummary, ScenarioResult, Status, StepResult};
pub use runner::Runtime;
pub use snippet::{GeneratedExpression, SnippetGenerator, function_name, generate_expression};
pub use value::{DataTable, Value};
