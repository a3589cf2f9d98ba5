//! Contracts for the executable units a backend registers.
//!
//! The engine is generic over the world type `Wd` a backend threads through
//! every call. Units never hold the world themselves; each `execute` receives
//! it by mutable reference.

use std::fmt;

use crate::error::StepError;
use crate::parameter::TargetType;
use crate::result::Status;
use crate::value::DataTable;

/// Source position of a call frame, compared against glue locations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StackFrame {
    /// Source file as reported by the compiler.
    pub file: String,
    /// One-based line number.
    pub line: u32,
}

impl StackFrame {
    /// Build a frame from a file and line.
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A unit that can be traced back to where it was defined.
pub trait Located {
    /// Whether `frame` points at this unit's definition.
    fn location_match(&self, frame: &StackFrame) -> bool;

    /// `file:line` of the definition.
    fn location(&self) -> String;
}

/// Declared type of one step argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    target_type: TargetType,
    transposed: bool,
}

impl ParameterDescriptor {
    /// Describe an argument converting to `target_type`.
    #[must_use]
    pub const fn new(target_type: TargetType, transposed: bool) -> Self {
        Self {
            target_type,
            transposed,
        }
    }

    /// Conversion target.
    #[must_use]
    pub const fn target_type(&self) -> &TargetType {
        &self.target_type
    }

    /// Whether a table argument is transposed before conversion.
    #[must_use]
    pub const fn is_transposed(&self) -> bool {
        self.transposed
    }
}

/// Unconverted argument extracted from a matched gherkin step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawArgument {
    /// Text of one top-level capture group; `None` when the group did not
    /// participate.
    Text(Option<String>),
    /// The step's data table.
    Table(DataTable),
    /// The step's doc string.
    DocString(String),
}

/// What a scenario-scoped hook may inspect about the running scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioContext {
    name: String,
    uri: String,
    line: u32,
    tags: Vec<String>,
    status: Status,
}

impl ScenarioContext {
    /// Describe a scenario at `uri:line`.
    #[must_use]
    pub fn new(name: impl Into<String>, uri: impl Into<String>, line: u32, tags: Vec<String>) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            line,
            tags,
            status: Status::Passed,
        }
    }

    /// Scenario name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Feature file the scenario comes from.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Line of the scenario (or example row) in the feature file.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Feature, rule, scenario and example tags, each with its `@`.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Status of the scenario so far.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Whether any step or hook has failed so far.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.status != Status::Passed && self.status != Status::Skipped
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = status;
    }
}

/// A step the engine can match and invoke.
pub trait StepDefinition<Wd>: Located {
    /// Run the step with the extracted arguments.
    ///
    /// # Errors
    /// Returns the step function's failure unmodified.
    fn execute(&self, world: &mut Wd, arguments: Vec<RawArgument>) -> Result<(), StepError>;

    /// One descriptor per argument `execute` expects, in order.
    fn parameter_descriptors(&self) -> &[ParameterDescriptor];

    /// The pattern exactly as written in the glue.
    fn pattern(&self) -> &str;
}

/// A hook run around scenarios or steps.
pub trait HookDefinition<Wd>: Located {
    /// Run the hook.
    ///
    /// # Errors
    /// Returns the hook function's failure unmodified.
    fn execute(&self, world: &mut Wd, scenario: &ScenarioContext) -> Result<(), StepError>;

    /// Relative order; lower runs first for before-hooks and last for
    /// after-hooks.
    fn order(&self) -> i32;

    /// Tag expression limiting the scenarios the hook applies to. Empty
    /// matches every scenario.
    fn tag_expression(&self) -> &str;
}

/// A hook run once before or after all scenarios.
pub trait StaticHookDefinition<Wd>: Located {
    /// Run the hook.
    ///
    /// # Errors
    /// Returns the hook function's failure unmodified.
    fn execute(&self, world: &mut Wd) -> Result<(), StepError>;

    /// Relative order, as for [`HookDefinition::order`].
    fn order(&self) -> i32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_displays_as_file_and_line() {
        assert_eq!(StackFrame::new("steps.rs", 12).to_string(), "steps.rs:12");
    }

    #[test]
    fn context_starts_passed() {
        let context = ScenarioContext::new("eat cukes", "cukes.feature", 3, vec!["@wip".into()]);
        assert_eq!(context.status(), Status::Passed);
        assert!(!context.is_failed());
        assert_eq!(context.tags(), ["@wip"]);
    }

    #[test]
    fn context_reports_failure() {
        let mut context = ScenarioContext::new("eat cukes", "cukes.feature", 3, Vec::new());
        context.set_status(Status::Undefined);
        assert!(context.is_failed());
    }
}
