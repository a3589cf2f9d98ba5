//! Glue described as plain data.
//!
//! A [`GlueDefinition`] is a step, a hook or a parameter type. Definitions
//! carry their functions as shared closures and record where they were
//! written; nothing is compiled or registered until a
//! [`GlueBackend`](crate::GlueBackend) loads them.
//!
//! # Examples
//! ```
//! use cukeglue::{GlueDefinition, StepKeyword, before, step};
//!
//! let glue: Vec<GlueDefinition<u32>> = vec![
//!     before(|_, _| Ok(Some(0))).into(),
//!     step(StepKeyword::Given, "I have {int} cukes", |world, args| {
//!         let count = u32::try_from(args.integer(0)?)?;
//!         Ok(Some(world.unwrap_or_default() + count))
//!     })
//!     .into(),
//! ];
//! assert_eq!(glue.len(), 2);
//! ```

use std::fmt;
use std::panic::Location;
use std::str::FromStr;
use std::sync::Arc;

use cukeglue_host::{ParameterType, ScenarioContext, StackFrame, StepError, TargetType, Transform, Value};
use cukeglue_patterns::StepKeyword;

use crate::args::Arguments;
use crate::error::GlueError;

/// Order given to hooks that do not ask for one.
pub const DEFAULT_HOOK_ORDER: i32 = 10_000;

/// Step function: the current world and the converted arguments in, the
/// replacement world out.
pub type StepFn<W> = Arc<dyn Fn(Option<W>, &Arguments) -> Result<Option<W>, StepError> + Send + Sync>;

/// Function of a before-all or after-all hook.
pub type RunHookFn<W> = Arc<dyn Fn(Option<W>) -> Result<Option<W>, StepError> + Send + Sync>;

/// Function of a scenario or step hook.
pub type ScenarioHookFn<W> =
    Arc<dyn Fn(Option<W>, &ScenarioContext) -> Result<Option<W>, StepError> + Send + Sync>;

/// Where a piece of glue was written.
///
/// Compared against runtime frames by exact file and line equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    file: String,
    line: u32,
}

impl SourceLocation {
    /// A location at `file:line`.
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// The location of the caller, following `#[track_caller]` frames.
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line())
    }

    /// Source file.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// One-based line.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Whether `frame` points exactly here.
    #[must_use]
    pub fn matches(&self, frame: &StackFrame) -> bool {
        frame.line == self.line && frame.file == self.file
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Extra arguments a step function takes after its captures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepArgumentFlags {
    /// The step's data table is passed after the captures.
    pub consumes_table: bool,
    /// The table is transposed before it is passed.
    pub transpose_table: bool,
    /// The step's doc string is passed last.
    pub consumes_doc_string: bool,
}

/// A step: a pattern and the function run when gherkin text matches it.
pub struct StepGlue<W> {
    keyword: StepKeyword,
    pattern: String,
    function: StepFn<W>,
    location: SourceLocation,
    flags: StepArgumentFlags,
}

impl<W> Clone for StepGlue<W> {
    fn clone(&self) -> Self {
        Self {
            keyword: self.keyword,
            pattern: self.pattern.clone(),
            function: Arc::clone(&self.function),
            location: self.location.clone(),
            flags: self.flags,
        }
    }
}

impl<W> fmt::Debug for StepGlue<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepGlue")
            .field("keyword", &self.keyword)
            .field("pattern", &self.pattern)
            .field("location", &self.location)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

impl<W> StepGlue<W> {
    /// Pass the step's data table after the captures.
    #[must_use]
    pub const fn consumes_table(mut self) -> Self {
        self.flags.consumes_table = true;
        self
    }

    /// Pass the step's data table, transposed, after the captures.
    #[must_use]
    pub const fn consumes_transposed_table(mut self) -> Self {
        self.flags.consumes_table = true;
        self.flags.transpose_table = true;
        self
    }

    /// Pass the step's doc string last.
    #[must_use]
    pub const fn consumes_doc_string(mut self) -> Self {
        self.flags.consumes_doc_string = true;
        self
    }

    /// Override the recorded source location.
    #[must_use]
    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    /// Keyword the step was written with. Matching ignores it.
    #[must_use]
    pub const fn keyword(&self) -> StepKeyword {
        self.keyword
    }

    /// Pattern as written.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Where the step was defined.
    #[must_use]
    pub const fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// Table and doc string flags.
    #[must_use]
    pub const fn flags(&self) -> StepArgumentFlags {
        self.flags
    }

    pub(crate) fn function(&self) -> StepFn<W> {
        Arc::clone(&self.function)
    }
}

/// Lifecycle point a hook runs at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPhase {
    /// Once, before the first scenario.
    BeforeAll,
    /// Once, after the last scenario.
    AfterAll,
    /// Before each scenario.
    Before,
    /// After each scenario.
    After,
    /// Before each step.
    BeforeStep,
    /// After each step.
    AfterStep,
}

impl HookPhase {
    /// Kebab-case tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BeforeAll => "before-all",
            Self::AfterAll => "after-all",
            Self::Before => "before",
            Self::After => "after",
            Self::BeforeStep => "before-step",
            Self::AfterStep => "after-step",
        }
    }

    /// Whether the phase runs once per run rather than per scenario.
    #[must_use]
    pub const fn is_run_scoped(self) -> bool {
        matches!(self, Self::BeforeAll | Self::AfterAll)
    }
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookPhase {
    type Err = GlueError;

    /// Accepts kebab, snake and camel case, ignoring ASCII case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let folded: String = value
            .chars()
            .filter(|ch| !matches!(ch, '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        match folded.as_str() {
            "beforeall" => Ok(Self::BeforeAll),
            "afterall" => Ok(Self::AfterAll),
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            "beforestep" => Ok(Self::BeforeStep),
            "afterstep" => Ok(Self::AfterStep),
            _ => Err(GlueError::UnknownPhase(value.to_string())),
        }
    }
}

/// A hook function, shaped by the phase it runs in.
pub enum HookFn<W> {
    /// Run-scoped: sees only the world.
    Run(RunHookFn<W>),
    /// Scenario-scoped: sees the world and the running scenario.
    Scenario(ScenarioHookFn<W>),
}

impl<W> Clone for HookFn<W> {
    fn clone(&self) -> Self {
        match self {
            Self::Run(f) => Self::Run(Arc::clone(f)),
            Self::Scenario(f) => Self::Scenario(Arc::clone(f)),
        }
    }
}

impl<W> HookFn<W> {
    /// Wrap a run-scoped function.
    pub fn run<F>(f: F) -> Self
    where
        F: Fn(Option<W>) -> Result<Option<W>, StepError> + Send + Sync + 'static,
    {
        Self::Run(Arc::new(f))
    }

    /// Wrap a scenario-scoped function.
    pub fn scenario<F>(f: F) -> Self
    where
        F: Fn(Option<W>, &ScenarioContext) -> Result<Option<W>, StepError> + Send + Sync + 'static,
    {
        Self::Scenario(Arc::new(f))
    }

    const fn shape(&self) -> &'static str {
        match self {
            Self::Run(_) => "run",
            Self::Scenario(_) => "scenario",
        }
    }
}

/// A hook: a function run at one lifecycle phase.
pub struct HookGlue<W> {
    phase: HookPhase,
    order: i32,
    function: HookFn<W>,
    location: SourceLocation,
}

impl<W> Clone for HookGlue<W> {
    fn clone(&self) -> Self {
        Self {
            phase: self.phase,
            order: self.order,
            function: self.function.clone(),
            location: self.location.clone(),
        }
    }
}

impl<W> fmt::Debug for HookGlue<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookGlue")
            .field("phase", &self.phase)
            .field("order", &self.order)
            .field("function", &self.function.shape())
            .field("location", &self.location)
            .finish()
    }
}

impl<W> HookGlue<W> {
    /// Set the relative order. Lower runs first before scenarios and steps,
    /// last after them.
    #[must_use]
    pub const fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Override the recorded source location.
    #[must_use]
    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    /// Lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> HookPhase {
        self.phase
    }

    /// Relative order.
    #[must_use]
    pub const fn order(&self) -> i32 {
        self.order
    }

    /// Where the hook was defined.
    #[must_use]
    pub const fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub(crate) const fn function(&self) -> &HookFn<W> {
        &self.function
    }
}

/// Fields of a custom parameter type.
#[derive(Clone)]
pub struct ParameterTypeSpec {
    /// Name referenced as `{name}` in step patterns.
    pub name: String,
    /// Regex alternatives, tried in order.
    pub regex_alternatives: Vec<String>,
    /// Declared type of converted values.
    pub target_type: TargetType,
    /// Converts matched text.
    pub transform: Transform,
    /// Whether snippets may suggest this type.
    pub use_for_snippets: bool,
    /// Whether the type wins when several share a capture-group regex.
    pub prefer_for_regex: bool,
    /// Whether a regex match is strong evidence for this type.
    pub strong_type_hint: bool,
}

impl ParameterTypeSpec {
    /// A spec with snippets enabled and no regex preference.
    pub fn new<F>(
        name: impl Into<String>,
        regex_alternatives: Vec<String>,
        target_type: TargetType,
        transform: F,
    ) -> Self
    where
        F: Fn(&str) -> Result<Value, StepError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            regex_alternatives,
            target_type,
            transform: Arc::new(transform),
            use_for_snippets: true,
            prefer_for_regex: false,
            strong_type_hint: false,
        }
    }
}

impl fmt::Debug for ParameterTypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterTypeSpec")
            .field("name", &self.name)
            .field("regex_alternatives", &self.regex_alternatives)
            .field("target_type", &self.target_type)
            .field("use_for_snippets", &self.use_for_snippets)
            .field("prefer_for_regex", &self.prefer_for_regex)
            .field("strong_type_hint", &self.strong_type_hint)
            .finish_non_exhaustive()
    }
}

/// A custom parameter type and where it was defined.
#[derive(Debug, Clone)]
pub struct ParameterTypeGlue {
    spec: ParameterTypeSpec,
    location: SourceLocation,
}

impl ParameterTypeGlue {
    /// The declared fields.
    #[must_use]
    pub const fn spec(&self) -> &ParameterTypeSpec {
        &self.spec
    }

    /// Where the type was defined.
    #[must_use]
    pub const fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// Override the recorded source location.
    #[must_use]
    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    /// The host-side parameter type.
    #[must_use]
    pub fn to_parameter_type(&self) -> ParameterType {
        ParameterType::with_transform(
            self.spec.name.clone(),
            self.spec.regex_alternatives.clone(),
            self.spec.target_type.clone(),
            Arc::clone(&self.spec.transform),
        )
        .use_for_snippets(self.spec.use_for_snippets)
        .prefer_for_regexp_match(self.spec.prefer_for_regex)
        .strong_type_hint(self.spec.strong_type_hint)
    }
}

/// Tag naming the kind of a [`GlueDefinition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlueKind {
    /// A step.
    Step,
    /// A hook.
    Hook,
    /// A parameter type.
    ParameterType,
}

impl FromStr for GlueKind {
    type Err = GlueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().replace('_', "-").as_str() {
            "step" => Ok(Self::Step),
            "hook" => Ok(Self::Hook),
            "parameter-type" | "parametertype" => Ok(Self::ParameterType),
            _ => Err(GlueError::UnknownGlueKind(value.to_string())),
        }
    }
}

/// One piece of glue.
pub enum GlueDefinition<W> {
    /// A step.
    Step(StepGlue<W>),
    /// A hook.
    Hook(HookGlue<W>),
    /// A custom parameter type.
    ParameterType(ParameterTypeGlue),
}

impl<W> GlueDefinition<W> {
    /// Which kind of glue this is.
    #[must_use]
    pub const fn kind(&self) -> GlueKind {
        match self {
            Self::Step(_) => GlueKind::Step,
            Self::Hook(_) => GlueKind::Hook,
            Self::ParameterType(_) => GlueKind::ParameterType,
        }
    }

    /// Where the glue was defined.
    #[must_use]
    pub const fn location(&self) -> &SourceLocation {
        match self {
            Self::Step(step) => &step.location,
            Self::Hook(hook) => &hook.location,
            Self::ParameterType(parameter_type) => &parameter_type.location,
        }
    }
}

impl<W> Clone for GlueDefinition<W> {
    fn clone(&self) -> Self {
        match self {
            Self::Step(step) => Self::Step(step.clone()),
            Self::Hook(hook) => Self::Hook(hook.clone()),
            Self::ParameterType(parameter_type) => Self::ParameterType(parameter_type.clone()),
        }
    }
}

impl<W> fmt::Debug for GlueDefinition<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Step(step) => step.fmt(f),
            Self::Hook(hook) => hook.fmt(f),
            Self::ParameterType(parameter_type) => parameter_type.fmt(f),
        }
    }
}

impl<W> From<StepGlue<W>> for GlueDefinition<W> {
    fn from(step: StepGlue<W>) -> Self {
        Self::Step(step)
    }
}

impl<W> From<HookGlue<W>> for GlueDefinition<W> {
    fn from(hook: HookGlue<W>) -> Self {
        Self::Hook(hook)
    }
}

impl<W> From<ParameterTypeGlue> for GlueDefinition<W> {
    fn from(parameter_type: ParameterTypeGlue) -> Self {
        Self::ParameterType(parameter_type)
    }
}

/// Define a step.
///
/// The pattern is expression text (`I have {int} cukes`) unless it is
/// anchored with `^`/`$` or wrapped in `/.../`, in which case it is a regular
/// expression. The keyword is recorded for snippets; matching ignores it.
#[track_caller]
pub fn step<W, F>(keyword: StepKeyword, pattern: impl Into<String>, function: F) -> StepGlue<W>
where
    F: Fn(Option<W>, &Arguments) -> Result<Option<W>, StepError> + Send + Sync + 'static,
{
    StepGlue {
        keyword,
        pattern: pattern.into(),
        function: Arc::new(function),
        location: SourceLocation::caller(),
        flags: StepArgumentFlags::default(),
    }
}

/// Define a hook for `phase`.
///
/// # Errors
/// Returns [`GlueError::HookFunctionMismatch`] when a run-scoped phase gets a
/// scenario function or the reverse.
#[track_caller]
pub fn hook<W>(phase: HookPhase, function: HookFn<W>) -> Result<HookGlue<W>, GlueError> {
    let matches_phase = phase.is_run_scoped() == matches!(function, HookFn::Run(_));
    if !matches_phase {
        return Err(GlueError::HookFunctionMismatch {
            phase: phase.to_string(),
            expected: if phase.is_run_scoped() { "run" } else { "scenario" },
        });
    }
    Ok(HookGlue {
        phase,
        order: DEFAULT_HOOK_ORDER,
        function,
        location: SourceLocation::caller(),
    })
}

#[track_caller]
fn run_hook<W, F>(phase: HookPhase, function: F) -> HookGlue<W>
where
    F: Fn(Option<W>) -> Result<Option<W>, StepError> + Send + Sync + 'static,
{
    HookGlue {
        phase,
        order: DEFAULT_HOOK_ORDER,
        function: HookFn::run(function),
        location: SourceLocation::caller(),
    }
}

#[track_caller]
fn scenario_hook<W, F>(phase: HookPhase, function: F) -> HookGlue<W>
where
    F: Fn(Option<W>, &ScenarioContext) -> Result<Option<W>, StepError> + Send + Sync + 'static,
{
    HookGlue {
        phase,
        order: DEFAULT_HOOK_ORDER,
        function: HookFn::scenario(function),
        location: SourceLocation::caller(),
    }
}

/// Define a hook run once before the first scenario.
#[track_caller]
pub fn before_all<W, F>(function: F) -> HookGlue<W>
where
    F: Fn(Option<W>) -> Result<Option<W>, StepError> + Send + Sync + 'static,
{
    run_hook(HookPhase::BeforeAll, function)
}

/// Define a hook run once after the last scenario.
#[track_caller]
pub fn after_all<W, F>(function: F) -> HookGlue<W>
where
    F: Fn(Option<W>) -> Result<Option<W>, StepError> + Send + Sync + 'static,
{
    run_hook(HookPhase::AfterAll, function)
}

/// Define a hook run before each scenario.
#[track_caller]
pub fn before<W, F>(function: F) -> HookGlue<W>
where
    F: Fn(Option<W>, &ScenarioContext) -> Result<Option<W>, StepError> + Send + Sync + 'static,
{
    scenario_hook(HookPhase::Before, function)
}

/// Define a hook run after each scenario.
#[track_caller]
pub fn after<W, F>(function: F) -> HookGlue<W>
where
    F: Fn(Option<W>, &ScenarioContext) -> Result<Option<W>, StepError> + Send + Sync + 'static,
{
    scenario_hook(HookPhase::After, function)
}

/// Define a hook run before each step.
#[track_caller]
pub fn before_step<W, F>(function: F) -> HookGlue<W>
where
    F: Fn(Option<W>, &ScenarioContext) -> Result<Option<W>, StepError> + Send + Sync + 'static,
{
    scenario_hook(HookPhase::BeforeStep, function)
}

/// Define a hook run after each step.
#[track_caller]
pub fn after_step<W, F>(function: F) -> HookGlue<W>
where
    F: Fn(Option<W>, &ScenarioContext) -> Result<Option<W>, StepError> + Send + Sync + 'static,
{
    scenario_hook(HookPhase::AfterStep, function)
}

/// Define a custom parameter type.
#[must_use]
#[track_caller]
pub fn parameter_type(spec: ParameterTypeSpec) -> ParameterTypeGlue {
    ParameterTypeGlue {
        spec,
        location: SourceLocation::caller(),
    }
}
