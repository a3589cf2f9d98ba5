//! Host-facing executable units wrapping glue functions.

use cukeglue_host::{
    HookDefinition, Located, ParameterDescriptor, RawArgument, ScenarioContext, StackFrame,
    StaticHookDefinition, StepDefinition, StepError,
};

use crate::args::{ArgumentError, Arguments};
use crate::glue::{RunHookFn, ScenarioHookFn, SourceLocation, StepFn};
use crate::resolver::{Converter, ResolvedParameter};
use crate::world::World;

/// A step definition the host can match and invoke.
pub(crate) struct StepUnit<W> {
    pattern: String,
    location: SourceLocation,
    descriptors: Vec<ParameterDescriptor>,
    converters: Vec<Converter>,
    function: StepFn<W>,
}

impl<W> StepUnit<W> {
    pub(crate) fn new(
        pattern: String,
        location: SourceLocation,
        parameters: Vec<ResolvedParameter>,
        function: StepFn<W>,
    ) -> Self {
        let (descriptors, converters) = parameters
            .into_iter()
            .map(|p| (p.descriptor, p.converter))
            .unzip();
        Self {
            pattern,
            location,
            descriptors,
            converters,
            function,
        }
    }

    fn convert(&self, raw: Vec<RawArgument>) -> Result<Arguments, StepError> {
        if raw.len() != self.converters.len() {
            return Err(Box::new(ArgumentError::Count {
                expected: self.converters.len(),
                found: raw.len(),
            }));
        }
        self.converters
            .iter()
            .zip(raw)
            .enumerate()
            .map(|(index, (converter, argument))| converter.convert(index, argument))
            .collect::<Result<Vec<_>, _>>()
            .map(Arguments::new)
    }
}

impl<W> Located for StepUnit<W> {
    fn location_match(&self, frame: &StackFrame) -> bool {
        self.location.matches(frame)
    }

    fn location(&self) -> String {
        self.location.to_string()
    }
}

impl<W: Clone> StepDefinition<World<W>> for StepUnit<W> {
    fn execute(&self, world: &mut World<W>, arguments: Vec<RawArgument>) -> Result<(), StepError> {
        let arguments = self.convert(arguments)?;
        world.apply(|current| (self.function)(current, &arguments))
    }

    fn parameter_descriptors(&self) -> &[ParameterDescriptor] {
        &self.descriptors
    }

    fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// A before, after, before-step or after-step hook.
pub(crate) struct ScenarioHookUnit<W> {
    order: i32,
    location: SourceLocation,
    function: ScenarioHookFn<W>,
}

impl<W> ScenarioHookUnit<W> {
    pub(crate) const fn new(order: i32, location: SourceLocation, function: ScenarioHookFn<W>) -> Self {
        Self {
            order,
            location,
            function,
        }
    }
}

impl<W> Located for ScenarioHookUnit<W> {
    fn location_match(&self, frame: &StackFrame) -> bool {
        self.location.matches(frame)
    }

    fn location(&self) -> String {
        self.location.to_string()
    }
}

impl<W: Clone> HookDefinition<World<W>> for ScenarioHookUnit<W> {
    fn execute(&self, world: &mut World<W>, scenario: &ScenarioContext) -> Result<(), StepError> {
        world.apply(|current| (self.function)(current, scenario))
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn tag_expression(&self) -> &str {
        ""
    }
}

/// A before-all or after-all hook.
pub(crate) struct RunHookUnit<W> {
    order: i32,
    location: SourceLocation,
    function: RunHookFn<W>,
}

impl<W> RunHookUnit<W> {
    pub(crate) const fn new(order: i32, location: SourceLocation, function: RunHookFn<W>) -> Self {
        Self {
            order,
            location,
            function,
        }
    }
}

impl<W> Located for RunHookUnit<W> {
    fn location_match(&self, frame: &StackFrame) -> bool {
        self.location.matches(frame)
    }

    fn location(&self) -> String {
        self.location.to_string()
    }
}

impl<W: Clone> StaticHookDefinition<World<W>> for RunHookUnit<W> {
    fn execute(&self, world: &mut World<W>) -> Result<(), StepError> {
        world.apply(|current| (self.function)(current))
    }

    fn order(&self) -> i32 {
        self.order
    }
}
