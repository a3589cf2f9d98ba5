//! Registration of executable units and parameter types for one run.

use std::cmp::Reverse;

use tracing::debug;

use crate::definition::{HookDefinition, StaticHookDefinition, StepDefinition};
use crate::error::HostError;
use crate::expression::{ExpressionFactory, StepExpression};
use crate::parameter::ParameterType;
use crate::registry::{ParameterTypeRegistry, TypeRegistry};

/// Sink a backend loads its glue into.
pub trait GlueRegistrar<Wd> {
    /// Register a step. Its pattern is compiled against the parameter types
    /// registered so far.
    ///
    /// # Errors
    /// Returns the compilation error for the step's pattern.
    fn add_step_definition(&mut self, step: Box<dyn StepDefinition<Wd>>) -> Result<(), HostError>;

    /// Register a hook run once before the first scenario.
    fn add_before_all_hook(&mut self, hook: Box<dyn StaticHookDefinition<Wd>>);

    /// Register a hook run once after the last scenario.
    fn add_after_all_hook(&mut self, hook: Box<dyn StaticHookDefinition<Wd>>);

    /// Register a hook run before each scenario.
    fn add_before_hook(&mut self, hook: Box<dyn HookDefinition<Wd>>);

    /// Register a hook run after each scenario.
    fn add_after_hook(&mut self, hook: Box<dyn HookDefinition<Wd>>);

    /// Register a hook run before each step.
    fn add_before_step_hook(&mut self, hook: Box<dyn HookDefinition<Wd>>);

    /// Register a hook run after each step.
    fn add_after_step_hook(&mut self, hook: Box<dyn HookDefinition<Wd>>);

    /// Register a parameter type for the engine's own step matching.
    ///
    /// # Errors
    /// Returns the registry's rejection.
    fn add_parameter_type(&mut self, parameter_type: ParameterType) -> Result<(), HostError>;
}

/// A step definition with its engine-side compiled expression.
pub struct RegisteredStep<Wd> {
    expression: StepExpression,
    definition: Box<dyn StepDefinition<Wd>>,
}

impl<Wd> RegisteredStep<Wd> {
    /// Expression compiled against the engine's registry.
    #[must_use]
    pub const fn expression(&self) -> &StepExpression {
        &self.expression
    }

    /// The backend's unit.
    #[must_use]
    pub fn definition(&self) -> &dyn StepDefinition<Wd> {
        self.definition.as_ref()
    }
}

/// A step definition that matched some step text, with its raw values.
pub struct StepMatch<'g, Wd> {
    /// Matched definition.
    pub step: &'g RegisteredStep<Wd>,
    /// One value per top-level capture group.
    pub values: Vec<Option<String>>,
}

/// Everything a backend registered, as the runner consumes it.
pub struct Glue<Wd> {
    registry: ParameterTypeRegistry,
    steps: Vec<RegisteredStep<Wd>>,
    before_all: Vec<Box<dyn StaticHookDefinition<Wd>>>,
    after_all: Vec<Box<dyn StaticHookDefinition<Wd>>>,
    before: Vec<Box<dyn HookDefinition<Wd>>>,
    after: Vec<Box<dyn HookDefinition<Wd>>>,
    before_step: Vec<Box<dyn HookDefinition<Wd>>>,
    after_step: Vec<Box<dyn HookDefinition<Wd>>>,
}

impl<Wd> Default for Glue<Wd> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Wd> Glue<Wd> {
    /// An empty registrar with a fresh parameter-type registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: ParameterTypeRegistry::new(),
            steps: Vec::new(),
            before_all: Vec::new(),
            after_all: Vec::new(),
            before: Vec::new(),
            after: Vec::new(),
            before_step: Vec::new(),
            after_step: Vec::new(),
        }
    }

    /// The engine's parameter types.
    #[must_use]
    pub const fn registry(&self) -> &ParameterTypeRegistry {
        &self.registry
    }

    /// Registered steps in registration order.
    #[must_use]
    pub fn steps(&self) -> &[RegisteredStep<Wd>] {
        &self.steps
    }

    /// Every step whose expression matches `text`.
    #[must_use]
    pub fn matching_steps(&self, text: &str) -> Vec<StepMatch<'_, Wd>> {
        self.steps
            .iter()
            .filter_map(|step| {
                step.expression
                    .match_text(text)
                    .map(|values| StepMatch { step, values })
            })
            .collect()
    }

    /// Before-all hooks, lowest order first.
    #[must_use]
    pub fn before_all_hooks(&self) -> Vec<&dyn StaticHookDefinition<Wd>> {
        ascending(&self.before_all, |h| h.order())
    }

    /// After-all hooks, highest order first.
    #[must_use]
    pub fn after_all_hooks(&self) -> Vec<&dyn StaticHookDefinition<Wd>> {
        descending(&self.after_all, |h| h.order())
    }

    /// Before hooks, lowest order first.
    #[must_use]
    pub fn before_hooks(&self) -> Vec<&dyn HookDefinition<Wd>> {
        ascending(&self.before, |h| h.order())
    }

    /// After hooks, highest order first.
    #[must_use]
    pub fn after_hooks(&self) -> Vec<&dyn HookDefinition<Wd>> {
        descending(&self.after, |h| h.order())
    }

    /// Before-step hooks, lowest order first.
    #[must_use]
    pub fn before_step_hooks(&self) -> Vec<&dyn HookDefinition<Wd>> {
        ascending(&self.before_step, |h| h.order())
    }

    /// After-step hooks, highest order first.
    #[must_use]
    pub fn after_step_hooks(&self) -> Vec<&dyn HookDefinition<Wd>> {
        descending(&self.after_step, |h| h.order())
    }
}

fn ascending<H: ?Sized>(hooks: &[Box<H>], order: impl Fn(&H) -> i32) -> Vec<&H> {
    let mut sorted: Vec<&H> = hooks.iter().map(AsRef::as_ref).collect();
    sorted.sort_by_key(|h| order(h));
    sorted
}

fn descending<H: ?Sized>(hooks: &[Box<H>], order: impl Fn(&H) -> i32) -> Vec<&H> {
    let mut sorted: Vec<&H> = hooks.iter().map(AsRef::as_ref).collect();
    sorted.sort_by_key(|h| Reverse(order(h)));
    sorted
}

impl<Wd> GlueRegistrar<Wd> for Glue<Wd> {
    fn add_step_definition(&mut self, step: Box<dyn StepDefinition<Wd>>) -> Result<(), HostError> {
        let expression = ExpressionFactory::new(&self.registry).create(step.pattern())?;
        debug!(pattern = step.pattern(), location = %step.location(), "step registered");
        self.steps.push(RegisteredStep {
            expression,
            definition: step,
        });
        Ok(())
    }

    fn add_before_all_hook(&mut self, hook: Box<dyn StaticHookDefinition<Wd>>) {
        self.before_all.push(hook);
    }

    fn add_after_all_hook(&mut self, hook: Box<dyn StaticHookDefinition<Wd>>) {
        self.after_all.push(hook);
    }

    fn add_before_hook(&mut self, hook: Box<dyn HookDefinition<Wd>>) {
        self.before.push(hook);
    }

    fn add_after_hook(&mut self, hook: Box<dyn HookDefinition<Wd>>) {
        self.after.push(hook);
    }

    fn add_before_step_hook(&mut self, hook: Box<dyn HookDefinition<Wd>>) {
        self.before_step.push(hook);
    }

    fn add_after_step_hook(&mut self, hook: Box<dyn HookDefinition<Wd>>) {
        self.after_step.push(hook);
    }

    fn add_parameter_type(&mut self, parameter_type: ParameterType) -> Result<(), HostError> {
        self.registry.register_type(parameter_type)
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests fail loudly on unexpected errors")]
mod tests {
    use super::*;
    use crate::definition::{Located, ParameterDescriptor, RawArgument, ScenarioContext, StackFrame};
    use crate::error::StepError;
    use crate::parameter::TargetType;
    use crate::value::Value;

    struct Step(&'static str);

    impl Located for Step {
        fn location_match(&self, _: &StackFrame) -> bool {
            false
        }

        fn location(&self) -> String {
            "test.rs:1".into()
        }
    }

    impl StepDefinition<()> for Step {
        fn execute(&self, _: &mut (), _: Vec<RawArgument>) -> Result<(), StepError> {
            Ok(())
        }

        fn parameter_descriptors(&self) -> &[ParameterDescriptor] {
            &[]
        }

        fn pattern(&self) -> &str {
            self.0
        }
    }

    struct Hook(i32);

    impl Located for Hook {
        fn location_match(&self, _: &StackFrame) -> bool {
            false
        }

        fn location(&self) -> String {
            format!("hooks.rs:{}", self.0)
        }
    }

    impl HookDefinition<()> for Hook {
        fn execute(&self, _: &mut (), _: &ScenarioContext) -> Result<(), StepError> {
            Ok(())
        }

        fn order(&self) -> i32 {
            self.0
        }

        fn tag_expression(&self) -> &str {
            ""
        }
    }

    #[test]
    fn step_patterns_need_registered_types() {
        let mut glue = Glue::<()>::new();
        let result = glue.add_step_definition(Box::new(Step("I pick {colour}")));
        assert!(matches!(result, Err(HostError::UndefinedParameterType { .. })));

        glue.add_parameter_type(ParameterType::new(
            "colour",
            vec!["red|blue".into()],
            TargetType::Text,
            |text| Ok(Value::Text(text.into())),
        ))
        .expect("parameter type registers");
        glue.add_step_definition(Box::new(Step("I pick {colour}")))
            .expect("step builds");
        assert_eq!(glue.matching_steps("I pick red").len(), 1);
        assert!(glue.matching_steps("I pick green").is_empty());
    }

    #[test]
    fn before_hooks_ascend_and_after_hooks_descend() {
        let mut glue = Glue::<()>::new();
        for order in [20, 5, 10] {
            glue.add_before_hook(Box::new(Hook(order)));
            glue.add_after_hook(Box::new(Hook(order)));
        }
        let before: Vec<_> = glue.before_hooks().iter().map(|h| h.order()).collect();
        let after: Vec<_> = glue.after_hooks().iter().map(|h| h.order()).collect();
        assert_eq!(before, [5, 10, 20]);
        assert_eq!(after, [20, 10, 5]);
    }

    #[test]
    fn equal_orders_keep_registration_order() {
        let mut glue = Glue::<()>::new();
        glue.add_before_step_hook(Box::new(Hook(1)));
        glue.add_before_step_hook(Box::new(Hook(1)));
        let hooks = glue.before_step_hooks();
        assert_eq!(hooks.len(), 2);
        assert!(glue.after_step_hooks().is_empty());
    }
}
