//! [`Backend`] implementation over a list of glue definitions.

use std::sync::Arc;

use cukeglue_host::{
    Backend, ExpressionFactory, GlueRegistrar, HostError, ParameterType, ParameterTypeRegistry,
    Snippet, TargetType, TypeRegistry, Value,
};
use tracing::debug;

use crate::error::GlueError;
use crate::glue::{GlueDefinition, HookFn, HookGlue, HookPhase, StepGlue};
use crate::resolver;
use crate::snippet::RustSnippet;
use crate::units::{RunHookUnit, ScenarioHookUnit, StepUnit};
use crate::world::World;

const SYMBOL_REGEXP: &str = r":\S+";

/// The `symbol` parameter type: `:name` tokens, converted without the colon.
fn symbol_type() -> ParameterType {
    ParameterType::new(
        "symbol",
        vec![SYMBOL_REGEXP.to_string()],
        TargetType::Symbol,
        |text| Ok(Value::Symbol(text.strip_prefix(':').unwrap_or(text).to_string())),
    )
}

/// Loads glue definitions into the host and supplies the world lifecycle.
///
/// Loading registers parameter types, then hooks, then steps, so a step may
/// use a type declared after it in the list. Each kind keeps its list order.
pub struct GlueBackend<W> {
    glue: Vec<GlueDefinition<W>>,
    registry: ParameterTypeRegistry,
    snippet: RustSnippet,
}

impl<W: Clone + 'static> GlueBackend<W> {
    /// Wrap `glue`. Nothing is compiled until the host loads it.
    #[must_use]
    pub fn new(glue: Vec<GlueDefinition<W>>) -> Self {
        Self {
            glue,
            registry: ParameterTypeRegistry::new(),
            snippet: RustSnippet,
        }
    }

    /// The glue this backend loads.
    #[must_use]
    pub fn glue(&self) -> &[GlueDefinition<W>] {
        &self.glue
    }

    fn register_type(
        &mut self,
        registrar: &mut dyn GlueRegistrar<World<W>>,
        parameter_type: ParameterType,
    ) -> Result<(), GlueError> {
        debug!(name = parameter_type.name(), "parameter type registered");
        self.registry.register_type(parameter_type.clone())?;
        registrar.add_parameter_type(parameter_type)?;
        Ok(())
    }

    fn register_step(
        &self,
        registrar: &mut dyn GlueRegistrar<World<W>>,
        step: &StepGlue<W>,
    ) -> Result<(), GlueError> {
        let expression = ExpressionFactory::new(&self.registry)
            .create(step.pattern())
            .map_err(|err| match err {
                HostError::UndefinedParameterType { name, pattern } => {
                    GlueError::UndefinedParameterType {
                        name,
                        pattern,
                        location: step.location().clone(),
                    }
                }
                other => GlueError::Host(other),
            })?;
        let parameters =
            resolver::resolve(&expression, &self.registry, step.flags(), step.location())?;
        debug!(
            pattern = step.pattern(),
            arguments = parameters.len(),
            location = %step.location(),
            "step resolved"
        );
        registrar.add_step_definition(Box::new(StepUnit::new(
            step.pattern().to_string(),
            step.location().clone(),
            parameters,
            step.function(),
        )))?;
        Ok(())
    }

    fn register_hook(
        registrar: &mut dyn GlueRegistrar<World<W>>,
        hook: &HookGlue<W>,
    ) -> Result<(), GlueError> {
        let order = hook.order();
        let location = hook.location().clone();
        match (hook.phase(), hook.function()) {
            (HookPhase::BeforeAll, HookFn::Run(f)) => {
                let unit = RunHookUnit::new(order, location, Arc::clone(f));
                registrar.add_before_all_hook(Box::new(unit));
            }
            (HookPhase::AfterAll, HookFn::Run(f)) => {
                let unit = RunHookUnit::new(order, location, Arc::clone(f));
                registrar.add_after_all_hook(Box::new(unit));
            }
            (phase, HookFn::Scenario(f)) if !phase.is_run_scoped() => {
                let unit = Box::new(ScenarioHookUnit::new(order, location, Arc::clone(f)));
                match phase {
                    HookPhase::Before => registrar.add_before_hook(unit),
                    HookPhase::After => registrar.add_after_hook(unit),
                    HookPhase::BeforeStep => registrar.add_before_step_hook(unit),
                    _ => registrar.add_after_step_hook(unit),
                }
            }
            (phase, _) => {
                return Err(GlueError::HookFunctionMismatch {
                    phase: phase.to_string(),
                    expected: if phase.is_run_scoped() { "run" } else { "scenario" },
                });
            }
        }
        debug!(phase = %hook.phase(), order, location = %hook.location(), "hook registered");
        Ok(())
    }
}

impl<W: Clone + 'static> Backend for GlueBackend<W> {
    type World = World<W>;
    type Error = GlueError;

    fn load_glue(
        &mut self,
        registrar: &mut dyn GlueRegistrar<World<W>>,
        glue_paths: &[String],
    ) -> Result<(), GlueError> {
        if !glue_paths.is_empty() {
            debug!(?glue_paths, "glue paths ignored; glue is supplied in memory");
        }
        self.registry = ParameterTypeRegistry::new();
        self.register_type(registrar, symbol_type())?;

        let glue = std::mem::take(&mut self.glue);
        let loaded = self.load_definitions(registrar, &glue);
        self.glue = glue;
        loaded
    }

    fn build_world(&mut self, _world: &mut World<W>) {}

    fn dispose_world(&mut self, _world: &mut World<W>) {}

    fn snippet(&self) -> &dyn Snippet {
        &self.snippet
    }
}

impl<W: Clone + 'static> GlueBackend<W> {
    fn load_definitions(
        &mut self,
        registrar: &mut dyn GlueRegistrar<World<W>>,
        glue: &[GlueDefinition<W>],
    ) -> Result<(), GlueError> {
        for definition in glue {
            if let GlueDefinition::ParameterType(parameter_type) = definition {
                self.register_type(registrar, parameter_type.to_parameter_type())?;
            }
        }
        for definition in glue {
            if let GlueDefinition::Hook(hook) = definition {
                Self::register_hook(registrar, hook)?;
            }
        }
        for definition in glue {
            if let GlueDefinition::Step(step) = definition {
                self.register_step(registrar, step)?;
            }
        }
        debug!(definitions = glue.len(), "glue loaded");
        Ok(())
    }
}
