//! Drives a backend's glue over compiled scenarios.
//!
//! Scenarios run sequentially on the calling thread. The world is borrowed
//! mutably for the whole run and handed to each unit in turn, so every unit
//! observes the world the previous one left behind.

use std::path::PathBuf;

use tracing::{debug, info, info_span, trace, warn};

use crate::backend::Backend;
use crate::config::HostConfig;
use crate::definition::{Located, RawArgument, ScenarioContext, StepDefinition};
use crate::error::{HostError, StepError};
use crate::feature::{Pickle, PickleStep, StepArgument, load_pickles};
use crate::glue::{Glue, StepMatch};
use crate::options::RuntimeOptions;
use crate::panic::catch_panic;
use crate::reporting::{Plugin, create_plugins};
use crate::result::{RunSummary, ScenarioResult, Status, StepResult};
use crate::snippet::SnippetGenerator;

/// One configured run: options plus environment configuration.
#[derive(Debug, Clone)]
pub struct Runtime {
    options: RuntimeOptions,
    config: HostConfig,
}

impl Runtime {
    /// Build a runtime from already parsed options and configuration.
    ///
    /// `--monochrome` and `--log-level` take precedence over `config`.
    #[must_use]
    pub fn new(options: RuntimeOptions, config: HostConfig) -> Self {
        let config = config.apply_overrides(options.log_level, options.monochrome);
        Self { options, config }
    }

    /// Parse host arguments and read the environment.
    ///
    /// # Errors
    /// Returns [`HostError::InvalidOptions`] or [`HostError::InvalidConfig`].
    pub fn from_args<I, T>(args: I) -> Result<Self, HostError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let options = RuntimeOptions::parse_args(args)?;
        Ok(Self::new(options, HostConfig::from_env()?))
    }

    /// Parsed host arguments.
    #[must_use]
    pub const fn options(&self) -> &RuntimeOptions {
        &self.options
    }

    /// Effective configuration.
    #[must_use]
    pub const fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Load glue and features, run every selected scenario and report.
    ///
    /// # Errors
    /// Returns an error when glue, features or plugins cannot be loaded, or
    /// when a reporter fails to write. Scenario failures are reported in the
    /// returned summary.
    pub fn run<B: Backend>(
        &self,
        backend: &mut B,
        world: &mut B::World,
    ) -> Result<RunSummary, HostError> {
        let _span = info_span!("run").entered();
        let mut glue: Glue<B::World> = Glue::new();
        backend
            .load_glue(&mut glue, &self.options.glue)
            .map_err(|err| HostError::Backend(Box::new(err)))?;
        debug!(steps = glue.steps().len(), "glue loaded");

        let pickles = self.select(load_pickles(&self.features())?)?;
        info!(scenarios = pickles.len(), "features loaded");

        let mut plugins =
            create_plugins(&self.options.effective_plugins(), self.config.monochrome)?;
        let mut execution = Execution {
            backend,
            glue: &glue,
            plugins: &mut plugins,
            dry_run: self.options.dry_run,
        };
        execution.run(world, &pickles)
    }

    fn features(&self) -> Vec<PathBuf> {
        if self.options.features.is_empty() {
            vec![PathBuf::from("features")]
        } else {
            self.options.features.clone()
        }
    }

    fn select(&self, pickles: Vec<Pickle>) -> Result<Vec<Pickle>, HostError> {
        let filters = self.options.name_filters()?;
        if filters.is_empty() {
            return Ok(pickles);
        }
        Ok(pickles
            .into_iter()
            .filter(|pickle| filters.iter().any(|filter| filter.is_match(&pickle.name)))
            .collect())
    }
}

struct Failure {
    message: String,
    failure_location: Option<String>,
}

/// Run a unit, catching its error or panic.
fn guarded<L: Located + ?Sized>(
    unit: &L,
    call: impl FnOnce() -> Result<(), StepError>,
) -> Result<(), Failure> {
    match catch_panic(call) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(Failure {
            message: err.to_string(),
            failure_location: None,
        }),
        Err(caught) => Err(Failure {
            message: caught.message,
            failure_location: caught
                .frame
                .filter(|frame| unit.location_match(frame))
                .map(|frame| frame.to_string()),
        }),
    }
}

fn hook_failure(keyword: &str, location: String, failure: Failure) -> StepResult {
    let mut result = StepResult::new(keyword, location.clone(), 0, Status::Failed);
    result.location = Some(location);
    result.error = Some(failure.message);
    result.failure_location = failure.failure_location;
    result
}

fn fail(result: &mut StepResult, failure: Failure) {
    result.status = Status::Failed;
    result.error = Some(failure.message);
    result.failure_location = failure.failure_location;
}

struct Execution<'a, B: Backend> {
    backend: &'a mut B,
    glue: &'a Glue<B::World>,
    plugins: &'a mut [Box<dyn Plugin>],
    dry_run: bool,
}

impl<B: Backend> Execution<'_, B> {
    fn notify(
        &mut self,
        event: impl Fn(&mut dyn Plugin) -> Result<(), HostError>,
    ) -> Result<(), HostError> {
        self.plugins
            .iter_mut()
            .try_for_each(|plugin| event(plugin.as_mut()))
    }

    fn run(&mut self, world: &mut B::World, pickles: &[Pickle]) -> Result<RunSummary, HostError> {
        let glue = self.glue;
        let mut summary = RunSummary::default();
        if !self.dry_run {
            for hook in glue.before_all_hooks() {
                if let Err(failure) = guarded(hook, || hook.execute(world)) {
                    warn!(hook = %hook.location(), "before-all hook failed");
                    summary
                        .run_hook_failures
                        .push(hook_failure("BeforeAll", hook.location(), failure));
                    break;
                }
            }
        }
        if summary.run_hook_failures.is_empty() {
            for pickle in pickles {
                let result = self.run_scenario(world, pickle)?;
                summary.scenarios.push(result);
            }
        }
        if !self.dry_run {
            for hook in glue.after_all_hooks() {
                if let Err(failure) = guarded(hook, || hook.execute(world)) {
                    warn!(hook = %hook.location(), "after-all hook failed");
                    summary
                        .run_hook_failures
                        .push(hook_failure("AfterAll", hook.location(), failure));
                }
            }
        }
        self.notify(|plugin| plugin.run_finished(&summary))?;
        Ok(summary)
    }

    fn run_scenario(
        &mut self,
        world: &mut B::World,
        pickle: &Pickle,
    ) -> Result<ScenarioResult, HostError> {
        let _span = info_span!("scenario", name = %pickle.name, uri = %pickle.uri, line = pickle.line)
            .entered();
        let glue = self.glue;
        self.notify(|plugin| plugin.scenario_started(pickle))?;
        let mut context = ScenarioContext::new(
            pickle.name.clone(),
            pickle.uri.clone(),
            pickle.line,
            pickle.tags.clone(),
        );
        let mut result = ScenarioResult {
            uri: pickle.uri.clone(),
            feature: pickle.feature.clone(),
            name: pickle.name.clone(),
            line: pickle.line,
            tags: pickle.tags.clone(),
            steps: Vec::new(),
        };

        if !self.dry_run {
            self.backend.build_world(world);
            for hook in glue.before_hooks() {
                trace!(hook = %hook.location(), tags = hook.tag_expression(), "before hook");
                if let Err(failure) = guarded(hook, || hook.execute(world, &context)) {
                    self.record(&mut result, &mut context, hook_failure("Before", hook.location(), failure))?;
                }
            }
        }

        for step in &pickle.steps {
            let step_result = self.run_step(world, step, &context);
            self.record(&mut result, &mut context, step_result)?;
        }

        if !self.dry_run {
            for hook in glue.after_hooks() {
                if let Err(failure) = guarded(hook, || hook.execute(world, &context)) {
                    self.record(&mut result, &mut context, hook_failure("After", hook.location(), failure))?;
                }
            }
            self.backend.dispose_world(world);
        }

        debug!(status = result.status().label(), "scenario finished");
        self.notify(|plugin| plugin.scenario_finished(&result))?;
        Ok(result)
    }

    fn record(
        &mut self,
        result: &mut ScenarioResult,
        context: &mut ScenarioContext,
        step: StepResult,
    ) -> Result<(), HostError> {
        context.set_status(context.status().max(step.status));
        self.notify(|plugin| plugin.step_finished(&step))?;
        result.steps.push(step);
        Ok(())
    }

    fn run_step(
        &self,
        world: &mut B::World,
        step: &PickleStep,
        context: &ScenarioContext,
    ) -> StepResult {
        let mut result = StepResult::new(step.keyword.clone(), step.text.clone(), step.line, Status::Passed);
        let mut matches = self.glue.matching_steps(&step.text);
        if matches.len() > 1 {
            let locations: Vec<String> = matches
                .iter()
                .map(|m| format!("{} ({})", m.step.definition().pattern(), m.step.definition().location()))
                .collect();
            result.status = Status::Ambiguous;
            result.error = Some(format!(
                "\"{}\" matches more than one step definition:\n{}",
                step.text,
                locations.join("\n")
            ));
            return result;
        }
        let Some(matched) = matches.pop() else {
            result.status = Status::Undefined;
            result.snippet = Some(
                SnippetGenerator::new(self.glue.registry(), self.backend.snippet()).generate(
                    step.resolved_keyword,
                    &step.text,
                    step.argument.as_ref(),
                ),
            );
            return result;
        };
        let registered = matched.step;
        let definition = registered.definition();
        result.location = Some(definition.location());
        if self.dry_run || context.is_failed() {
            result.status = Status::Skipped;
            return result;
        }

        for hook in self.glue.before_step_hooks() {
            if let Err(failure) = guarded(hook, || hook.execute(world, context)) {
                fail(&mut result, failure);
                return result;
            }
        }
        if let Err(failure) = invoke(definition, world, matched, step) {
            fail(&mut result, failure);
        }
        for hook in self.glue.after_step_hooks() {
            if let Err(failure) = guarded(hook, || hook.execute(world, context)) {
                if result.status == Status::Passed {
                    fail(&mut result, failure);
                }
            }
        }
        trace!(text = %step.text, status = result.status.label(), "step finished");
        result
    }
}

fn invoke<Wd>(
    definition: &dyn StepDefinition<Wd>,
    world: &mut Wd,
    matched: StepMatch<'_, Wd>,
    step: &PickleStep,
) -> Result<(), Failure> {
    let mut arguments: Vec<RawArgument> =
        matched.values.into_iter().map(RawArgument::Text).collect();
    match &step.argument {
        Some(StepArgument::Table(table)) => arguments.push(RawArgument::Table(table.clone())),
        Some(StepArgument::DocString(doc)) => arguments.push(RawArgument::DocString(doc.clone())),
        None => {}
    }
    let expected = definition.parameter_descriptors().len();
    if arguments.len() != expected {
        return Err(Failure {
            message: HostError::ArityMismatch {
                pattern: definition.pattern().to_string(),
                location: definition.location(),
                expected,
                found: arguments.len(),
            }
            .to_string(),
            failure_location: None,
        });
    }
    guarded(definition, || definition.execute(world, arguments))
}
