//! Gherkin steps, hooks and parameter types declared as plain data.
//!
//! Glue is a list of [`GlueDefinition`]s built with [`step`], the hook
//! builders and [`parameter_type`]. [`run`] hands the list to the cukeglue
//! host, which compiles the features, matches each step against the glue and
//! reports the outcome. A [`GlueBackend`] can also be driven directly through
//! [`cukeglue_host::Runtime`].
//!
//! Every step and hook function takes the current world value and returns its
//! replacement. The world starts absent, is replaced only when a function
//! succeeds and is shared by every scenario of a run.
//!
//! # Examples
//! ```no_run
//! use cukeglue::{GlueDefinition, StepKeyword, run, step};
//!
//! let glue: Vec<GlueDefinition<Vec<String>>> = vec![
//!     step(StepKeyword::Given, "I order {string}", |world: Option<Vec<String>>, args| {
//!         let mut orders = world.unwrap_or_default();
//!         orders.push(args.text(0)?.to_string());
//!         Ok(Some(orders))
//!     })
//!     .into(),
//!     step(StepKeyword::Then, "I have {int} order(s)", |world: Option<Vec<String>>, args| {
//!         let count = world.as_ref().map_or(0, Vec::len);
//!         if i64::try_from(count)? != args.integer(0)? {
//!             return Err(format!("expected {} orders, found {count}", args.integer(0)?).into());
//!         }
//!         Ok(world)
//!     })
//!     .into(),
//! ];
//! std::process::exit(run("features", glue, None));
//! ```

mod args;
mod backend;
mod error;
mod glue;
mod resolver;
mod run;
mod snippet;
mod units;
mod world;

pub use args::{ArgumentError, Arguments};
pub use backend::GlueBackend;
pub use cukeglue_host::{DataTable, ScenarioContext, StepError, StepKeyword, TargetType, Value};
pub use error::GlueError;
pub use glue::{
    DEFAULT_HOOK_ORDER, GlueDefinition, GlueKind, HookFn, HookGlue, HookPhase, ParameterTypeGlue,
    ParameterTypeSpec, RunHookFn, ScenarioHookFn, SourceLocation, StepArgumentFlags, StepFn,
    StepGlue, after, after_all, after_step, before, before_all, before_step, hook, parameter_type,
    step,
};
pub use resolver::{Converter, Dialect, ResolvedParameter, resolve};
pub use run::{DEFAULT_HOST_ARGS, EXIT_CONFIG, EXIT_FAILURE, EXIT_SUCCESS, run};
pub use snippet::RustSnippet;
pub use world::World;
