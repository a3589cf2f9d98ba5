//! One-call entry point: features plus glue in, exit status out.

use std::ffi::OsString;
use std::path::Path;

use cukeglue_host::logging::init_logging;
use cukeglue_host::{HostConfig, Runtime};
use tracing::{error, info};

use crate::backend::GlueBackend;
use crate::glue::GlueDefinition;
use crate::world::World;

/// Host arguments used when the caller passes none.
pub const DEFAULT_HOST_ARGS: [&str; 3] = ["--plugin", "pretty", "--monochrome"];

/// Every selected scenario passed.
pub const EXIT_SUCCESS: i32 = 0;
/// At least one scenario or run hook failed.
pub const EXIT_FAILURE: i32 = 1;
/// Options, configuration, glue or features could not be loaded.
pub const EXIT_CONFIG: i32 = 2;

fn host_arguments(features_path: &Path, host_args: Option<&[&str]>) -> Vec<OsString> {
    host_args
        .unwrap_or(DEFAULT_HOST_ARGS.as_slice())
        .iter()
        .map(OsString::from)
        .chain(std::iter::once(features_path.as_os_str().to_owned()))
        .collect()
}

/// Run the features under `features_path` against `glue`.
///
/// `host_args` are host options such as `--plugin json:out.json` or
/// `--name smoke`; `None` selects [`DEFAULT_HOST_ARGS`]. The world starts
/// absent and is shared by every scenario of the run.
///
/// Returns [`EXIT_SUCCESS`], [`EXIT_FAILURE`] or [`EXIT_CONFIG`].
///
/// # Examples
/// ```no_run
/// use cukeglue::{GlueDefinition, StepKeyword, run, step};
///
/// let glue: Vec<GlueDefinition<u64>> = vec![
///     step(StepKeyword::Given, "I have {int} cukes", |_, args| {
///         Ok(Some(u64::try_from(args.integer(0)?)?))
///     })
///     .into(),
/// ];
/// std::process::exit(run("features", glue, None));
/// ```
pub fn run<W: Clone + 'static>(
    features_path: impl AsRef<Path>,
    glue: Vec<GlueDefinition<W>>,
    host_args: Option<&[&str]>,
) -> i32 {
    let runtime = match Runtime::from_args(host_arguments(features_path.as_ref(), host_args)) {
        Ok(runtime) => runtime,
        Err(e) => {
            init_logging(&HostConfig::default());
            error!(error = %e, "invalid configuration");
            return EXIT_CONFIG;
        }
    };
    init_logging(runtime.config());

    let mut backend = GlueBackend::new(glue);
    let mut world = World::new();
    match runtime.run(&mut backend, &mut world) {
        Ok(summary) if summary.is_success() => EXIT_SUCCESS,
        Ok(summary) => {
            info!(
                scenarios = summary.scenarios.len(),
                "run finished with failures"
            );
            EXIT_FAILURE
        }
        Err(e) => {
            error!(error = %e, "run aborted before scenarios executed");
            EXIT_CONFIG
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_monochrome_pretty_output() {
        let args = host_arguments(Path::new("features/cukes.feature"), None);
        assert_eq!(
            args,
            ["--plugin", "pretty", "--monochrome", "features/cukes.feature"]
                .map(OsString::from)
        );
    }

    #[test]
    fn explicit_arguments_replace_defaults() {
        let args = host_arguments(Path::new("f"), Some(["--dry-run"].as_slice()));
        assert_eq!(args, ["--dry-run", "f"].map(OsString::from));
    }
}
