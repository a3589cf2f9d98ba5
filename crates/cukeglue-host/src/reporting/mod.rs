//! Reporter plugins selected with `--plugin`.
//!
//! The runner notifies every plugin as scenarios and steps finish. Plugins
//! write to stdout unless the plugin spec names an output file.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use colored::{ColoredString, Colorize};

use crate::error::HostError;
use crate::feature::Pickle;
use crate::options::{PluginKind, PluginSpec};
use crate::result::{RunSummary, ScenarioResult, Status, StepResult};

pub mod json;
pub mod pretty;
pub mod progress;
pub mod summary;

pub use json::JsonPlugin;
pub use pretty::PrettyPlugin;
pub use progress::ProgressPlugin;
pub use summary::SummaryPlugin;

/// Receives run events from the runner.
///
/// Every method defaults to doing nothing.
pub trait Plugin {
    /// A scenario is about to run.
    ///
    /// # Errors
    /// Returns an error when output cannot be written.
    fn scenario_started(&mut self, pickle: &Pickle) -> Result<(), HostError> {
        let _ = pickle;
        Ok(())
    }

    /// A step or scenario hook finished.
    ///
    /// # Errors
    /// Returns an error when output cannot be written.
    fn step_finished(&mut self, step: &StepResult) -> Result<(), HostError> {
        let _ = step;
        Ok(())
    }

    /// A scenario finished.
    ///
    /// # Errors
    /// Returns an error when output cannot be written.
    fn scenario_finished(&mut self, scenario: &ScenarioResult) -> Result<(), HostError> {
        let _ = scenario;
        Ok(())
    }

    /// The run finished.
    ///
    /// # Errors
    /// Returns an error when output cannot be written.
    fn run_finished(&mut self, summary: &RunSummary) -> Result<(), HostError> {
        let _ = summary;
        Ok(())
    }
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>, HostError> {
    let Some(path) = path else {
        return Ok(Box::new(io::stdout()));
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(Box::new(BufWriter::new(File::create(path)?)))
}

/// Build the plugins named by `specs`.
///
/// # Errors
/// Returns [`HostError::Io`] when an output file cannot be created.
pub fn create_plugins(
    specs: &[PluginSpec],
    monochrome: bool,
) -> Result<Vec<Box<dyn Plugin>>, HostError> {
    specs
        .iter()
        .map(|spec| {
            let out = open_output(spec.path.as_deref())?;
            let plugin: Box<dyn Plugin> = match spec.kind {
                PluginKind::Pretty => Box::new(PrettyPlugin::new(out, monochrome)),
                PluginKind::Progress => Box::new(ProgressPlugin::new(out, monochrome)),
                PluginKind::Summary => Box::new(SummaryPlugin::new(out, monochrome)),
                PluginKind::Json => Box::new(JsonPlugin::new(out)),
            };
            Ok(plugin)
        })
        .collect()
}

/// Colour `text` by `status` unless `monochrome`.
pub(crate) fn paint(text: &str, status: Status, monochrome: bool) -> ColoredString {
    if monochrome {
        return text.normal().clear();
    }
    match status {
        Status::Passed => text.green(),
        Status::Skipped => text.cyan(),
        Status::Undefined | Status::Ambiguous => text.yellow(),
        Status::Failed => text.red(),
    }
}

/// List the distinct snippets of undefined steps, if any.
pub(crate) fn write_snippets(out: &mut dyn Write, summary: &RunSummary) -> Result<(), HostError> {
    let snippets = summary.snippets();
    if snippets.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "You can implement missing steps with the snippets below:")?;
    for snippet in snippets {
        writeln!(out)?;
        writeln!(out, "{snippet}")?;
    }
    Ok(())
}

pub(crate) fn flush(out: &mut dyn Write) -> Result<(), HostError> {
    out.flush().map_err(HostError::from)
}


#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests fail loudly on unexpected errors")]
mod tests {
    use super::*;
    use crate::options::PluginSpec;

    #[test]
    fn creates_plugin_output_files() {
        let dir = tempfile::tempdir().expect("temp dir is created");
        let path = dir.path().join("reports").join("cukes.json");
        let specs: Vec<PluginSpec> = vec![
            format!("json:{}", path.display())
                .parse()
                .expect("plugin spec parses"),
        ];
        let mut plugins =
            create_plugins(&specs, true).expect("plugins are created");
        for plugin in &mut plugins {
            plugin
                .run_finished(&RunSummary::default())
                .expect("report is written");
        }
        drop(plugins);
        let written = fs::read_to_string(&path).expect("file is readable");
        assert!(written.contains("\"features\": []"));
    }

    #[test]
    fn monochrome_paint_has_no_escape_codes() {
        assert_eq!(paint("ok", Status::Passed, true).to_string(), "ok");
    }
}
