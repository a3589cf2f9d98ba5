//! JSON report of the whole run.
//!
//! The document groups scenarios by feature file and keeps status labels in
//! lowercase so downstream tools can rely on consistent casing.

use std::io::Write;

use serde::Serialize;

use super::{Plugin, flush};
use crate::error::HostError;
use crate::result::{RunSummary, ScenarioResult, StepResult};

#[derive(Serialize)]
struct JsonReport<'a> {
    status: &'static str,
    features: Vec<JsonFeature<'a>>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    run_hook_failures: &'a [StepResult],
}

#[derive(Serialize)]
struct JsonFeature<'a> {
    uri: &'a str,
    name: &'a str,
    scenarios: Vec<JsonScenario<'a>>,
}

#[derive(Serialize)]
struct JsonScenario<'a> {
    name: &'a str,
    line: u32,
    status: &'static str,
    tags: &'a [String],
    steps: &'a [StepResult],
}

impl<'a> From<&'a ScenarioResult> for JsonScenario<'a> {
    fn from(scenario: &'a ScenarioResult) -> Self {
        Self {
            name: &scenario.name,
            line: scenario.line,
            status: scenario.status().label(),
            tags: &scenario.tags,
            steps: &scenario.steps,
        }
    }
}

impl<'a> From<&'a RunSummary> for JsonReport<'a> {
    fn from(summary: &'a RunSummary) -> Self {
        let mut features: Vec<JsonFeature<'a>> = Vec::new();
        for scenario in &summary.scenarios {
            let entry = JsonScenario::from(scenario);
            match features.iter_mut().find(|f| f.uri == scenario.uri) {
                Some(feature) => feature.scenarios.push(entry),
                None => features.push(JsonFeature {
                    uri: &scenario.uri,
                    name: &scenario.feature,
                    scenarios: vec![entry],
                }),
            }
        }
        Self {
            status: if summary.is_success() { "passed" } else { "failed" },
            features,
            run_hook_failures: &summary.run_hook_failures,
        }
    }
}

/// Serialise `summary` into `writer`.
///
/// # Errors
/// Returns [`HostError::Report`] when serialisation or writing fails.
pub fn write<W: Write>(writer: &mut W, summary: &RunSummary) -> Result<(), HostError> {
    serde_json::to_writer_pretty(&mut *writer, &JsonReport::from(summary))?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Writes the JSON document once the run finishes.
pub struct JsonPlugin<W: Write> {
    out: W,
}

impl<W: Write> JsonPlugin<W> {
    /// Report into `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Plugin for JsonPlugin<W> {
    fn run_finished(&mut self, summary: &RunSummary) -> Result<(), HostError> {
        write(&mut self.out, summary)?;
        flush(&mut self.out)
    }
}
