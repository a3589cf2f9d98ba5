//! Human-readable scenario and step listing.

use std::io::Write;

use colored::Colorize;

use super::{Plugin, flush, paint, write_snippets};
use crate::error::HostError;
use crate::feature::Pickle;
use crate::result::{RunSummary, ScenarioResult, Status, StepResult};

/// Prints each scenario with its steps as they finish.
pub struct PrettyPlugin<W: Write> {
    out: W,
    monochrome: bool,
    current_feature: Option<String>,
}

impl<W: Write> PrettyPlugin<W> {
    /// Report into `out`, with colours unless `monochrome`.
    pub fn new(out: W, monochrome: bool) -> Self {
        Self {
            out,
            monochrome,
            current_feature: None,
        }
    }

    fn write_step(&mut self, step: &StepResult) -> std::io::Result<()> {
        let mut line = format!("{} {}", step.keyword, step.text);
        if self.monochrome && step.status != Status::Passed {
            line = format!("{line} ({})", step.status.label());
        }
        let painted = paint(&line, step.status, self.monochrome);
        write!(self.out, "    {painted}")?;
        if let Some(location) = &step.location {
            let comment = format!("# {location}");
            let comment = if self.monochrome {
                comment.normal()
            } else {
                comment.dimmed()
            };
            write!(self.out, " {comment}")?;
        }
        writeln!(self.out)?;
        if let Some(error) = &step.error {
            for error_line in error.lines() {
                writeln!(self.out, "      {}", paint(error_line, step.status, self.monochrome))?;
            }
        }
        if let Some(failure) = &step.failure_location {
            writeln!(self.out, "      at {failure}")?;
        }
        Ok(())
    }
}

impl<W: Write> Plugin for PrettyPlugin<W> {
    fn scenario_started(&mut self, pickle: &Pickle) -> Result<(), HostError> {
        if self.current_feature.as_deref() != Some(pickle.uri.as_str()) {
            if self.current_feature.is_some() {
                writeln!(self.out)?;
            }
            writeln!(self.out, "Feature: {}", pickle.feature)?;
            self.current_feature = Some(pickle.uri.clone());
        }
        writeln!(self.out)?;
        if !pickle.tags.is_empty() {
            writeln!(self.out, "  {}", pickle.tags.join(" "))?;
        }
        writeln!(
            self.out,
            "  Scenario: {} # {}:{}",
            pickle.name, pickle.uri, pickle.line
        )?;
        Ok(())
    }

    fn step_finished(&mut self, step: &StepResult) -> Result<(), HostError> {
        self.write_step(step)?;
        Ok(())
    }

    fn scenario_finished(&mut self, _scenario: &ScenarioResult) -> Result<(), HostError> {
        flush(&mut self.out)
    }

    fn run_finished(&mut self, summary: &RunSummary) -> Result<(), HostError> {
        for failure in &summary.run_hook_failures {
            writeln!(self.out)?;
            self.write_step(failure)?;
        }
        write_snippets(&mut self.out, summary)?;
        flush(&mut self.out)
    }
}
