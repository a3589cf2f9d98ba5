//! Scenario and step counts, followed by snippets for undefined steps.

use std::io::Write;

use super::{Plugin, flush, paint, write_snippets};
use crate::error::HostError;
use crate::result::{RunSummary, Status};

const ORDER: [Status; 5] = [
    Status::Failed,
    Status::Ambiguous,
    Status::Undefined,
    Status::Skipped,
    Status::Passed,
];

/// Prints totals once the run finishes.
pub struct SummaryPlugin<W: Write> {
    out: W,
    monochrome: bool,
}

impl<W: Write> SummaryPlugin<W> {
    /// Report into `out`, with colours unless `monochrome`.
    pub fn new(out: W, monochrome: bool) -> Self {
        Self { out, monochrome }
    }

    fn breakdown(&self, count: impl Fn(Status) -> usize) -> String {
        let parts: Vec<String> = ORDER
            .iter()
            .filter_map(|&status| {
                let n = count(status);
                (n > 0).then(|| paint(&format!("{n} {}", status.label()), status, self.monochrome).to_string())
            })
            .collect();
        if parts.is_empty() {
            String::new()
        } else {
            format!(" ({})", parts.join(", "))
        }
    }
}

impl<W: Write> Plugin for SummaryPlugin<W> {
    fn run_finished(&mut self, summary: &RunSummary) -> Result<(), HostError> {
        let scenarios = summary.scenarios.len();
        let steps: usize = summary.scenarios.iter().map(|s| s.steps.len()).sum();
        let scenario_breakdown = self.breakdown(|status| summary.count_scenarios(status));
        let step_breakdown = self.breakdown(|status| summary.count_steps(status));
        writeln!(self.out)?;
        for failure in &summary.run_hook_failures {
            writeln!(
                self.out,
                "{} {}",
                paint("Failed hook:", failure.status, self.monochrome),
                failure.text
            )?;
            if let Some(error) = &failure.error {
                writeln!(self.out, "  {error}")?;
            }
        }
        writeln!(self.out, "{scenarios} scenarios{scenario_breakdown}")?;
        writeln!(self.out, "{steps} steps{step_breakdown}")?;
        write_snippets(&mut self.out, summary)?;
        flush(&mut self.out)
    }
}
