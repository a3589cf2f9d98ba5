//! One character per step.

use std::io::Write;

use super::{Plugin, flush, paint};
use crate::error::HostError;
use crate::result::{RunSummary, Status, StepResult};

const fn symbol(status: Status) -> &'static str {
    match status {
        Status::Passed => ".",
        Status::Skipped => "-",
        Status::Undefined => "U",
        Status::Ambiguous => "A",
        Status::Failed => "F",
    }
}

/// Prints a status character for every step.
pub struct ProgressPlugin<W: Write> {
    out: W,
    monochrome: bool,
}

impl<W: Write> ProgressPlugin<W> {
    /// Report into `out`, with colours unless `monochrome`.
    pub fn new(out: W, monochrome: bool) -> Self {
        Self { out, monochrome }
    }
}

impl<W: Write> Plugin for ProgressPlugin<W> {
    fn step_finished(&mut self, step: &StepResult) -> Result<(), HostError> {
        write!(self.out, "{}", paint(symbol(step.status), step.status, self.monochrome))?;
        Ok(())
    }

    fn run_finished(&mut self, _summary: &RunSummary) -> Result<(), HostError> {
        writeln!(self.out)?;
        flush(&mut self.out)
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests fail loudly on unexpected errors")]
mod tests {
    use super::*;
    use crate::reporting::test_support::{output, step};

    #[test]
    fn writes_one_symbol_per_step() {
        let mut buffer = Vec::new();
        {
            let mut plugin = ProgressPlugin::new(&mut buffer, true);
            for status in [
                Status::Passed,
                Status::Failed,
                Status::Skipped,
                Status::Undefined,
                Status::Ambiguous,
            ] {
                plugin
                    .step_finished(&step("s", status))
                    .expect("report is written");
            }
            plugin
                .run_finished(&RunSummary::default())
                .expect("report is written");
        }
        assert_eq!(output(buffer), ".F-UA\n");
    }
}
