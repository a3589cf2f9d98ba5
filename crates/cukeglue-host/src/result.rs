//! Outcomes of steps, scenarios and whole runs.

use serde::Serialize;

/// Outcome of a step or scenario.
///
/// Variants are ordered from best to worst so a scenario's status is the
/// maximum of its steps' statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Ran without error.
    Passed,
    /// Not run because an earlier step did not pass, or a dry run.
    Skipped,
    /// No glue matched the step text.
    Undefined,
    /// More than one glue matched the step text.
    Ambiguous,
    /// The step, a hook or an argument conversion failed.
    Failed,
}

impl Status {
    /// Lowercase label used by reporters.
    ///
    /// # Examples
    /// ```
    /// use cukeglue_host::Status;
    ///
    /// assert_eq!(Status::Undefined.label(), "undefined");
    /// ```
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Skipped => "skipped",
            Self::Undefined => "undefined",
            Self::Ambiguous => "ambiguous",
            Self::Failed => "failed",
        }
    }

    /// Whether this status fails the run.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Undefined | Self::Ambiguous | Self::Failed)
    }
}

/// Outcome of one gherkin step, or of a hook reported in its place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepResult {
    /// Keyword as written, without trailing whitespace.
    pub keyword: String,
    /// Step text, or a hook description.
    pub text: String,
    /// Line in the feature file; `0` for hooks.
    pub line: u32,
    /// Outcome.
    pub status: Status,
    /// Glue location of the matched definition or hook.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Glue location where a panic was raised, when it lies in glue code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_location: Option<String>,
    /// Suggested glue for an undefined step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl StepResult {
    /// A result with only keyword, text, line and status filled in.
    #[must_use]
    pub fn new(keyword: impl Into<String>, text: impl Into<String>, line: u32, status: Status) -> Self {
        Self {
            keyword: keyword.into(),
            text: text.into(),
            line,
            status,
            location: None,
            error: None,
            failure_location: None,
            snippet: None,
        }
    }
}

/// Outcome of one scenario or outline example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioResult {
    /// Feature file path.
    pub uri: String,
    /// Feature name.
    pub feature: String,
    /// Scenario name.
    pub name: String,
    /// Line of the scenario, or of the example row for outlines.
    pub line: u32,
    /// Inherited and own tags.
    pub tags: Vec<String>,
    /// Hook and step outcomes in execution order.
    pub steps: Vec<StepResult>,
}

impl ScenarioResult {
    /// Worst status among the recorded steps; `Passed` when empty.
    #[must_use]
    pub fn status(&self) -> Status {
        self.steps
            .iter()
            .map(|step| step.status)
            .max()
            .unwrap_or(Status::Passed)
    }
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Scenario outcomes in execution order.
    pub scenarios: Vec<ScenarioResult>,
    /// Failures of before-all and after-all hooks.
    pub run_hook_failures: Vec<StepResult>,
}

impl RunSummary {
    /// Number of scenarios with the given status.
    #[must_use]
    pub fn count_scenarios(&self, status: Status) -> usize {
        self.scenarios.iter().filter(|s| s.status() == status).count()
    }

    /// Number of steps with the given status, hooks included.
    #[must_use]
    pub fn count_steps(&self, status: Status) -> usize {
        self.scenarios
            .iter()
            .flat_map(|s| &s.steps)
            .filter(|step| step.status == status)
            .count()
    }

    /// Whether every scenario and run hook passed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.run_hook_failures.is_empty()
            && self.scenarios.iter().all(|s| !s.status().is_failure())
    }

    /// Distinct snippets for undefined steps, in first-seen order.
    #[must_use]
    pub fn snippets(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for snippet in self
            .scenarios
            .iter()
            .flat_map(|s| &s.steps)
            .filter_map(|step| step.snippet.as_deref())
        {
            if !seen.contains(&snippet) {
                seen.push(snippet);
            }
        }
        seen
    }
}
