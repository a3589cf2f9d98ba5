//! Host arguments accepted by a run.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use regex::Regex;

use crate::config::LogLevel;
use crate::error::HostError;

/// Built-in reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginKind {
    /// Scenario and step lines with statuses and failures.
    Pretty,
    /// One character per step.
    Progress,
    /// Scenario and step counts plus snippets for undefined steps.
    Summary,
    /// Machine-readable results document.
    Json,
}

impl PluginKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Progress => "progress",
            Self::Summary => "summary",
            Self::Json => "json",
        }
    }
}

/// `--plugin` value: a reporter and an optional output file.
///
/// # Examples
/// ```
/// use cukeglue_host::{PluginKind, PluginSpec};
///
/// let spec: PluginSpec = "json:target/cukes.json".parse().expect("valid plugin");
/// assert_eq!(spec.kind, PluginKind::Json);
/// assert_eq!(spec.path.as_deref(), Some(std::path::Path::new("target/cukes.json")));
/// assert!("html".parse::<PluginSpec>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginSpec {
    /// Reporter to use.
    pub kind: PluginKind,
    /// Output file; stdout when absent.
    pub path: Option<PathBuf>,
}

impl FromStr for PluginSpec {
    type Err = HostError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (name, path) = match value.split_once(':') {
            Some((name, path)) if !path.is_empty() => (name, Some(PathBuf::from(path))),
            Some((name, _)) => (name, None),
            None => (value, None),
        };
        let kind = match name {
            "pretty" => PluginKind::Pretty,
            "progress" => PluginKind::Progress,
            "summary" => PluginKind::Summary,
            "json" => PluginKind::Json,
            other => {
                return Err(HostError::InvalidOptions(format!(
                    "unknown plugin '{other}', expected one of: pretty, progress, summary, json"
                )));
            }
        };
        Ok(Self { kind, path })
    }
}

impl fmt::Display for PluginSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.as_str())?;
        if let Some(path) = &self.path {
            write!(f, ":{}", path.display())?;
        }
        Ok(())
    }
}

/// Options controlling one run, parsed from host arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "cukeglue", no_binary_name = true, about = "Run gherkin features against glue")]
pub struct RuntimeOptions {
    /// Reporter to use, optionally followed by `:PATH` (pretty, progress,
    /// summary, json). Repeatable.
    #[arg(short = 'p', long = "plugin", value_name = "PLUGIN[:PATH]")]
    pub plugins: Vec<PluginSpec>,

    /// Disable coloured output.
    #[arg(short = 'm', long)]
    pub monochrome: bool,

    /// Glue location handed to the backend. Repeatable.
    #[arg(short = 'g', long = "glue", value_name = "PATH")]
    pub glue: Vec<String>,

    /// Only run scenarios whose name matches this regex. Repeatable.
    #[arg(short = 'n', long = "name", value_name = "REGEX")]
    pub names: Vec<String>,

    /// Match steps without running glue.
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<LogLevel>,

    /// Feature files or directories.
    #[arg(value_name = "FEATURE")]
    pub features: Vec<PathBuf>,
}

impl RuntimeOptions {
    /// Parse host arguments.
    ///
    /// # Errors
    /// Returns [`HostError::InvalidOptions`] for unknown flags, bad plugin
    /// specs and invalid `--name` regexes.
    pub fn parse_args<I, T>(args: I) -> Result<Self, HostError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let options =
            Self::try_parse_from(args).map_err(|err| HostError::InvalidOptions(err.to_string()))?;
        options.name_filters()?;
        Ok(options)
    }

    /// Compiled `--name` filters.
    ///
    /// # Errors
    /// Returns [`HostError::InvalidOptions`] for an invalid regex.
    pub fn name_filters(&self) -> Result<Vec<Regex>, HostError> {
        self.names
            .iter()
            .map(|name| {
                Regex::new(name).map_err(|err| {
                    HostError::InvalidOptions(format!("invalid --name regex '{name}': {err}"))
                })
            })
            .collect()
    }

    /// Plugins to run: the configured ones, or `progress` and `summary`.
    #[must_use]
    pub fn effective_plugins(&self) -> Vec<PluginSpec> {
        if self.plugins.is_empty() {
            [PluginKind::Progress, PluginKind::Summary]
                .into_iter()
                .map(|kind| PluginSpec { kind, path: None })
                .collect()
        } else {
            self.plugins.clone()
        }
    }
}
