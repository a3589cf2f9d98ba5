//! Engine configuration read from the environment.
//!
//! Every setting can be overridden by the matching host argument; see
//! [`RuntimeOptions`](crate::RuntimeOptions).

use std::env;
use std::str::FromStr;

use crate::error::HostError;

/// Environment variable selecting the log level.
pub const LOG_LEVEL_ENV: &str = "CUKEGLUE_LOG_LEVEL";

/// Environment variable disabling coloured output.
pub const MONOCHROME_ENV: &str = "CUKEGLUE_MONOCHROME";

/// Log level matching the tracing crate's levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Every span and event.
    Trace,
    /// Matching and registration detail.
    Debug,
    /// Run lifecycle.
    Info,
    /// Problems that do not stop the run.
    #[default]
    Warn,
    /// Failures only.
    Error,
}

impl FromStr for LogLevel {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(HostError::InvalidConfig(format!(
                "unknown log level '{s}', expected one of: trace, debug, info, warn, error"
            ))),
        }
    }
}

impl LogLevel {
    /// Convert to a tracing filter directive.
    #[must_use]
    pub const fn as_filter_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

fn parse_env_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Settings that apply to a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostConfig {
    /// Log level for the tracing subscriber.
    pub log_level: LogLevel,
    /// Disable ANSI colours in console reporters.
    pub monochrome: bool,
}

impl HostConfig {
    /// Load configuration from `CUKEGLUE_LOG_LEVEL` and
    /// `CUKEGLUE_MONOCHROME`, falling back to defaults when unset.
    ///
    /// # Errors
    /// Returns [`HostError::InvalidConfig`] when a variable holds an
    /// unrecognised value.
    pub fn from_env() -> Result<Self, HostError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, HostError> {
        let log_level = lookup(LOG_LEVEL_ENV)
            .map_or_else(|| Ok(LogLevel::default()), |value| value.parse())?;
        let monochrome = lookup(MONOCHROME_ENV)
            .map(|value| {
                parse_env_bool(&value).ok_or_else(|| {
                    HostError::InvalidConfig(format!(
                        "invalid {MONOCHROME_ENV} value '{value}', expected a boolean"
                    ))
                })
            })
            .transpose()?
            .unwrap_or(false);
        Ok(Self {
            log_level,
            monochrome,
        })
    }

    /// Apply host-argument overrides on top of environment settings.
    #[must_use]
    pub fn apply_overrides(mut self, log_level: Option<LogLevel>, monochrome: bool) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }
        self.monochrome |= monochrome;
        self
    }
}
