//! Diagnostics for runs, written to stderr through `tracing`.
//!
//! Reporter plugins own stdout. Scenario spans are logged when they close, so
//! `--log-level info` shows one line per finished scenario.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use crate::config::{HostConfig, LogLevel};

const CRATES: [&str; 3] = ["cukeglue", "cukeglue_host", "cukeglue_patterns"];

/// Filter directives: the configured level for cukeglue crates, and no more
/// than `warn` for everything else.
fn directives(level: LogLevel) -> String {
    let others = match level {
        LogLevel::Error => LogLevel::Error,
        _ => LogLevel::Warn,
    };
    CRATES
        .iter()
        .fold(others.as_filter_str().to_string(), |acc, name| {
            format!("{acc},{name}={}", level.as_filter_str())
        })
}

/// Install the process-wide subscriber for `config`.
///
/// `--log-level` beats `CUKEGLUE_LOG_LEVEL`, which beats the `warn` default;
/// [`HostConfig`] has already applied that precedence. ANSI colour follows
/// `monochrome`.
///
/// Returns `false` when a subscriber was already installed, in which case
/// that one stays in place.
pub fn init_logging(config: &HostConfig) -> bool {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives(config.log_level)))
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_ansi(!config.monochrome)
        .finish();

    tracing::subscriber::set_global_default(subscriber).is_ok()
}
