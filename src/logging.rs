// src/logging.rs

//! Tracing subscriber setup for the `reconflow` binary.
//!
//! `--log-level` wins over `RECONFLOW_LOG`; with neither, everything at
//! `info` and above is shown. `RECONFLOW_LOG` takes full `EnvFilter`
//! directives, e.g. `reconflow::engine=debug,info`.
//!
//! Output goes to stderr so dry-run output on stdout stays machine-readable.

use anyhow::{Context, Result, anyhow};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "RECONFLOW_LOG";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let filter = build_filter(cli_level, env.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}

fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> Result<EnvFilter> {
    if let Some(level) = cli_level {
        return Ok(EnvFilter::default().add_directive(LevelFilter::from(level).into()));
    }

    match env.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid {LOG_ENV} value '{directives}'")),
        None => Ok(EnvFilter::default().add_directive(LevelFilter::INFO.into())),
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_level_beats_environment() {
        let filter = build_filter(Some(LogLevel::Debug), Some("error")).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn environment_directives_are_used() {
        let filter = build_filter(None, Some("reconflow=trace,warn")).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn blank_environment_falls_back_to_info() {
        let filter = build_filter(None, Some("   ")).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }
}
