// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;
use crate::types::Concurrency;

/// Command-line arguments for `reconflow`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "reconflow",
    version,
    about = "Run a dependency-ordered flow of commands with maximum safe parallelism.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the flow file (TOML).
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Maximum number of commands running at once ("unbounded" or N >= 1).
    ///
    /// Overrides `[flow].concurrency`.
    #[arg(long, value_name = "N")]
    pub concurrency: Option<Concurrency>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RECONFLOW_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the flow, but don't execute any commands.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
