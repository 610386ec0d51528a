// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::types::{parse_duration, WatchModeKind};

/// Command-line arguments for `hashwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "hashwatch",
    version,
    about = "Print a line whenever the contents of any watched file change.",
    long_about = None
)]
pub struct CliArgs {
    /// Files to watch. Appended to `[watch].files` from the config file.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Path to the config file (TOML).
    ///
    /// Default: `Hashwatch.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Detection strategy: OS notifications (`auto`) or polling (`timed`).
    #[arg(long, value_enum, value_name = "MODE")]
    pub mode: Option<WatchModeKind>,

    /// Polling interval for `--mode timed`, e.g. `500ms`, `30s`, `5m`.
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub interval: Option<Duration>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `HASHWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve config + arguments, print what would be watched, and exit.
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
