// src/logging.rs

//! stderr log output for the `hashwatch` binary.
//!
//! stdout is reserved for `reload` lines, so a consumer can pipe it straight
//! into whatever reacts to changes. The library itself never installs a
//! subscriber; watcher spans and events go to whatever the host sets up.
//!
//! The filter comes from `--log-level` if given, otherwise from the
//! `HASHWATCH_LOG` environment variable (full `EnvFilter` directives, e.g.
//! `hashwatch::watch=debug`), otherwise `info`.

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

const LOG_ENV_VAR: &str = "HASHWATCH_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Install the global stderr subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV_VAR).ok();

    fmt()
        .with_env_filter(build_filter(cli_level, env.as_deref()))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}

/// An unparsable `HASHWATCH_LOG` falls back to the default rather than
/// refusing to start.
fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(directive(level));
    }
    env.and_then(|s| EnvFilter::try_new(s.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

fn directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
