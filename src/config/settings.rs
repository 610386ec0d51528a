// src/config/settings.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::CliArgs;
use crate::config::model::ConfigFile;
use crate::errors::{Result, WatchError};
use crate::types::{WatchMode, WatchModeKind};
use crate::watch::WatchedFiles;

/// Sweep interval for timed mode when neither the CLI nor the config sets one.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// Everything needed to start a watcher, after merging config and CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSettings {
    pub mode: WatchMode,
    pub files: Vec<PathBuf>,
}

impl WatchSettings {
    /// Merge an optional config file with command-line arguments.
    ///
    /// - `--mode` / `--interval` override `[watch].mode` / `[watch].interval`.
    /// - Positional files are appended to `[watch].files`.
    /// - The merged list must be non-empty and have distinct base names.
    pub fn resolve(cfg: Option<&ConfigFile>, args: &CliArgs) -> Result<Self> {
        let kind = args
            .mode
            .or(cfg.map(|c| c.mode()))
            .unwrap_or_default();

        let mode = match kind {
            WatchModeKind::Auto => WatchMode::Auto,
            WatchModeKind::Timed => {
                let interval = args
                    .interval
                    .or(cfg.and_then(|c| c.interval()))
                    .unwrap_or(DEFAULT_INTERVAL);
                if interval.is_zero() {
                    return Err(WatchError::Config(
                        "--interval must be greater than zero".to_string(),
                    ));
                }
                WatchMode::Timed(interval)
            }
        };

        let mut files: Vec<PathBuf> = cfg.map(|c| c.files().to_vec()).unwrap_or_default();
        files.extend(args.files.iter().cloned());

        if files.is_empty() {
            return Err(WatchError::Config(
                "no files to watch (pass FILE arguments or set [watch].files)".to_string(),
            ));
        }
        WatchedFiles::new(files.iter().cloned())?;

        Ok(Self { mode, files })
    }
}
