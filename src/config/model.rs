// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::types::WatchModeKind;

/// Configuration exactly as deserialized from TOML:
///
/// ```toml
/// [watch]
/// mode = "timed"
/// interval = "5s"
/// files = ["certs/server.crt", "certs/server.key"]
/// ```
///
/// All fields are optional. Convert into [`ConfigFile`] (via `TryFrom`) to
/// get a validated config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchSection {
    /// `"auto"` (default) or `"timed"`.
    #[serde(default)]
    pub mode: WatchModeKind,

    /// Duration string (e.g. `"30s"`) between sweeps in timed mode.
    #[serde(default)]
    pub interval: Option<String>,

    /// Files to watch, in order.
    #[serde(default)]
    pub files: Vec<PathBuf>,
}

/// Validated configuration.
///
/// Only constructible through `TryFrom<RawConfigFile>`, so holders can rely
/// on the interval having parsed and the file names being usable.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    mode: WatchModeKind,
    interval: Option<Duration>,
    files: Vec<PathBuf>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        mode: WatchModeKind,
        interval: Option<Duration>,
        files: Vec<PathBuf>,
    ) -> Self {
        Self {
            mode,
            interval,
            files,
        }
    }

    pub fn mode(&self) -> WatchModeKind {
        self.mode
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}
