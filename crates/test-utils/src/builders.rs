#![allow(dead_code)]

use std::path::PathBuf;

use hashwatch::config::{ConfigFile, RawConfigFile, WatchSection};
use hashwatch::types::WatchModeKind;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                watch: WatchSection::default(),
            },
        }
    }

    pub fn mode(mut self, mode: WatchModeKind) -> Self {
        self.config.watch.mode = mode;
        self
    }

    pub fn interval(mut self, interval: &str) -> Self {
        self.config.watch.interval = Some(interval.to_string());
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.watch.files.push(path.into());
        self
    }

    /// Raw (unvalidated) config, for tests that exercise validation itself.
    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
