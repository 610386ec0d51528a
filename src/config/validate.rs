// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, WatchError};
use crate::types::parse_duration;
use crate::watch::WatchedFiles;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = WatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let interval = match raw.watch.interval.as_deref() {
            Some(s) => Some(validate_interval(s)?),
            None => None,
        };
        validate_files(&raw)?;
        Ok(ConfigFile::new_unchecked(
            raw.watch.mode,
            interval,
            raw.watch.files,
        ))
    }
}

fn validate_interval(s: &str) -> Result<std::time::Duration> {
    let interval = parse_duration(s)
        .map_err(|e| WatchError::Config(format!("[watch].interval: {e}")))?;
    if interval.is_zero() {
        return Err(WatchError::Config(
            "[watch].interval must be greater than zero".to_string(),
        ));
    }
    Ok(interval)
}

/// Paths must have a file name and base names must be unique. An empty list
/// is fine here: files may come from the command line instead.
fn validate_files(cfg: &RawConfigFile) -> Result<()> {
    WatchedFiles::new(cfg.watch.files.iter().cloned())?;
    Ok(())
}
