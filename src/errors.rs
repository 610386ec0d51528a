// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    /// A watched file could not be read. The change detector logs these and
    /// treats the file as "unknown state"; they never stop a watcher.
    #[error("error reading file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error watching file: {0}")]
    Subscribe(#[source] notify::Error),

    #[error("could not create filesystem watcher: {0}")]
    Setup(#[source] notify::Error),

    #[error("watched files {first:?} and {second:?} share the base name '{name}'")]
    DuplicateBaseName {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("path has no file name: {0:?}")]
    InvalidPath(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, WatchError>;
